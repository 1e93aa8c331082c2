//! WASM-compatible wrapper for remark.js class preprocessing.
//!
//! This crate exposes the rewrite to JavaScript so a slide page can run it
//! on the `#source` text before remark.js builds the slides.

use remark_classes_core::{Preprocessor, TransformReport, UnterminatedFence};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Options accepted from JavaScript. Missing fields keep the defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PreprocessOptions {
    /// "extend" or "skip".
    pub unterminated: Option<String>,
    /// Class that switches a fence to language highlighting.
    pub language_marker: Option<String>,
}

/// Result of preprocessing a source.
#[derive(Debug, Serialize, Deserialize)]
pub struct PreprocessResult {
    /// The rewritten markdown.
    pub text: String,
    /// What the rewrite changed.
    pub report: TransformReport,
}

/// Rewrite a remark source with the default settings.
#[wasm_bindgen]
pub fn preprocess_source(text: &str) -> String {
    remark_classes_core::transform(text)
}

/// Rewrite a remark source and report what changed.
///
/// # Arguments
/// * `text` - The markdown from the `#source` element
/// * `options` - Optional `{ unterminated, language_marker }` object
///
/// # Returns
/// A JavaScript object `{ text, report }`, or throws on invalid options.
#[wasm_bindgen]
pub fn preprocess_source_with_report(text: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options: PreprocessOptions = if options.is_undefined() || options.is_null() {
        PreprocessOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))?
    };

    let result = preprocess_impl(text, &options).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn build_preprocessor(options: &PreprocessOptions) -> Result<Preprocessor, String> {
    let mut preprocessor = Preprocessor::new();

    if let Some(policy) = options.unterminated.as_deref() {
        let policy: UnterminatedFence = policy.parse().map_err(|e| format!("{}", e))?;
        preprocessor = preprocessor.with_unterminated(policy);
    }

    if let Some(marker) = options.language_marker.as_deref() {
        preprocessor = preprocessor.with_language_marker(marker);
    }

    Ok(preprocessor)
}

fn preprocess_impl(text: &str, options: &PreprocessOptions) -> Result<PreprocessResult, String> {
    let preprocessor = build_preprocessor(options)?;
    let (text, report) = preprocessor.transform_with_report(text);
    Ok(PreprocessResult { text, report })
}
