//! The backward scan that drives both annotators.

use crate::buffer::LineBuffer;
use crate::error::Result;
use crate::fenced::{self, FenceOutcome};
use crate::image;
use crate::patterns;
use crate::source::SourceText;
use crate::types::{TransformReport, UnterminatedFence};

/// Class whose presence selects the highlighted `r` fence.
pub const DEFAULT_LANGUAGE_MARKER: &str = "r";

/// Rewrites Pandoc-style class annotations into remark content classes.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    /// Policy for annotated fences that never close.
    unterminated: UnterminatedFence,

    /// Class name (without dot) that becomes the fence language.
    language_marker: String,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            unterminated: UnterminatedFence::default(),
            language_marker: DEFAULT_LANGUAGE_MARKER.to_string(),
        }
    }
}

impl Preprocessor {
    /// Create a preprocessor with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for annotated fences that never close.
    pub fn with_unterminated(mut self, policy: UnterminatedFence) -> Self {
        self.unterminated = policy;
        self
    }

    /// Set the class that selects the language-tagged fence.
    ///
    /// A leading dot is accepted and ignored. An empty marker keeps the default.
    pub fn with_language_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        let marker = marker.trim_start_matches('.');
        if !marker.is_empty() {
            self.language_marker = marker.to_string();
        }
        self
    }

    pub fn language_marker(&self) -> &str {
        &self.language_marker
    }

    /// Rewrite a deck source.
    pub fn transform(&self, text: &str) -> String {
        self.transform_with_report(text).0
    }

    /// Rewrite a deck source and report what changed.
    ///
    /// Walks from the last line to the first. Each splice happens at or
    /// after the current index, so lines still to be visited keep their
    /// positions. At every index the fence check runs first, then the image
    /// check on whatever line now sits at that index.
    pub fn transform_with_report(&self, text: &str) -> (String, TransformReport) {
        let mut buffer = LineBuffer::from_text(text);
        let mut report = TransformReport {
            line_count_before: buffer.len(),
            ..TransformReport::default()
        };

        for i in (0..buffer.len()).rev() {
            if buffer.get(i).is_some_and(patterns::is_annotated_fence_open) {
                match fenced::annotate_fence(
                    &mut buffer,
                    i,
                    &self.language_marker,
                    self.unterminated,
                ) {
                    FenceOutcome::Rewritten(rewrite) => {
                        report.fenced_blocks += 1;
                        if rewrite.language_tagged {
                            report.language_fences += 1;
                        }
                        if rewrite.closing_fence.is_none() {
                            report.unterminated_fences += 1;
                        }
                    }
                    FenceOutcome::NoClasses { closing_fence } => {
                        report.skipped_fences += 1;
                        if closing_fence.is_none() {
                            report.unterminated_fences += 1;
                        }
                    }
                    FenceOutcome::SkippedUnterminated => report.unterminated_fences += 1,
                }
            }

            if image::annotate_image(&mut buffer, i).is_some() {
                report.images += 1;
            }
        }

        report.line_count_after = buffer.len();
        log::debug!(
            "Rewrote {} fence(s) and {} image(s), {} -> {} lines",
            report.fenced_blocks,
            report.images,
            report.line_count_before,
            report.line_count_after
        );

        (buffer.into_text(), report)
    }

    /// Read a source, rewrite it, and store the result back.
    pub fn process<S: SourceText + ?Sized>(&self, source: &mut S) -> Result<TransformReport> {
        let text = source.source_text()?;
        let (rewritten, report) = self.transform_with_report(&text);
        source.set_source_text(rewritten)?;
        Ok(report)
    }
}

/// Rewrite a deck source with the default settings.
pub fn transform(text: &str) -> String {
    Preprocessor::new().transform(text)
}
