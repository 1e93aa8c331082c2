//! Where deck sources come from and go back to.
//!
//! A deck is either a bare markdown file or an HTML page whose markdown sits
//! inside the element with `id="source"` (remark's `<textarea id="source">`).

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

/// Element id remark reads its markdown from.
pub const DEFAULT_SOURCE_ID: &str = "source";

/// Opening tag of the default source element.
static SOURCE_ELEMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| source_element_regex(DEFAULT_SOURCE_ID).unwrap());

/// Get/set access to the markdown of a deck.
pub trait SourceText {
    /// The markdown the rewrite should run on.
    fn source_text(&self) -> Result<String>;

    /// Replace the markdown with its rewritten form.
    fn set_source_text(&mut self, text: String) -> Result<()>;
}

/// A document that is markdown from start to end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainSource {
    text: String,
}

impl PlainSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl SourceText for PlainSource {
    fn source_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn set_source_text(&mut self, text: String) -> Result<()> {
        self.text = text;
        Ok(())
    }
}

/// An HTML page holding the markdown in one element.
///
/// Only the element body is ever replaced, the rest of the page is kept
/// byte for byte. The body is taken verbatim; entities are not decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlSource {
    html: String,
    body: Range<usize>,
}

impl HtmlSource {
    /// Locate the `id="source"` element in a page.
    pub fn new(html: impl Into<String>) -> Result<Self> {
        let html = html.into();
        let body = locate_body(&html, &SOURCE_ELEMENT_REGEX)
            .ok_or_else(|| Error::SourceElementNotFound(DEFAULT_SOURCE_ID.to_string()))?;
        Ok(Self { html, body })
    }

    /// Locate the element with the given id in a page.
    pub fn with_element_id(html: impl Into<String>, id: &str) -> Result<Self> {
        if id == DEFAULT_SOURCE_ID {
            return Self::new(html);
        }

        let html = html.into();
        let regex = source_element_regex(id)
            .map_err(|e| Error::InvalidOption(format!("element id \"{}\": {}", id, e)))?;
        let body = locate_body(&html, &regex)
            .ok_or_else(|| Error::SourceElementNotFound(id.to_string()))?;
        Ok(Self { html, body })
    }

    /// The markdown inside the source element.
    pub fn body(&self) -> &str {
        &self.html[self.body.clone()]
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

impl SourceText for HtmlSource {
    fn source_text(&self) -> Result<String> {
        Ok(self.body().to_string())
    }

    fn set_source_text(&mut self, text: String) -> Result<()> {
        let start = self.body.start;
        self.html.replace_range(self.body.clone(), &text);
        self.body = start..start + text.len();
        Ok(())
    }
}

/// Regex for the opening tag of the element with `id`.
fn source_element_regex(id: &str) -> std::result::Result<Regex, regex::Error> {
    let id = regex::escape(id);
    Regex::new(&format!(
        r#"(?i)<([a-z][a-z0-9-]*)\b[^>]*?\sid\s*=\s*(?:"{id}"|'{id}'|{id})(?:[\s/][^>]*)?>"#
    ))
}

/// Byte range between the element's opening tag and its closing tag.
fn locate_body(html: &str, open_tag: &Regex) -> Option<Range<usize>> {
    let caps = open_tag.captures(html)?;
    let open = caps.get(0)?;
    let tag = caps.get(1)?.as_str().to_ascii_lowercase();
    let start = open.end();

    // ASCII lowercasing keeps byte offsets intact.
    let rest = html[start..].to_ascii_lowercase();
    let end = start + rest.find(&format!("</{}", tag))?;

    Some(start..end)
}

/// Kind of file a deck source is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Plain remark markdown.
    Markdown,
    /// HTML page with the markdown in the `source` element.
    Html,
}

impl SourceFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" | "rmd" | "txt" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Detect format from content: a page with a source element is HTML.
    pub fn from_content(text: &str) -> Self {
        if SOURCE_ELEMENT_REGEX.is_match(text) {
            Self::Html
        } else {
            Self::Markdown
        }
    }

    /// Detect format from content, looking for the element with `id`.
    pub fn from_content_with_id(text: &str, id: &str) -> Self {
        if id == DEFAULT_SOURCE_ID {
            return Self::from_content(text);
        }

        match source_element_regex(id) {
            Ok(regex) if regex.is_match(text) => Self::Html,
            _ => Self::Markdown,
        }
    }
}

impl FromStr for SourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s).ok_or_else(|| {
            Error::InvalidOption(format!(
                "source format must be \"markdown\" or \"html\", got \"{}\"",
                s
            ))
        })
    }
}

/// A loaded deck source of either format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDocument {
    Plain(PlainSource),
    Html(HtmlSource),
}

impl SourceDocument {
    /// Wrap text in the source type for `format`.
    pub fn parse(text: String, format: SourceFormat) -> Result<Self> {
        Self::parse_with_element_id(text, format, DEFAULT_SOURCE_ID)
    }

    /// Wrap text in the source type for `format`, reading HTML pages from
    /// the element with `element_id`.
    pub fn parse_with_element_id(
        text: String,
        format: SourceFormat,
        element_id: &str,
    ) -> Result<Self> {
        match format {
            SourceFormat::Markdown => Ok(Self::Plain(PlainSource::new(text))),
            SourceFormat::Html => HtmlSource::with_element_id(text, element_id).map(Self::Html),
        }
    }

    /// Read a file, detecting the format unless one is given.
    ///
    /// Detection tries the extension first, then the content.
    pub fn load(path: &Path, format: Option<SourceFormat>, element_id: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;

        let format = format
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(SourceFormat::from_extension)
            })
            .unwrap_or_else(|| SourceFormat::from_content_with_id(&text, element_id));

        log::debug!("Loading {} as {:?}", path.display(), format);
        Self::parse_with_element_id(text, format, element_id)
    }

    pub fn format(&self) -> SourceFormat {
        match self {
            Self::Plain(_) => SourceFormat::Markdown,
            Self::Html(_) => SourceFormat::Html,
        }
    }

    /// The whole document, page markup included.
    pub fn into_text(self) -> String {
        match self {
            Self::Plain(source) => source.into_text(),
            Self::Html(source) => source.into_html(),
        }
    }

    /// Write the whole document to a file.
    pub fn save(self, path: &Path) -> Result<()> {
        std::fs::write(path, self.into_text())?;
        Ok(())
    }
}

impl SourceText for SourceDocument {
    fn source_text(&self) -> Result<String> {
        match self {
            Self::Plain(source) => source.source_text(),
            Self::Html(source) => source.source_text(),
        }
    }

    fn set_source_text(&mut self, text: String) -> Result<()> {
        match self {
            Self::Plain(source) => source.set_source_text(text),
            Self::Html(source) => source.set_source_text(text),
        }
    }
}
