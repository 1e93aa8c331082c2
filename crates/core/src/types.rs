//! Domain types for class annotations and rewrite results.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordered class tokens attached to a block, each with its leading dot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassList {
    classes: Vec<String>,
}

impl ClassList {
    /// Create a class list from dotted tokens such as `.left`.
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Create a class list from bare names, adding the leading dot.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            classes: names.into_iter().map(|n| format!(".{}", n)).collect(),
        }
    }

    /// Number of classes (and so of bracket pairs).
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Remove every occurrence of a token. Returns true if any was removed.
    pub fn remove_all(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() != before
    }

    /// Bracket openers for every class, e.g. `.a[.b[`.
    pub fn opening_line(&self) -> String {
        self.classes.iter().map(|c| format!("{}[", c)).collect()
    }

    /// One closing bracket per class, e.g. `]]`.
    pub fn closing_line(&self) -> String {
        "]".repeat(self.classes.len())
    }
}

/// What to do with an annotated fence that never closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnterminatedFence {
    /// Treat every remaining line as the block body.
    #[default]
    Extend,
    /// Leave the block as written.
    Skip,
}

impl FromStr for UnterminatedFence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "extend" => Ok(Self::Extend),
            "skip" => Ok(Self::Skip),
            other => Err(Error::InvalidOption(format!(
                "unterminated fence policy must be \"extend\" or \"skip\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Counts of what a single preprocessing run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformReport {
    /// Annotated fences rewritten into bracket classes.
    pub fenced_blocks: usize,

    /// Rewritten fences that switched to the language-tagged fence.
    pub language_fences: usize,

    /// Image lines wrapped in bracket classes.
    pub images: usize,

    /// Annotated fences left alone because no classes were found.
    pub skipped_fences: usize,

    /// Annotated fences with no closing fence below them.
    pub unterminated_fences: usize,

    /// Line count of the input.
    pub line_count_before: usize,

    /// Line count of the output.
    pub line_count_after: usize,
}

impl TransformReport {
    /// Whether the run changed anything.
    pub fn has_rewrites(&self) -> bool {
        self.fenced_blocks > 0 || self.images > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_brackets() {
        let classes = ClassList::new(vec![".foo".to_string(), ".bar".to_string()]);
        assert_eq!(classes.opening_line(), ".foo[.bar[");
        assert_eq!(classes.closing_line(), "]]");
    }

    #[test]
    fn test_class_list_empty_brackets() {
        let classes = ClassList::default();
        assert_eq!(classes.opening_line(), "");
        assert_eq!(classes.closing_line(), "");
    }

    #[test]
    fn test_class_list_from_names() {
        let classes = ClassList::from_names(["one", "two"]);
        assert_eq!(classes.opening_line(), ".one[.two[");
    }

    #[test]
    fn test_class_list_remove_all() {
        let mut classes = ClassList::new(vec![
            ".r".to_string(),
            ".small".to_string(),
            ".r".to_string(),
        ]);
        assert!(classes.remove_all(".r"));
        assert_eq!(classes.opening_line(), ".small[");
        assert!(!classes.remove_all(".r"));
    }

    #[test]
    fn test_unterminated_fence_from_str() {
        assert_eq!("extend".parse::<UnterminatedFence>().unwrap(), UnterminatedFence::Extend);
        assert_eq!("SKIP".parse::<UnterminatedFence>().unwrap(), UnterminatedFence::Skip);
        assert!("close".parse::<UnterminatedFence>().is_err());
    }

    #[test]
    fn test_report_has_rewrites() {
        let mut report = TransformReport::default();
        assert!(!report.has_rewrites());
        report.images = 1;
        assert!(report.has_rewrites());
    }
}
