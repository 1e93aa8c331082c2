//! Mutable line buffer the rewrite splices into.

use crate::patterns;
use std::ops::RangeInclusive;

/// The deck source split on `\n`, edited in place during a backward scan.
///
/// Splicing at index `i` only moves lines after `i`, so a scan that walks
/// from the end toward the start never sees an index it already visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Split text on newlines. An empty string is a single empty line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// First fence line strictly after `index`.
    pub fn find_closing_fence(&self, index: usize) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, line)| patterns::is_fence(line))
            .map(|(j, _)| j)
    }

    /// Replace lines `range` with `replacement`.
    ///
    /// The range end is clamped to the last line.
    pub fn replace_range(&mut self, range: RangeInclusive<usize>, replacement: Vec<String>) {
        let start = *range.start();
        let end = (*range.end()).min(self.lines.len().saturating_sub(1));
        self.lines.splice(start..=end, replacement);
    }

    /// Replace the single line at `index` with `replacement`.
    pub fn replace_line(&mut self, index: usize, replacement: Vec<String>) {
        self.replace_range(index..=index, replacement);
    }

    /// Join the lines back with `\n`.
    pub fn into_text(self) -> String {
        self.lines.join("\n")
    }
}
