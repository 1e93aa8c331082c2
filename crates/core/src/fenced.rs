//! Fenced code blocks annotated with classes.
//!
//! ````text
//! ```{.left .small}          .left[.small[
//! x <- 1              =>     ```
//! ```                        x <- 1
//!                            ```
//!                            ]]
//! ````

use crate::buffer::LineBuffer;
use crate::patterns::{self, FENCE};
use crate::types::{ClassList, UnterminatedFence};

/// Result of looking at an annotated fence opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenceOutcome {
    /// The block was replaced in the buffer.
    Rewritten(FenceRewrite),
    /// The annotation held no classes; nothing changed.
    NoClasses {
        /// Index of the closing fence, `None` if the block never closes.
        closing_fence: Option<usize>,
    },
    /// No closing fence and the policy says to leave it alone.
    SkippedUnterminated,
}

/// Details of a rewritten block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceRewrite {
    /// Classes that became bracket openers, language marker removed.
    pub classes: ClassList,
    /// Whether the opening fence carries the language tag.
    pub language_tagged: bool,
    /// Index of the closing fence consumed, `None` if the block ran to the end.
    pub closing_fence: Option<usize>,
    /// Number of lines that replaced the original block.
    pub replacement_len: usize,
}

/// Rewrite the annotated fence opening at `index`.
///
/// The caller must have checked [`patterns::is_annotated_fence_open`].
/// Lines before `index` are never touched.
pub fn annotate_fence(
    buffer: &mut LineBuffer,
    index: usize,
    language_marker: &str,
    unterminated: UnterminatedFence,
) -> FenceOutcome {
    let Some(line) = buffer.get(index) else {
        return FenceOutcome::NoClasses {
            closing_fence: None,
        };
    };

    let closing_fence = buffer.find_closing_fence(index);
    if closing_fence.is_none() {
        log::warn!("Annotated fence at line {} is never closed", index + 1);
    }

    let mut classes = ClassList::new(patterns::fence_classes(line));
    if classes.is_empty() {
        log::trace!("Fence at line {} has no classes", index + 1);
        return FenceOutcome::NoClasses { closing_fence };
    }

    let end = match closing_fence {
        Some(j) => j,
        None if unterminated == UnterminatedFence::Skip => {
            log::debug!("Leaving unclosed fence at line {} unchanged", index + 1);
            return FenceOutcome::SkippedUnterminated;
        }
        None => buffer.len() - 1,
    };

    let language_tagged = classes.remove_all(&format!(".{}", language_marker));
    let top_fence = if language_tagged {
        format!("{}{}", FENCE, language_marker)
    } else {
        FENCE.to_string()
    };

    let replacement = build_replacement(&classes, top_fence, &buffer.lines()[index + 1..=end]);
    let replacement_len = replacement.len();

    log::debug!(
        "Fence at lines {}-{}: {} class(es){}",
        index + 1,
        end + 1,
        classes.len(),
        if language_tagged { ", language tagged" } else { "" }
    );

    buffer.replace_range(index..=end, replacement);

    FenceOutcome::Rewritten(FenceRewrite {
        classes,
        language_tagged,
        closing_fence,
        replacement_len,
    })
}

/// Openers, the new top fence, the old body (closing fence included), closers.
///
/// The opener and closer lines are always present, so a block whose only
/// class was the language marker is framed by two empty lines.
fn build_replacement(classes: &ClassList, top_fence: String, body: &[String]) -> Vec<String> {
    let mut replacement = Vec::with_capacity(body.len() + 3);

    replacement.push(classes.opening_line());
    replacement.push(top_fence);
    replacement.extend(body.iter().cloned());
    replacement.push(classes.closing_line());

    replacement
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(text: &str, index: usize) -> (FenceOutcome, String) {
        let mut buffer = LineBuffer::from_text(text);
        let outcome = annotate_fence(&mut buffer, index, "r", UnterminatedFence::Extend);
        (outcome, buffer.into_text())
    }

    #[test]
    fn test_two_classes_bare_fence() {
        let (outcome, text) = rewrite("```{.a .b}\nbody\n```", 0);
        assert_eq!(text, ".a[.b[\n```\nbody\n```\n]]");

        let FenceOutcome::Rewritten(rw) = outcome else {
            panic!("expected a rewrite");
        };
        assert!(!rw.language_tagged);
        assert_eq!(rw.closing_fence, Some(2));
        assert_eq!(rw.replacement_len, 5);
    }

    #[test]
    fn test_language_marker_switches_fence() {
        let (_, text) = rewrite("```{.r .highlight}\nx <- 1\n```", 0);
        assert_eq!(text, ".highlight[\n```r\nx <- 1\n```\n]");
    }

    #[test]
    fn test_language_marker_only() {
        let (outcome, text) = rewrite("```{.r}\nx <- 1\n```", 0);
        assert_eq!(text, "\n```r\nx <- 1\n```\n");

        let FenceOutcome::Rewritten(rw) = outcome else {
            panic!("expected a rewrite");
        };
        assert!(rw.language_tagged);
        assert!(rw.classes.is_empty());
        assert_eq!(rw.replacement_len, 5);
    }

    #[test]
    fn test_language_marker_is_case_sensitive() {
        let (_, text) = rewrite("```{.R}\nx\n```", 0);
        assert_eq!(text, ".R[\n```\nx\n```\n]");
    }

    #[test]
    fn test_custom_language_marker() {
        let mut buffer = LineBuffer::from_text("```{.python .wide}\nprint(1)\n```");
        annotate_fence(&mut buffer, 0, "python", UnterminatedFence::Extend);
        assert_eq!(buffer.into_text(), ".wide[\n```python\nprint(1)\n```\n]");
    }

    #[test]
    fn test_no_classes_is_noop() {
        let source = "```{r tidy=FALSE}\nx\n```";
        let (outcome, text) = rewrite(source, 0);
        assert_eq!(
            outcome,
            FenceOutcome::NoClasses {
                closing_fence: Some(2)
            }
        );
        assert_eq!(text, source);
    }

    #[test]
    fn test_false_class_is_ignored() {
        let source = "```{r highlight.output=TRUE}\nx\n```";
        let (outcome, text) = rewrite(source, 0);
        assert_eq!(
            outcome,
            FenceOutcome::NoClasses {
                closing_fence: Some(2)
            }
        );
        assert_eq!(text, source);
    }

    #[test]
    fn test_unclosed_brace_is_noop() {
        let source = "```{.left\nx\n```";
        let (outcome, text) = rewrite(source, 0);
        assert_eq!(
            outcome,
            FenceOutcome::NoClasses {
                closing_fence: Some(2)
            }
        );
        assert_eq!(text, source);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let (_, text) = rewrite("```{.a .a}\nx\n```", 0);
        assert_eq!(text, ".a[.a[\n```\nx\n```\n]]");
    }

    #[test]
    fn test_closing_fence_with_trailing_content() {
        let (_, text) = rewrite("```{.a}\nx\n```{.b}\nafter", 0);
        assert_eq!(text, ".a[\n```\nx\n```{.b}\n]\nafter");
    }

    #[test]
    fn test_only_block_lines_change() {
        let (_, text) = rewrite("before\n```{.a}\nx\n```\nafter", 1);
        assert_eq!(text, "before\n.a[\n```\nx\n```\n]\nafter");
    }

    #[test]
    fn test_unterminated_extends_to_end() {
        let (outcome, text) = rewrite("```{.a}\nx\ny", 0);
        assert_eq!(text, ".a[\n```\nx\ny\n]");

        let FenceOutcome::Rewritten(rw) = outcome else {
            panic!("expected a rewrite");
        };
        assert_eq!(rw.closing_fence, None);
    }

    #[test]
    fn test_unterminated_on_last_line() {
        let (_, text) = rewrite("```{.a}", 0);
        assert_eq!(text, ".a[\n```\n]");
    }

    #[test]
    fn test_unterminated_without_classes_reports_missing_close() {
        let source = "```{r tidy=FALSE}\nx";
        let (outcome, text) = rewrite(source, 0);
        assert_eq!(
            outcome,
            FenceOutcome::NoClasses {
                closing_fence: None
            }
        );
        assert_eq!(text, source);
    }

    #[test]
    fn test_unterminated_skip_policy() {
        let source = "```{.a}\nx\ny";
        let mut buffer = LineBuffer::from_text(source);
        let outcome = annotate_fence(&mut buffer, 0, "r", UnterminatedFence::Skip);
        assert_eq!(outcome, FenceOutcome::SkippedUnterminated);
        assert_eq!(buffer.into_text(), source);
    }
}
