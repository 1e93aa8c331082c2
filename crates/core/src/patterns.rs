//! Annotation patterns.
//!
//! Each pattern used by the rewrite lives here as a named static with a
//! small predicate or extractor around it, so the edge-case policies can be
//! tested one pattern at a time.

use regex::Regex;
use std::sync::LazyLock;

/// Three backticks, the fence marker.
pub const FENCE: &str = "```";

/// Opening fence carrying a brace annotation, e.g. ```` ```{.left .small} ````.
///
/// Greedy, so the captured body runs up to the last closing brace.
static FENCE_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\{(.*)\}").unwrap());

/// A class token: a dot, a letter, then word or hyphen characters.
static CLASS_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[a-zA-Z][\w-]*").unwrap());

/// Dotted words that are not classes, like `highlight.output = TRUE`.
static FALSE_CLASS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\.\w+").unwrap());

/// Image whose path embeds classes: `![cap](img/pic..one.two..png)`.
static IMAGE_CLASSES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*\]\(.*\.\.([\w\-\.]+)\.\.\w+\)").unwrap());

/// Check whether a line is a fence (opening or closing).
pub fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

/// Check whether a line opens a fence with a brace annotation.
///
/// Only the prefix is checked; a line like ```` ```{r ```` still counts as an
/// opening and is later skipped for lacking a closing brace.
pub fn is_annotated_fence_open(line: &str) -> bool {
    line.strip_prefix(FENCE).is_some_and(|rest| rest.starts_with('{'))
}

/// Raw text between the braces of an annotated fence, if the braces close.
pub fn fence_annotation(line: &str) -> Option<&str> {
    FENCE_OPEN_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Remove dotted words that only look like classes.
pub fn strip_false_classes(annotation: &str) -> String {
    FALSE_CLASS_REGEX.replace_all(annotation, "").into_owned()
}

/// All class tokens in order, duplicates kept, each with its leading dot.
pub fn class_tokens(text: &str) -> Vec<String> {
    CLASS_TOKEN_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Classes of an annotated fence line, after dropping false classes.
///
/// Returns an empty list when the line has no closed brace annotation.
pub fn fence_classes(line: &str) -> Vec<String> {
    match fence_annotation(line) {
        Some(annotation) => class_tokens(&strip_false_classes(annotation)),
        None => Vec::new(),
    }
}

/// Class names embedded in an image path, without dots.
///
/// Only the first match on the line is used. Empty pieces left by doubled
/// dots are dropped; `None` means there is nothing to rewrite.
pub fn image_classes(line: &str) -> Option<Vec<&str>> {
    let segment = IMAGE_CLASSES_REGEX.captures(line)?.get(1)?.as_str();

    let classes: Vec<&str> = segment.split('.').filter(|c| !c.is_empty()).collect();

    if classes.is_empty() {
        None
    } else {
        Some(classes)
    }
}
