//! Preprocessing for remark.js slide sources.
//!
//! Rewrites Pandoc-style class annotations on fenced code blocks
//! (```` ```{.left .small} ````) and on images
//! (`![](img/plot..wide..png)`) into remark's nested content classes
//! (`.left[.small[ ... ]]`).

pub mod buffer;
pub mod error;
pub mod fenced;
pub mod image;
pub mod patterns;
pub mod source;
pub mod transform;
pub mod types;

pub use buffer::LineBuffer;
pub use error::{Error, Result};
pub use source::{HtmlSource, PlainSource, SourceDocument, SourceFormat, SourceText};
pub use transform::{transform, Preprocessor, DEFAULT_LANGUAGE_MARKER};
pub use types::{ClassList, TransformReport, UnterminatedFence};
