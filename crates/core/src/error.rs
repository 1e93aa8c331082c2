//! Error types for slide source preprocessing.
//!
//! The rewrite itself never fails; these errors come from reading and
//! writing the deck source around it.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or storing a slide source.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write the underlying file or stream.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The HTML page has no element holding the deck source.
    #[error("No source element with id \"{0}\" found")]
    SourceElementNotFound(String),

    /// An option value could not be parsed.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}
