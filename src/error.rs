//! Error types for the signature-extractor crate.

use std::path::PathBuf;

/// Errors that can occur while extracting a signature.
///
/// An extraction that keeps no components is not an error; it is reported
/// through [`ExtractionReport::bbox`](crate::ExtractionReport::bbox) being `None`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input image does not exist.
    #[error("input image not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// One of the tuning parameters is out of range.
    #[error("invalid extraction options: {0}")]
    InvalidOptions(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while decoding or encoding an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
