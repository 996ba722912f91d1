//! Error types for docsplit library.

use std::io;
use thiserror::Error;

/// Result type alias for docsplit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading snapshots or rendering output.
///
/// The splitting core itself is best-effort and never fails; errors only
/// arise at the boundary where records are read or written.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON or does not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A layout split configuration entry is malformed.
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    /// A segment group key is not of the form `layout_uuid:file_uuid`.
    #[error("Invalid group key: {0}")]
    InvalidGroupKey(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}
