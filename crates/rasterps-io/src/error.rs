//! I/O error types
//!
//! Provides a unified error type for document output and ASCII85
//! decoding. Write failures from the caller's stream surface as
//! [`IoError::Io`]; precondition violations found before anything is
//! written surface as [`IoError::Core`].

use thiserror::Error;

/// Error type for encoder I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error from the output stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The encoded data is structurally invalid
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// An error from the core library (bad geometry, buffer size, ...)
    #[error("core error: {0}")]
    Core(#[from] rasterps_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
