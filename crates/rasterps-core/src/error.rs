//! Error types for rasterps-core
//!
//! Provides a unified error type for buffer and page-geometry validation.
//! Every variant describes a caller-side precondition that was not met;
//! nothing here is recoverable by retrying the same call.

use thiserror::Error;

/// rasterps-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Channel count outside 1..=4
    #[error("invalid channel count: {0} (expected 1, 2, 3 or 4)")]
    InvalidChannelCount(u32),

    /// Pixel data length does not match `width * height * channels`
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for rasterps-core operations
pub type Result<T> = std::result::Result<T, Error>;
