//! rasterps - Raw pixel buffers to Encapsulated PostScript
//!
//! Encodes an in-memory raster as a print-ready EPS page. The image data
//! is embedded uncompressed as ASCII85 text, so the output is 7-bit clean.
//!
//! # Overview
//!
//! - [`PixelBuffer`] wraps caller-owned gray, gray+alpha, RGB or RGBA bytes
//! - [`io::write_eps`] writes the document to any `std::io::Write`
//! - [`io::ps::ascii85`] exposes the underlying encoder and a decoder
//!
//! # Example
//!
//! ```
//! use rasterps::io::{EpsOptions, write_eps_mem};
//! use rasterps::{Channels, PixelBuffer};
//!
//! let data = vec![0u8; 4 * 2 * 3];
//! let pixels = PixelBuffer::new(&data, 4, 2, Channels::Rgb).unwrap();
//! let eps = write_eps_mem(&pixels, &EpsOptions::default()).unwrap();
//! assert!(eps.starts_with(b"%!PS-Adobe-3.0 EPSF-3.0"));
//! assert!(eps.ends_with(b"%%EOF\n"));
//! ```

// Re-export core types (used by every caller)
pub use rasterps_core::*;

// Re-export the output crate as a module
pub use rasterps_io as io;
