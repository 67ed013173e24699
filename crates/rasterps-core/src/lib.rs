//! rasterps Core - Basic data structures for raster-to-EPS encoding
//!
//! This crate provides the types shared by the encoder and its callers:
//!
//! - [`PixelBuffer`] / [`Channels`] - Borrowed raster and its channel layout
//! - [`PrintSize`] - Physical page size in inches
//! - [`DocumentGeometry`] / [`BoundingBox`] - Derived page layout in points
//! - [`Error`] - Precondition violations

pub mod error;
pub mod geometry;
pub mod pix;

pub use error::{Error, Result};
pub use geometry::{BoundingBox, DocumentGeometry, POINTS_PER_INCH, PrintSize};
pub use pix::{Channels, PixelBuffer};
