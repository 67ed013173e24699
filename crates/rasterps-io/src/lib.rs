//! rasterps-io - Document output for rasterps
//!
//! - [`ps`] - Encapsulated PostScript writer
//! - [`ps::ascii85`] - ASCII85 encoder (streaming and batch) and decoder
//!
//! # See also
//!
//! [`rasterps_core`] for the pixel buffer and page geometry types.

mod error;
pub mod ps;

pub use error::{IoError, IoResult};
pub use ps::{EpsOptions, write_eps, write_eps_file, write_eps_mem};
