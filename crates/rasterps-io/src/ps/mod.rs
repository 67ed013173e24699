//! Encapsulated PostScript output (write-only)
//!
//! Writes a raw pixel buffer as a single-page EPS document whose image
//! data is ASCII85 encoded and uncompressed.
//!
//! # Document layout
//!
//! - DSC header with a `%%BoundingBox` around the scaled raster
//! - `/name value def` parameters describing size, resolution and position
//! - `translate` / `scale` placing the raster at the top-left of the page
//! - `image` (gray) or `false 3 colorimage` (RGB) reading from
//!   `currentfile /ASCII85Decode filter`
//! - ASCII85 data wrapped at [`EpsOptions::line_width`] characters
//! - `~>`, `restore`, `%%Trailer`, `%%EOF`
//!
//! Gray+alpha sources are written as gray and RGBA sources as RGB; the
//! alpha byte is dropped. Rows are written in storage order; the image
//! matrix maps the first stored row to the bottom of the placed image.
//!
//! # Example
//!
//! ```
//! use rasterps_core::{Channels, PixelBuffer};
//! use rasterps_io::ps::{EpsOptions, write_eps_mem};
//!
//! let data = vec![128u8; 4 * 4 * 3];
//! let pixels = PixelBuffer::new(&data, 4, 4, Channels::Rgb).unwrap();
//! let eps = write_eps_mem(&pixels, &EpsOptions::default().dpi(72)).unwrap();
//! assert!(eps.starts_with(b"%!PS-Adobe-3.0 EPSF-3.0"));
//! ```

pub mod ascii85;

use crate::{IoError, IoResult};
use ascii85::{Ascii85Writer, DEFAULT_LINE_WIDTH, EOD_MARKER, MAX_LINE_WIDTH};
use rasterps_core::{DocumentGeometry, PixelBuffer, PrintSize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default output resolution
const DEFAULT_RESOLUTION: u32 = 300;

/// Default `%%Creator` value
const DEFAULT_CREATOR: &str = "rasterps";

/// Bits per color component; always 8
const BITS_PER_COMPONENT: u32 = 8;

/// EPS output options
#[derive(Debug, Clone)]
pub struct EpsOptions {
    /// Physical page size the raster is placed on
    pub print_size: PrintSize,
    /// Output resolution in pixels per inch
    pub dpi: u32,
    /// ASCII85 characters per line (1 to [`MAX_LINE_WIDTH`])
    pub line_width: usize,
    /// Value of the `%%Creator` comment
    pub creator: String,
    /// Optional `%%Title` comment
    pub title: Option<String>,
}

impl Default for EpsOptions {
    fn default() -> Self {
        Self {
            print_size: PrintSize::LETTER,
            dpi: DEFAULT_RESOLUTION,
            line_width: DEFAULT_LINE_WIDTH,
            creator: DEFAULT_CREATOR.to_string(),
            title: None,
        }
    }
}

impl EpsOptions {
    /// Create options with a specific title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set the physical page size in inches
    pub fn print_size(mut self, width: f64, height: f64) -> Self {
        self.print_size = PrintSize::new(width, height);
        self
    }

    /// Set the output resolution
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the ASCII85 line width
    pub fn line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    /// Set the `%%Creator` comment
    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }
}

/// Write a raster as EPS bytes
///
/// # Arguments
///
/// * `pixels` - The raster to encode
/// * `options` - EPS output options
///
/// # Returns
///
/// The complete document as a byte vector
pub fn write_eps_mem(pixels: &PixelBuffer<'_>, options: &EpsOptions) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::with_capacity(pixels.forwarded_len() * 5 / 4 + 1024);
    write_eps(pixels, &mut buffer, options)?;
    Ok(buffer)
}

/// Write a raster as EPS to a new file at `path`
pub fn write_eps_file<P: AsRef<Path>>(
    pixels: &PixelBuffer<'_>,
    path: P,
    options: &EpsOptions,
) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    write_eps(pixels, BufWriter::new(file), options)
}

/// Write a raster as EPS
///
/// The writer is used append-only and is flushed, but not closed, at the
/// end. Input is validated before the first byte is written; after that
/// the first write error is returned as [`IoError::Io`] and whatever was
/// already written stays in the stream.
///
/// # Arguments
///
/// * `pixels` - The raster to encode
/// * `writer` - Output destination
/// * `options` - EPS output options
pub fn write_eps<W: Write>(
    pixels: &PixelBuffer<'_>,
    mut writer: W,
    options: &EpsOptions,
) -> IoResult<()> {
    if !(1..=MAX_LINE_WIDTH).contains(&options.line_width) {
        return Err(IoError::Core(rasterps_core::Error::InvalidParameter(format!(
            "line width must be between 1 and {}, got {}",
            MAX_LINE_WIDTH, options.line_width
        ))));
    }
    let geometry = DocumentGeometry::new(
        options.print_size,
        pixels.width(),
        pixels.height(),
        options.dpi,
    )?;

    log::debug!(
        "eps: {}x{} px, {:?} -> {} channel(s), {} dpi, bbox {}",
        pixels.width(),
        pixels.height(),
        pixels.channels(),
        pixels.channels().render_channels(),
        geometry.dpi(),
        geometry.bounding_box()
    );
    if geometry.exceeds_page() {
        log::warn!(
            "eps: scaled image {}x{} pt exceeds page {}x{} pt",
            geometry.scaled_width(),
            geometry.scaled_height(),
            geometry.page_width_pt(),
            geometry.page_height_pt()
        );
    }

    writer.write_all(generate_prolog(pixels, &geometry, options).as_bytes())?;

    let mut encoder = Ascii85Writer::with_line_width(&mut writer, options.line_width);
    for byte in pixels.forwarded_bytes() {
        encoder.feed(byte)?;
    }
    encoder.finish()?;

    writer.write_all(generate_epilog().as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Generate the header and image operator preceding the encoded data
fn generate_prolog(
    pixels: &PixelBuffer<'_>,
    geometry: &DocumentGeometry,
    options: &EpsOptions,
) -> String {
    let width = pixels.width();
    let height = pixels.height();
    let channels = pixels.channels().render_channels();
    let (x_pos, y_pos) = geometry.image_position();

    let mut ps = String::new();

    // DSC header
    ps.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
    ps.push_str(&format!("%%BoundingBox: {}\n", geometry.bounding_box()));
    ps.push_str(&format!("%%Creator: {}\n", options.creator));
    if let Some(ref title) = options.title {
        ps.push_str(&format!("%%Title: {}\n", title));
    }
    ps.push_str("%%DocumentData: Clean7Bit\n");
    ps.push_str("%%LanguageLevel: 2\n");
    ps.push_str("%%EndComments\n");

    // Discards unread data when the reader never sees `~>`
    ps.push_str("/eodflush {currentfile flushfile} bind def\n");
    ps.push_str("save\n");

    // Parameters
    ps.push_str(&format!("/imwidth {} def\n", width));
    ps.push_str(&format!("/imheight {} def\n", height));
    ps.push_str(&format!("/picwidth {:.6} def\n", geometry.placed_width()));
    ps.push_str(&format!("/picheight {:.6} def\n", geometry.placed_height()));
    ps.push_str(&format!("/dpi {} def\n", geometry.dpi()));
    ps.push_str(&format!("/scalefactor {:.6} def\n", geometry.scale_factor()));
    ps.push_str(&format!("/channels {} def\n", channels));
    ps.push_str("/xoffset 0 def\n");
    ps.push_str("/yoffset 0 def\n");
    ps.push_str(&format!("/rowbytes {} def\n", width as usize * channels));
    ps.push_str(&format!("/pageheight {} def\n", geometry.page_height_pt()));
    ps.push_str(&format!("/pagewidth {} def\n", geometry.page_width_pt()));
    ps.push_str(&format!("/xpos {} def\n", x_pos));
    ps.push_str(&format!("/ypos {} def\n", y_pos));

    // Placement
    ps.push_str("xpos ypos translate\n");
    ps.push_str("picwidth picheight scale\n");

    // Image operator
    ps.push_str(&format!(
        "{} {} {} [{} 0 0 {} 0 0] currentfile /ASCII85Decode filter\n",
        width, height, BITS_PER_COMPONENT, width, height
    ));
    if channels == 3 {
        ps.push_str("false 3\ncolorimage\n");
    } else {
        ps.push_str("image\n");
    }

    ps
}

/// Generate everything following the encoded data
fn generate_epilog() -> String {
    format!("{}\nrestore\n%%Trailer\n%%EOF\n", EOD_MARKER)
}
