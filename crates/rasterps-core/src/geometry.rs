//! Page geometry for a raster placed on a printed page
//!
//! All coordinates are PostScript points (72 per inch). The raster is
//! scaled from its pixel size to the requested output resolution and
//! anchored at the top-left corner of the page.

use crate::error::{Error, Result};

/// Points per inch in PostScript coordinates
pub const POINTS_PER_INCH: u32 = 72;

/// Physical print size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintSize {
    /// Page width in inches
    pub width: f64,
    /// Page height in inches
    pub height: f64,
}

impl PrintSize {
    /// US Letter, 8.5 x 11 inches
    pub const LETTER: PrintSize = PrintSize {
        width: 8.5,
        height: 11.0,
    };

    /// Create a print size in inches.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check that both sides are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] otherwise.
    pub fn validate(&self) -> Result<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!(
                "print size must be positive, got {} x {} in",
                self.width, self.height
            )))
        }
    }

    /// Page width in points, rounded up.
    pub fn width_pt(&self) -> u32 {
        inches_to_points(self.width)
    }

    /// Page height in points, rounded up.
    pub fn height_pt(&self) -> u32 {
        inches_to_points(self.height)
    }
}

impl Default for PrintSize {
    fn default() -> Self {
        Self::LETTER
    }
}

fn inches_to_points(inches: f64) -> u32 {
    (inches * POINTS_PER_INCH as f64).ceil() as u32
}

/// `%%BoundingBox` values in points.
///
/// `bottom` goes negative when the scaled raster is taller than the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i64,
    pub bottom: i64,
    pub right: i64,
    pub top: i64,
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.left, self.bottom, self.right, self.top)
    }
}

/// Derived, read-only layout of one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentGeometry {
    print_size: PrintSize,
    image_width: u32,
    image_height: u32,
    dpi: u32,
}

impl DocumentGeometry {
    /// Compute the layout of a `image_width` x `image_height` raster printed
    /// at `dpi` on a page of `print_size`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] for a non-positive print size or zero DPI
    /// - [`Error::InvalidDimension`] for a zero image dimension
    pub fn new(
        print_size: PrintSize,
        image_width: u32,
        image_height: u32,
        dpi: u32,
    ) -> Result<Self> {
        print_size.validate()?;
        if dpi == 0 {
            return Err(Error::InvalidParameter(
                "resolution must be positive".to_string(),
            ));
        }
        if image_width == 0 || image_height == 0 {
            return Err(Error::InvalidDimension {
                width: image_width,
                height: image_height,
            });
        }
        Ok(Self {
            print_size,
            image_width,
            image_height,
            dpi,
        })
    }

    /// Get the physical print size.
    pub fn print_size(&self) -> PrintSize {
        self.print_size
    }

    /// Page width in points.
    pub fn page_width_pt(&self) -> u32 {
        self.print_size.width_pt()
    }

    /// Page height in points.
    pub fn page_height_pt(&self) -> u32 {
        self.print_size.height_pt()
    }

    /// Raster width in pixels.
    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    /// Raster height in pixels.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Requested output resolution.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Points per pixel: `72 / dpi`.
    pub fn scale_factor(&self) -> f64 {
        POINTS_PER_INCH as f64 / self.dpi as f64
    }

    /// Exact placed width in points.
    pub fn placed_width(&self) -> f64 {
        self.image_width as f64 * self.scale_factor()
    }

    /// Exact placed height in points.
    pub fn placed_height(&self) -> f64 {
        self.image_height as f64 * self.scale_factor()
    }

    /// Scaled footprint width: `ceil(width * 72 / dpi)`.
    pub fn scaled_width(&self) -> u32 {
        scale_up(self.image_width, self.dpi)
    }

    /// Scaled footprint height: `ceil(height * 72 / dpi)`.
    pub fn scaled_height(&self) -> u32 {
        scale_up(self.image_height, self.dpi)
    }

    /// Lower-left corner of the placed raster.
    pub fn image_position(&self) -> (i64, i64) {
        (
            0,
            self.page_height_pt() as i64 - self.scaled_height() as i64,
        )
    }

    /// Bounding box enclosing the placed raster.
    pub fn bounding_box(&self) -> BoundingBox {
        let (left, bottom) = self.image_position();
        BoundingBox {
            left,
            bottom,
            right: self.scaled_width() as i64,
            top: self.page_height_pt() as i64,
        }
    }

    /// Whether the scaled raster spills past the page edges.
    pub fn exceeds_page(&self) -> bool {
        self.scaled_width() > self.page_width_pt() || self.scaled_height() > self.page_height_pt()
    }
}

fn scale_up(pixels: u32, dpi: u32) -> u32 {
    (pixels as f64 * POINTS_PER_INCH as f64 / dpi as f64).ceil() as u32
}
