//! Pixel buffer - borrowed raster handed to the encoder
//!
//! A [`PixelBuffer`] is a view over caller-owned bytes. Pixels are stored
//! row-major, each one occupying [`Channels::count`] consecutive bytes.
//!
//! # Row order
//!
//! Rows are consumed exactly as stored. Nothing here flips or reorders
//! them; a bottom-up raster (as produced by most GPU read-backs) stays
//! bottom-up.

use crate::error::{Error, Result};

/// Channel layout of a source pixel
///
/// The output document only knows grayscale and RGB image operators, so
/// every layout maps onto one of those. The alpha byte of [`Channels::GrayAlpha`]
/// and [`Channels::Rgba`] is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Channels {
    /// 1 byte per pixel
    Gray = 1,
    /// 2 bytes per pixel: gray, alpha
    GrayAlpha = 2,
    /// 3 bytes per pixel: red, green, blue
    Rgb = 3,
    /// 4 bytes per pixel: red, green, blue, alpha
    Rgba = 4,
}

impl Channels {
    /// Create `Channels` from a raw channel count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChannelCount`] if `count` is not 1, 2, 3 or 4.
    pub fn from_count(count: u32) -> Result<Self> {
        match count {
            1 => Ok(Channels::Gray),
            2 => Ok(Channels::GrayAlpha),
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            _ => Err(Error::InvalidChannelCount(count)),
        }
    }

    /// Number of bytes per source pixel.
    pub fn count(self) -> usize {
        self as usize
    }

    /// Number of channels written to the document (1 or 3).
    pub fn render_channels(self) -> usize {
        match self {
            Channels::Gray | Channels::GrayAlpha => 1,
            Channels::Rgb | Channels::Rgba => 3,
        }
    }

    /// Whether the source layout carries an alpha byte.
    pub fn has_alpha(self) -> bool {
        matches!(self, Channels::GrayAlpha | Channels::Rgba)
    }

    /// Select the bytes of one source pixel that are forwarded to the encoder.
    ///
    /// `pixel` must hold at least [`Channels::count`] bytes.
    #[inline]
    pub fn select(self, pixel: &[u8]) -> &[u8] {
        &pixel[..self.render_channels()]
    }
}

/// Immutable view over a caller-owned raster.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    channels: Channels,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap `data` as a `width` x `height` raster.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] if either dimension is zero
    /// - [`Error::BufferSizeMismatch`] if `data` is not exactly
    ///   `width * height * channels` bytes long
    pub fn new(data: &'a [u8], width: u32, height: u32, channels: Channels) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels.count()))
            .ok_or(Error::InvalidDimension { width, height })?;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Like [`PixelBuffer::new`], taking the channel count as a number.
    pub fn from_raw(data: &'a [u8], width: u32, height: u32, channel_count: u32) -> Result<Self> {
        Self::new(data, width, height, Channels::from_count(channel_count)?)
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the source channel layout.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Get the raw bytes.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Iterate over pixels in storage order.
    pub fn pixels(&self) -> std::slice::ChunksExact<'a, u8> {
        self.data.chunks_exact(self.channels.count())
    }

    /// Iterate over the bytes forwarded to the encoder, in storage order.
    pub fn forwarded_bytes(&self) -> impl Iterator<Item = u8> + 'a {
        let channels = self.channels;
        self.pixels()
            .flat_map(move |pixel| channels.select(pixel).iter().copied())
    }

    /// Number of bytes [`PixelBuffer::forwarded_bytes`] yields.
    pub fn forwarded_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels.render_channels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_from_count() {
        assert_eq!(Channels::from_count(1).unwrap(), Channels::Gray);
        assert_eq!(Channels::from_count(2).unwrap(), Channels::GrayAlpha);
        assert_eq!(Channels::from_count(3).unwrap(), Channels::Rgb);
        assert_eq!(Channels::from_count(4).unwrap(), Channels::Rgba);
        assert!(matches!(
            Channels::from_count(0),
            Err(Error::InvalidChannelCount(0))
        ));
        assert!(matches!(
            Channels::from_count(5),
            Err(Error::InvalidChannelCount(5))
        ));
    }

    #[test]
    fn test_render_channels() {
        assert_eq!(Channels::Gray.render_channels(), 1);
        assert_eq!(Channels::GrayAlpha.render_channels(), 1);
        assert_eq!(Channels::Rgb.render_channels(), 3);
        assert_eq!(Channels::Rgba.render_channels(), 3);
        assert!(Channels::Rgba.has_alpha());
        assert!(!Channels::Rgb.has_alpha());
    }

    #[test]
    fn test_select() {
        assert_eq!(Channels::Gray.select(&[7]), &[7]);
        assert_eq!(Channels::GrayAlpha.select(&[7, 200]), &[7]);
        assert_eq!(Channels::Rgb.select(&[1, 2, 3]), &[1, 2, 3]);
        assert_eq!(Channels::Rgba.select(&[1, 2, 3, 255]), &[1, 2, 3]);
    }

    #[test]
    fn test_buffer_validation() {
        let data = vec![0u8; 12];
        assert!(PixelBuffer::new(&data, 2, 2, Channels::Rgb).is_ok());
        assert!(PixelBuffer::new(&data, 3, 1, Channels::Rgba).is_ok());
        assert!(matches!(
            PixelBuffer::new(&data, 0, 2, Channels::Rgb),
            Err(Error::InvalidDimension { width: 0, height: 2 })
        ));
        assert!(matches!(
            PixelBuffer::new(&data, 2, 2, Channels::Gray),
            Err(Error::BufferSizeMismatch {
                expected: 4,
                actual: 12
            })
        ));
        assert!(matches!(
            PixelBuffer::from_raw(&data, 2, 2, 6),
            Err(Error::InvalidChannelCount(6))
        ));
    }

    #[test]
    fn test_forwarded_bytes() {
        let data = [10, 20, 30, 99, 50, 60, 70, 1];
        let pix = PixelBuffer::new(&data, 2, 1, Channels::Rgba).unwrap();
        let fwd: Vec<u8> = pix.forwarded_bytes().collect();
        assert_eq!(fwd, vec![10, 20, 30, 50, 60, 70]);
        assert_eq!(pix.forwarded_len(), 6);

        let data = [5, 0, 6, 255];
        let pix = PixelBuffer::new(&data, 1, 2, Channels::GrayAlpha).unwrap();
        let fwd: Vec<u8> = pix.forwarded_bytes().collect();
        assert_eq!(fwd, vec![5, 6]);
    }

    #[test]
    fn test_pixels_preserve_storage_order() {
        let data: Vec<u8> = (0..6).collect();
        let pix = PixelBuffer::new(&data, 3, 2, Channels::Gray).unwrap();
        let rows: Vec<&[u8]> = pix.pixels().collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], &[0]);
        assert_eq!(rows[5], &[5]);
    }
}
