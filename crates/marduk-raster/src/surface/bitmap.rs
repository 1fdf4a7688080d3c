use std::fmt;

use crate::coords::{IntRect, IntSize};
use crate::paint::Color;

use super::{PixelFormat, Surface};

/// Error returned by the fallible [`Bitmap`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitmapError {
    /// Width or height is zero or negative.
    InvalidSize { width: i32, height: i32 },
    /// Scale factor is zero or negative.
    InvalidScale(i32),
    /// Physical pixel count does not fit in memory.
    SizeOverflow { width: i32, height: i32, scale: i32 },
    /// A pixel buffer handed to [`Bitmap::from_pixels`] has the wrong length.
    PixelCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitmapError::InvalidSize { width, height } => {
                write!(f, "bitmap error: invalid size {width}x{height}")
            }
            BitmapError::InvalidScale(scale) => {
                write!(f, "bitmap error: scale must be positive, got {scale}")
            }
            BitmapError::SizeOverflow { width, height, scale } => {
                write!(f, "bitmap error: {width}x{height}@{scale}x overflows the pixel count")
            }
            BitmapError::PixelCountMismatch { expected, actual } => {
                write!(f, "bitmap error: expected {expected} pixels, got {actual}")
            }
        }
    }
}

impl std::error::Error for BitmapError {}

/// Owned, tightly packed pixel buffer.
///
/// `width`/`height` are physical; the logical size is physical / `scale`.
/// Rows are contiguous with no padding, so `pitch() == width * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    format: PixelFormat,
    width: i32,
    height: i32,
    scale: i32,
    data: Vec<u32>,
}

impl Bitmap {
    fn physical_len(size: IntSize, scale: i32) -> Result<(i32, i32, usize), BitmapError> {
        let IntSize { width, height } = size;
        if width <= 0 || height <= 0 {
            return Err(BitmapError::InvalidSize { width, height });
        }
        if scale <= 0 {
            return Err(BitmapError::InvalidScale(scale));
        }
        let overflow = BitmapError::SizeOverflow { width, height, scale };
        let pw = width.checked_mul(scale).ok_or(overflow.clone())?;
        let ph = height.checked_mul(scale).ok_or(overflow.clone())?;
        let len = (pw as usize).checked_mul(ph as usize).ok_or(overflow)?;
        Ok((pw, ph, len))
    }

    /// Allocates a zeroed bitmap of logical `size` at `scale`.
    pub fn new(format: PixelFormat, size: IntSize, scale: i32) -> Result<Self, BitmapError> {
        let (width, height, len) = Self::physical_len(size, scale)?;
        Ok(Self { format, width, height, scale, data: vec![0; len] })
    }

    /// Allocates a bitmap with every pixel set to `color`.
    pub fn new_filled(
        format: PixelFormat,
        size: IntSize,
        scale: i32,
        color: Color,
    ) -> Result<Self, BitmapError> {
        let (width, height, len) = Self::physical_len(size, scale)?;
        Ok(Self { format, width, height, scale, data: vec![color.to_pixel(format); len] })
    }

    /// Wraps existing packed pixels. `data` must hold exactly
    /// `(size.width * scale) * (size.height * scale)` entries.
    pub fn from_pixels(
        format: PixelFormat,
        size: IntSize,
        scale: i32,
        data: Vec<u32>,
    ) -> Result<Self, BitmapError> {
        let (width, height, len) = Self::physical_len(size, scale)?;
        if data.len() != len {
            return Err(BitmapError::PixelCountMismatch { expected: len, actual: data.len() });
        }
        Ok(Self { format, width, height, scale, data })
    }

    /// Converts an `image` RGBA buffer into a bitmap in `format`. The image
    /// dimensions are physical and must be divisible by `scale`.
    pub fn from_rgba_image(
        img: &image::RgbaImage,
        format: PixelFormat,
        scale: i32,
    ) -> Result<Self, BitmapError> {
        let (w, h) = (img.width() as i32, img.height() as i32);
        if scale <= 0 {
            return Err(BitmapError::InvalidScale(scale));
        }
        if w % scale != 0 || h % scale != 0 {
            return Err(BitmapError::InvalidSize { width: w, height: h });
        }
        let data = img
            .pixels()
            .map(|p| Color::from_rgba(p[0], p[1], p[2], p[3]).to_pixel(format))
            .collect();
        Self::from_pixels(format, IntSize::new(w / scale, h / scale), scale, data)
    }

    /// Copies the pixels into an `image` RGBA buffer (physical size).
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let colors: Vec<Color> =
            self.data.iter().map(|&px| Color::from_pixel(px, self.format)).collect();
        let bytes = bytemuck::cast_slice::<Color, u8>(&colors).to_vec();
        // Length is width * height * 4 by construction.
        image::RgbaImage::from_raw(self.width as u32, self.height as u32, bytes)
            .unwrap_or_else(|| image::RgbaImage::new(self.width as u32, self.height as u32))
    }

    #[inline]
    pub fn size(&self) -> IntSize {
        IntSize::new(self.width / self.scale, self.height / self.scale)
    }

    #[inline]
    pub fn physical_size(&self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    /// Packed pixel at physical `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> u32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Packed pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Raw bytes in native endianness.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn fill(&mut self, color: Color) {
        let px = color.to_pixel(self.format);
        self.data.fill(px);
    }

    /// Copies the logical sub-rectangle `rect` into a new bitmap at the same
    /// scale. Returns `None` when `rect` does not intersect the bitmap.
    pub fn cropped(&self, rect: IntRect) -> Option<Bitmap> {
        let r = rect.intersected(self.rect());
        if r.is_empty() {
            return None;
        }
        let p = r.scaled(self.scale);
        let mut data = Vec::with_capacity(p.area() as usize);
        for y in p.y..p.bottom() {
            data.extend_from_slice(&self.scanline(y)[p.x as usize..p.right() as usize]);
        }
        Some(Bitmap {
            format: self.format,
            width: p.width,
            height: p.height,
            scale: self.scale,
            data,
        })
    }
}

impl Surface for Bitmap {
    #[inline]
    fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    fn physical_width(&self) -> i32 {
        self.width
    }

    #[inline]
    fn physical_height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn scale(&self) -> i32 {
        self.scale
    }

    #[inline]
    fn pitch(&self) -> usize {
        self.width as usize * PixelFormat::BYTES_PER_PIXEL
    }

    #[inline]
    fn scanline(&self, y: i32) -> &[u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.data[start..start + w]
    }

    #[inline]
    fn scanline_mut(&mut self, y: i32) -> &mut [u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.data[start..start + w]
    }
}
