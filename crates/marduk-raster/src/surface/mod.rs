//! Pixel surfaces.
//!
//! The painter draws into anything implementing [`Surface`]. [`Bitmap`] is
//! the owned, heap-backed implementation used for sources, glyph images and
//! tests.

mod bitmap;
mod format;

pub use bitmap::{Bitmap, BitmapError};
pub use format::{swap_red_blue, PixelFormat};

use crate::coords::IntRect;
use crate::paint::Color;

/// An addressable 2D buffer of packed 32-bit pixels.
///
/// Coordinates passed to `scanline`, `get_pixel` and `set_pixel` are
/// physical. Logical size is physical size divided by `scale()`.
pub trait Surface {
    fn format(&self) -> PixelFormat;
    fn physical_width(&self) -> i32;
    fn physical_height(&self) -> i32;

    /// Integer device-pixel ratio, always `>= 1`.
    fn scale(&self) -> i32;

    /// Bytes per scanline.
    fn pitch(&self) -> usize;

    /// Row `y`, exactly `physical_width()` pixels long.
    fn scanline(&self, y: i32) -> &[u32];
    fn scanline_mut(&mut self, y: i32) -> &mut [u32];

    #[inline]
    fn width(&self) -> i32 {
        self.physical_width() / self.scale()
    }

    #[inline]
    fn height(&self) -> i32 {
        self.physical_height() / self.scale()
    }

    /// Logical bounds.
    #[inline]
    fn rect(&self) -> IntRect {
        IntRect::new(0, 0, self.width(), self.height())
    }

    #[inline]
    fn physical_rect(&self) -> IntRect {
        IntRect::new(0, 0, self.physical_width(), self.physical_height())
    }

    #[inline]
    fn has_alpha_channel(&self) -> bool {
        self.format().has_alpha()
    }

    #[inline]
    fn get_pixel(&self, x: i32, y: i32) -> Color {
        Color::from_pixel(self.scanline(y)[x as usize], self.format())
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let px = color.to_pixel(self.format());
        self.scanline_mut(y)[x as usize] = px;
    }
}
