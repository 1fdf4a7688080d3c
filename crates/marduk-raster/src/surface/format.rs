/// Memory layout of one 32-bit pixel.
///
/// Names follow the byte order in memory on a little-endian machine; the
/// packed `u32` values are:
/// - `Bgrx8888`: `0xXXRRGGBB`, the top byte is ignored (reads as opaque)
/// - `Bgra8888`: `0xAARRGGBB`
/// - `Rgba8888`: `0xAABBGGRR`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    Bgrx8888,
    #[default]
    Bgra8888,
    Rgba8888,
}

impl PixelFormat {
    pub const BYTES_PER_PIXEL: usize = 4;

    #[inline]
    pub const fn has_alpha(self) -> bool {
        !matches!(self, PixelFormat::Bgrx8888)
    }

    /// True when red sits in bits 16..24 of the packed pixel.
    #[inline]
    pub const fn is_bgr_order(self) -> bool {
        !matches!(self, PixelFormat::Rgba8888)
    }

    /// Whether copying between the two formats needs a red/blue swap.
    #[inline]
    pub const fn needs_swap(self, other: PixelFormat) -> bool {
        self.is_bgr_order() != other.is_bgr_order()
    }
}

/// Exchanges the red and blue bytes of a packed pixel.
#[inline]
pub const fn swap_red_blue(px: u32) -> u32 {
    (px & 0xff00_ff00) | ((px & 0xff) << 16) | ((px >> 16) & 0xff)
}
