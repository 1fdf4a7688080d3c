use bytemuck::{Pod, Zeroable};

use crate::surface::PixelFormat;

/// Straight-alpha RGBA color with 8-bit channels.
///
/// Invariant:
/// - `r`, `g`, `b` are NOT multiplied by `a`.
///
/// The field order matches the byte order of an RGBA8 buffer, so a slice of
/// colors can be viewed as raw RGBA bytes through `bytemuck`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);
    pub const RED: Color = Color::from_rgb(255, 0, 0);
    pub const GREEN: Color = Color::from_rgb(0, 255, 0);
    pub const BLUE: Color = Color::from_rgb(0, 0, 255);
    pub const MAGENTA: Color = Color::from_rgb(255, 0, 255);

    #[inline]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Unpacks `0xAARRGGBB`.
    #[inline]
    pub const fn from_argb(v: u32) -> Self {
        Self {
            a: (v >> 24) as u8,
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
        }
    }

    /// Unpacks `0xAABBGGRR`.
    #[inline]
    pub const fn from_abgr(v: u32) -> Self {
        Self {
            a: (v >> 24) as u8,
            b: (v >> 16) as u8,
            g: (v >> 8) as u8,
            r: v as u8,
        }
    }

    /// Packs as `0xAARRGGBB`.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Packs as `0xAABBGGRR`.
    #[inline]
    pub const fn to_abgr(self) -> u32 {
        (self.a as u32) << 24 | (self.b as u32) << 16 | (self.g as u32) << 8 | self.r as u32
    }

    /// Decodes a pixel stored in `format`. Formats without alpha read back
    /// fully opaque.
    #[inline]
    pub const fn from_pixel(px: u32, format: PixelFormat) -> Self {
        match format {
            PixelFormat::Bgrx8888 => Self::from_argb(px | 0xff00_0000),
            PixelFormat::Bgra8888 => Self::from_argb(px),
            PixelFormat::Rgba8888 => Self::from_abgr(px),
        }
    }

    /// Encodes for storage in `format`.
    #[inline]
    pub const fn to_pixel(self, format: PixelFormat) -> u32 {
        match format {
            PixelFormat::Bgrx8888 => self.to_argb() | 0xff00_0000,
            PixelFormat::Bgra8888 => self.to_argb(),
            PixelFormat::Rgba8888 => self.to_abgr(),
        }
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Scales alpha by `opacity` (clamped to `[0, 1]`).
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        self.with_alpha(a)
    }

    /// Source-over composite of `src` onto `self`, both straight alpha.
    pub fn blend(self, src: Color) -> Color {
        if self.a == 0 || src.a == 255 {
            return src;
        }
        if src.a == 0 {
            return self;
        }

        let da = self.a as i32;
        let sa = src.a as i32;
        let d = 255 * (da + sa) - da * sa;
        let ch = |dc: u8, sc: u8| -> u8 {
            ((dc as i32 * da * (255 - sa) + 255 * sa * sc as i32) / d) as u8
        };

        Color {
            r: ch(self.r, src.r),
            g: ch(self.g, src.g),
            b: ch(self.b, src.b),
            a: (d / 255) as u8,
        }
    }

    /// Linear interpolation toward `other`; `weight = 0` yields `self`.
    ///
    /// When the alphas differ the color channels are interpolated
    /// premultiplied so a transparent endpoint does not bleed its RGB.
    pub fn mixed_with(self, other: Color, weight: f32) -> Color {
        let mix = |a: f32, b: f32| a + (b - a) * weight;
        let to_u8 = |v: f32| v.round().clamp(0.0, 255.0) as u8;

        if self.a == other.a || self.with_alpha(0) == other.with_alpha(0) {
            return Color {
                r: to_u8(mix(self.r as f32, other.r as f32)),
                g: to_u8(mix(self.g as f32, other.g as f32)),
                b: to_u8(mix(self.b as f32, other.b as f32)),
                a: to_u8(mix(self.a as f32, other.a as f32)),
            };
        }

        let mixed_alpha = mix(self.a as f32, other.a as f32);
        if mixed_alpha <= 0.0 {
            return Color::TRANSPARENT;
        }
        let (sa, oa) = (self.a as f32, other.a as f32);
        let premul = |c: u8, o: u8| to_u8(mix(c as f32 * sa, o as f32 * oa) / mixed_alpha);

        Color {
            r: premul(self.r, other.r),
            g: premul(self.g, other.g),
            b: premul(self.b, other.b),
            a: to_u8(mixed_alpha),
        }
    }

    /// Inverts the color channels, keeping alpha.
    #[inline]
    pub const fn inverted(self) -> Self {
        Self { r: 255 - self.r, g: 255 - self.g, b: 255 - self.b, a: self.a }
    }

    /// XORs the color channels with `other`, keeping `self`'s alpha.
    #[inline]
    pub const fn xored(self, other: Color) -> Self {
        Self { r: self.r ^ other.r, g: self.g ^ other.g, b: self.b ^ other.b, a: self.a }
    }

    /// Multiplies the color channels by `amount`, saturating at 255.
    #[inline]
    pub fn lightened(self, amount: f32) -> Self {
        let l = |c: u8| (c as f32 * amount).min(255.0) as u8;
        Self { r: l(self.r), g: l(self.g), b: l(self.b), a: self.a }
    }

    /// Average of the color channels, keeping alpha.
    #[inline]
    pub const fn to_grayscale(self) -> Self {
        let gray = ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8;
        Self { r: gray, g: gray, b: gray, a: self.a }
    }

}
