//! Per-pixel write strategies.
//!
//! A [`DrawOp`](super::DrawOp) is resolved to one of these types once per
//! drawing call; the pixel loops are generic over [`PixelOp`] so each op gets
//! its own monomorphized loop with no per-pixel dispatch.

use crate::coords::IntRect;
use crate::paint::Color;
use crate::surface::{PixelFormat, Surface};

pub(crate) trait PixelOp {
    fn new(color: Color, format: PixelFormat) -> Self;

    fn apply(&self, dst: u32) -> u32;

    #[inline]
    fn apply_span(&self, span: &mut [u32]) {
        for px in span {
            *px = self.apply(*px);
        }
    }
}

/// `DrawOp::Copy`: source-over blend, or a plain store for opaque colors.
pub(crate) struct SourceOver {
    color: Color,
    packed: u32,
    format: PixelFormat,
}

impl PixelOp for SourceOver {
    #[inline]
    fn new(color: Color, format: PixelFormat) -> Self {
        Self { color, packed: color.to_pixel(format), format }
    }

    #[inline]
    fn apply(&self, dst: u32) -> u32 {
        if self.color.is_opaque() {
            return self.packed;
        }
        Color::from_pixel(dst, self.format).blend(self.color).to_pixel(self.format)
    }

    #[inline]
    fn apply_span(&self, span: &mut [u32]) {
        if self.color.is_opaque() {
            span.fill(self.packed);
            return;
        }
        for px in span {
            *px = Color::from_pixel(*px, self.format).blend(self.color).to_pixel(self.format);
        }
    }
}

/// `DrawOp::Xor`: flips the destination's color bits set in the source.
pub(crate) struct XorOp {
    mask: u32,
}

impl PixelOp for XorOp {
    #[inline]
    fn new(color: Color, format: PixelFormat) -> Self {
        Self { mask: color.to_pixel(format) & 0x00ff_ffff }
    }

    #[inline]
    fn apply(&self, dst: u32) -> u32 {
        dst ^ self.mask
    }
}

/// `DrawOp::Invert`: inverts the destination's color channels.
pub(crate) struct InvertOp;

impl PixelOp for InvertOp {
    #[inline]
    fn new(_: Color, _: PixelFormat) -> Self {
        InvertOp
    }

    #[inline]
    fn apply(&self, dst: u32) -> u32 {
        dst ^ 0x00ff_ffff
    }
}

/// Resolves a `DrawOp` to a concrete [`PixelOp`] type, aliased as `$O`
/// inside `$body`.
macro_rules! with_pixel_op {
    ($draw_op:expr, $O:ident => $body:expr) => {
        match $draw_op {
            $crate::painter::DrawOp::Copy => {
                type $O = $crate::painter::op::SourceOver;
                $body
            }
            $crate::painter::DrawOp::Xor => {
                type $O = $crate::painter::op::XorOp;
                $body
            }
            $crate::painter::DrawOp::Invert => {
                type $O = $crate::painter::op::InvertOp;
                $body
            }
        }
    };
}

pub(crate) use with_pixel_op;

/// Applies `op` to every pixel of `rect`. `rect` is physical and must already
/// be clipped to the surface.
#[inline]
pub(crate) fn fill_physical<O: PixelOp>(target: &mut dyn Surface, rect: IntRect, op: &O) {
    if rect.is_empty() {
        return;
    }
    let (x0, x1) = (rect.x as usize, rect.right() as usize);
    for y in rect.y..rect.bottom() {
        op.apply_span(&mut target.scanline_mut(y)[x0..x1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const F: PixelFormat = PixelFormat::Bgra8888;

    #[test]
    fn source_over_stores_opaque_and_blends_translucent() {
        let dst = Color::BLACK.to_pixel(F);
        assert_eq!(SourceOver::new(Color::RED, F).apply(dst), Color::RED.to_pixel(F));

        let half = SourceOver::new(Color::WHITE.with_alpha(128), F).apply(dst);
        assert_eq!(Color::from_pixel(half, F), Color::from_rgb(128, 128, 128));
    }

    #[test]
    fn xor_keeps_alpha_and_is_self_inverse() {
        let dst = Color::from_rgba(0x12, 0x34, 0x56, 0x78).to_pixel(F);
        let op = XorOp::new(Color::from_rgb(0xff, 0x00, 0x0f), F);
        let once = op.apply(dst);
        assert_eq!(Color::from_pixel(once, F), Color::from_rgba(0xed, 0x34, 0x59, 0x78));
        assert_eq!(op.apply(once), dst);
    }

    #[test]
    fn invert_matches_color_inverted() {
        let c = Color::from_rgba(10, 200, 30, 99);
        let out = InvertOp::new(Color::TRANSPARENT, F).apply(c.to_pixel(F));
        assert_eq!(Color::from_pixel(out, F), c.inverted());
    }
}
