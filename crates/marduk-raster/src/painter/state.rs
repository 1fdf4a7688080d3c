use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::coords::{IntPoint, IntRect};
use crate::text::Font;

use super::Painter;

/// How a drawing operation combines its color with the destination.
///
/// Applies to shape fills, lines and monochrome glyphs. Blits and
/// `clear_rect` ignore it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum DrawOp {
    /// Source-over composite (overwrite when the color is opaque).
    #[default]
    Copy,
    /// XOR the destination's color channels with the source color.
    Xor,
    /// Invert the destination's color channels; the source color is unused.
    Invert,
}

/// One entry of the painter's state stack.
///
/// `clip_rect` is stored in absolute logical coordinates (translation
/// already applied) and never extends past the surface.
#[derive(Copy, Clone)]
pub struct PainterState<'a> {
    pub translation: IntPoint,
    pub scale: i32,
    pub clip_rect: IntRect,
    pub draw_op: DrawOp,
    pub font: Option<&'a dyn Font>,
}

impl PartialEq for PainterState<'_> {
    fn eq(&self, other: &Self) -> bool {
        let same_font = match (self.font, other.font) {
            (Some(a), Some(b)) => std::ptr::addr_eq(a as *const dyn Font, b as *const dyn Font),
            (None, None) => true,
            _ => false,
        };
        self.translation == other.translation
            && self.scale == other.scale
            && self.clip_rect == other.clip_rect
            && self.draw_op == other.draw_op
            && same_font
    }
}

impl fmt::Debug for PainterState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PainterState")
            .field("translation", &self.translation)
            .field("scale", &self.scale)
            .field("clip_rect", &self.clip_rect)
            .field("draw_op", &self.draw_op)
            .field("font", &self.font.map(|font| font.pixel_size()))
            .finish()
    }
}

/// Scoped `save()`/`restore()` pair.
///
/// Saves on construction and restores on drop, so the stack stays balanced
/// on early returns and unwinding. Derefs to the painter.
pub struct PainterStateSaver<'p, 'a> {
    painter: &'p mut Painter<'a>,
}

impl<'p, 'a> PainterStateSaver<'p, 'a> {
    pub fn new(painter: &'p mut Painter<'a>) -> Self {
        painter.save();
        Self { painter }
    }
}

impl<'a> Deref for PainterStateSaver<'_, 'a> {
    type Target = Painter<'a>;

    fn deref(&self) -> &Painter<'a> {
        self.painter
    }
}

impl<'a> DerefMut for PainterStateSaver<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Painter<'a> {
        self.painter
    }
}

impl Drop for PainterStateSaver<'_, '_> {
    fn drop(&mut self) {
        self.painter.restore();
    }
}
