//! The software painter.
//!
//! A [`Painter`] borrows one [`Surface`] for its lifetime and draws into it
//! under a stack of {translation, scale, clip, draw op, font} states.
//!
//! Coordinates passed to drawing calls are logical; they map to physical
//! pixels as `(logical + translation) × scale`.

mod blit;
pub mod curve;
mod fill;
mod glyphs;
mod line;
pub(crate) mod op;
mod rounded;
mod scaled;
mod state;
mod transformed;
mod triangle;

pub use glyphs::TextAlignment;
pub use line::{LineStyle, Stroke};
pub use rounded::CornerOrientation;
pub use scaled::ScalingMode;
pub use state::{DrawOp, PainterState, PainterStateSaver};

use crate::coords::{IntPoint, IntRect};
use crate::surface::Surface;
use crate::text::{EmojiProvider, Font};

pub struct Painter<'a> {
    target: &'a mut dyn Surface,
    /// Top of the stack; always present.
    current: PainterState<'a>,
    saved: Vec<PainterState<'a>>,
    clip_origin: IntRect,
    emoji: Option<&'a dyn EmojiProvider>,
}

impl<'a> Painter<'a> {
    pub fn new(target: &'a mut dyn Surface) -> Self {
        let scale = target.scale();
        assert!(scale > 0, "Painter::new: surface scale must be positive, got {scale}");

        let clip = target.rect();
        log::debug!(
            "painter: {}x{} @{}x, format {:?}",
            clip.width,
            clip.height,
            scale,
            target.format()
        );

        Self {
            target,
            current: PainterState {
                translation: IntPoint::zero(),
                scale,
                clip_rect: clip,
                draw_op: DrawOp::Copy,
                font: None,
            },
            saved: Vec::new(),
            clip_origin: clip,
            emoji: None,
        }
    }

    // ── state stack ───────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> &PainterState<'a> {
        &self.current
    }

    /// Number of entries on the state stack, base entry included.
    #[inline]
    pub fn state_stack_depth(&self) -> usize {
        self.saved.len() + 1
    }

    /// Pushes a copy of the current state.
    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pops the state pushed by the matching `save()`.
    ///
    /// Panics when only the base state is left.
    pub fn restore(&mut self) {
        let Some(previous) = self.saved.pop() else {
            panic!("Painter::restore: no saved state (unbalanced save/restore)");
        };
        self.current = previous;
    }

    /// Runs `f` between a `save()` and a `restore()`.
    pub fn with_saved_state<R>(&mut self, f: impl FnOnce(&mut Painter<'a>) -> R) -> R {
        let mut saver = PainterStateSaver::new(self);
        f(&mut *saver)
    }

    // ── clip & translation ────────────────────────────────────────────────

    /// Narrows the clip to `rect` (in current, translated coordinates).
    pub fn add_clip_rect(&mut self, rect: IntRect) {
        let surface = self.target.rect();
        let s = &mut self.current;
        s.clip_rect = s
            .clip_rect
            .intersected(rect.translated_by(s.translation))
            .intersected(surface);
    }

    /// Resets the clip to the one the painter was created with.
    pub fn clear_clip_rect(&mut self) {
        self.current.clip_rect = self.clip_origin;
    }

    #[inline]
    pub fn clip_rect(&self) -> IntRect {
        self.current.clip_rect
    }

    #[inline]
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.current.translation = self.current.translation.translated(dx, dy);
    }

    #[inline]
    pub fn translate_by(&mut self, delta: IntPoint) {
        self.translate(delta.x, delta.y);
    }

    #[inline]
    pub fn translation(&self) -> IntPoint {
        self.current.translation
    }

    #[inline]
    pub fn scale(&self) -> i32 {
        self.current.scale
    }

    // ── draw op, font, emoji ──────────────────────────────────────────────

    #[inline]
    pub fn draw_op(&self) -> DrawOp {
        self.current.draw_op
    }

    #[inline]
    pub fn set_draw_op(&mut self, op: DrawOp) {
        self.current.draw_op = op;
    }

    #[inline]
    pub fn font(&self) -> Option<&'a dyn Font> {
        self.current.font
    }

    #[inline]
    pub fn set_font(&mut self, font: &'a dyn Font) {
        self.current.font = Some(font);
    }

    /// Emoji images are looked up painter-wide, not per state.
    #[inline]
    pub fn set_emoji_provider(&mut self, provider: &'a dyn EmojiProvider) {
        self.emoji = Some(provider);
    }

    #[inline]
    pub fn emoji_provider(&self) -> Option<&'a dyn EmojiProvider> {
        self.emoji
    }

    // ── target ────────────────────────────────────────────────────────────

    #[inline]
    pub fn target(&self) -> &dyn Surface {
        &*self.target
    }

    // ── coordinate mapping ────────────────────────────────────────────────

    /// Logical rect → physical rect, unclipped.
    #[inline]
    pub(crate) fn to_physical(&self, rect: IntRect) -> IntRect {
        rect.translated_by(self.current.translation).scaled(self.current.scale)
    }

    #[inline]
    pub(crate) fn to_physical_point(&self, p: IntPoint) -> IntPoint {
        (p + self.current.translation).scaled(self.current.scale)
    }

    /// The clip in physical pixels.
    #[inline]
    pub(crate) fn physical_clip(&self) -> IntRect {
        self.current.clip_rect.scaled(self.current.scale)
    }

    /// Logical rect → physical rect clipped to the current clip.
    #[inline]
    pub(crate) fn clipped_physical(&self, rect: IntRect) -> IntRect {
        self.to_physical(rect).intersected(self.physical_clip())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::paint::Color;
    use crate::text::BitmapFont;

    // ── save / restore ────────────────────────────────────────────────────

    #[test]
    fn save_then_restore_is_identity() {
        let mut b = canvas(20, 20);
        let font = BitmapFont::new(8.0, 7.0, 9.0);
        let mut p = Painter::new(&mut b);
        p.translate(3, 4);
        p.add_clip_rect(IntRect::new(0, 0, 10, 10));
        p.set_draw_op(DrawOp::Xor);
        p.set_font(&font);

        let before = *p.state();
        let depth = p.state_stack_depth();
        p.save();
        p.restore();
        assert_eq!(*p.state(), before);
        assert_eq!(p.state_stack_depth(), depth);
    }

    #[test]
    #[should_panic(expected = "unbalanced")]
    fn restore_past_base_panics() {
        let mut b = canvas(4, 4);
        let mut p = Painter::new(&mut b);
        p.restore();
    }

    #[test]
    fn saver_restores_on_drop() {
        let mut b = canvas(8, 8);
        let mut p = Painter::new(&mut b);
        {
            let mut s = PainterStateSaver::new(&mut p);
            s.translate(5, 5);
            s.set_draw_op(DrawOp::Invert);
            assert_eq!(s.state_stack_depth(), 2);
        }
        assert_eq!(p.translation(), IntPoint::zero());
        assert_eq!(p.draw_op(), DrawOp::Copy);
        assert_eq!(p.state_stack_depth(), 1);
    }

    #[test]
    fn with_saved_state_restores_after_closure() {
        let mut b = canvas(8, 8);
        let mut p = Painter::new(&mut b);
        let depth = p.with_saved_state(|p| {
            p.add_clip_rect(IntRect::new(0, 0, 2, 2));
            p.state_stack_depth()
        });
        assert_eq!(depth, 2);
        assert_eq!(p.clip_rect(), IntRect::new(0, 0, 8, 8));
    }

    // ── clip ──────────────────────────────────────────────────────────────

    #[test]
    fn clip_is_translated_and_bounded_by_surface() {
        let mut b = canvas(10, 10);
        let mut p = Painter::new(&mut b);
        p.translate(4, 4);
        p.add_clip_rect(IntRect::new(0, 0, 20, 2));
        assert_eq!(p.clip_rect(), IntRect::new(4, 4, 6, 2));

        p.add_clip_rect(IntRect::new(-10, -10, 5, 5));
        assert!(p.clip_rect().is_empty());

        p.clear_clip_rect();
        assert_eq!(p.clip_rect(), IntRect::new(0, 0, 10, 10));
    }

    #[test]
    fn scale_comes_from_surface() {
        let mut b = canvas_scaled(5, 5, 3);
        let p = Painter::new(&mut b);
        assert_eq!(p.scale(), 3);
        assert_eq!(p.physical_clip(), IntRect::new(0, 0, 15, 15));
        assert_eq!(p.to_physical(IntRect::new(1, 1, 1, 1)), IntRect::new(3, 3, 3, 3));
        assert_eq!(count(&b, Color::WHITE), 225);
    }
}
