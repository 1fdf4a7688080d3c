//! Code point resolution and text measurement.
//!
//! Drawing and measuring walk runs through the same [`walk_run`], so the
//! measured width of a run is exactly the distance its glyphs cover.

use std::rc::Rc;

use crate::coords::IntSize;
use crate::surface::{Bitmap, Surface};

use super::bidi::DirectionalRun;
use super::emoji::{
    could_start_emoji_sequence, CodePointCursor, EmojiProvider, VARIATION_SELECTOR_EMOJI,
    VARIATION_SELECTOR_TEXT,
};
use super::font::Font;

pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// What one step of a run draws.
pub(crate) enum Resolved {
    Glyph(char),
    Emoji(Rc<Bitmap>),
    Blank,
}

pub(crate) struct Step {
    pub(crate) resolved: Resolved,
    /// Advance, excluding glyph spacing and kerning.
    pub(crate) width: f32,
}

/// Logical size an emoji image is drawn at: the font's pixel size tall,
/// aspect ratio preserved.
pub fn emoji_size(font: &dyn Font, emoji: &Bitmap) -> IntSize {
    if emoji.height() <= 0 {
        return IntSize::new(0, 0);
    }
    let height = font.pixel_size().ceil() as i32;
    let width = (emoji.width() as f32 * height as f32 / emoji.height() as f32).round() as i32;
    IntSize::new(width, height)
}

#[inline]
fn skip_variation_selector(cursor: &mut CodePointCursor<'_>) {
    if matches!(cursor.peek(1), Some(VARIATION_SELECTOR_TEXT | VARIATION_SELECTOR_EMOJI)) {
        cursor.advance(1);
    }
}

/// Resolves the code point under the cursor, leaving the cursor on the last
/// code point consumed.
///
/// Order: the font's glyph (skipped when the code point could start an
/// emoji and the font has no color glyphs), then the emoji provider, then
/// the font's glyph anyway, then U+FFFD, then nothing.
pub(crate) fn resolve(
    cursor: &mut CodePointCursor<'_>,
    font: &dyn Font,
    emoji: Option<&dyn EmojiProvider>,
) -> Option<Step> {
    let ch = cursor.current()?;
    if ch.is_whitespace() {
        return Some(Step { resolved: Resolved::Blank, width: font.glyph_width(' ') });
    }

    let has_glyph = font.contains_glyph(ch);
    let emoji_first = could_start_emoji_sequence(ch, cursor.peek(1)) && !font.has_color_bitmaps();
    if has_glyph && !emoji_first {
        skip_variation_selector(cursor);
        return Some(Step { resolved: Resolved::Glyph(ch), width: font.glyph_width(ch) });
    }

    if let Some(image) = emoji.and_then(|provider| provider.emoji_for(cursor)) {
        let width = emoji_size(font, &image).width as f32;
        return Some(Step { resolved: Resolved::Emoji(image), width });
    }

    skip_variation_selector(cursor);
    if has_glyph {
        return Some(Step { resolved: Resolved::Glyph(ch), width: font.glyph_width(ch) });
    }
    if font.contains_glyph(REPLACEMENT_CHARACTER) {
        log::debug!("no glyph for {ch:?}, drawing U+FFFD");
        return Some(Step {
            resolved: Resolved::Glyph(REPLACEMENT_CHARACTER),
            width: font.glyph_width(REPLACEMENT_CHARACTER),
        });
    }
    log::debug!("no glyph, emoji or replacement for {ch:?}");
    Some(Step { resolved: Resolved::Blank, width: 0.0 })
}

/// Visits every step of `text` in logical order with the kerning against
/// the previous code point.
pub(crate) fn walk_run(
    text: &[char],
    font: &dyn Font,
    emoji: Option<&dyn EmojiProvider>,
    mut visit: impl FnMut(f32, Step),
) {
    let mut cursor = CodePointCursor::new(text);
    let mut previous = None;
    while let Some(ch) = cursor.current() {
        let kerning = previous.map_or(0.0, |p| font.glyphs_horizontal_kerning(p, ch));
        let Some(step) = resolve(&mut cursor, font, emoji) else { break };
        visit(kerning, step);
        // Kerning pairs the last code point of a sequence with the next one.
        previous = cursor.current();
        cursor.advance(1);
    }
}

/// Width of one run: advances plus kerning plus spacing between glyphs.
pub fn run_width(text: &[char], font: &dyn Font, emoji: Option<&dyn EmojiProvider>) -> f32 {
    let spacing = font.glyph_spacing();
    let mut width = 0.0;
    let mut steps = 0;
    walk_run(text, font, emoji, |kerning, step| {
        width += kerning + step.width + spacing;
        steps += 1;
    });
    if steps > 0 { width - spacing } else { 0.0 }
}

/// Width of a line of runs placed side by side, glyph spacing between runs.
pub fn line_width(
    runs: &[DirectionalRun],
    font: &dyn Font,
    emoji: Option<&dyn EmojiProvider>,
) -> f32 {
    let widths: f32 = runs.iter().map(|run| run_width(run.text(), font, emoji)).sum();
    widths + font.glyph_spacing() * runs.len().saturating_sub(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::IntSize;
    use crate::paint::Color;
    use crate::surface::PixelFormat;
    use crate::text::bidi::{directional_runs, TextDirection};
    use crate::text::{BitmapFont, GlyphBitmap, MapEmojiProvider};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn font() -> BitmapFont {
        let mut f = BitmapFont::new(8.0, 7.0, 9.0).with_glyph_spacing(1.0);
        f.insert_glyph('i', GlyphBitmap::from_ascii(&["#"]));
        f.insert_glyph('m', GlyphBitmap::from_ascii(&["#####"]));
        f.insert_glyph('1', GlyphBitmap::from_ascii(&["##"]));
        f.set_kerning('i', 'm', -1.0);
        f
    }

    fn smiley() -> Rc<Bitmap> {
        let b = Bitmap::new_filled(PixelFormat::Bgra8888, IntSize::new(4, 2), 1, Color::RED);
        Rc::new(b.unwrap())
    }

    #[test]
    fn kerning_and_spacing_add_up() {
        let f = font();
        assert_eq!(run_width(&chars("im"), &f, None), 6.0);
        assert_eq!(run_width(&chars("mi"), &f, None), 7.0);
        assert_eq!(run_width(&chars("i m"), &f, None), 12.0);
        assert_eq!(run_width(&[], &f, None), 0.0);
    }

    #[test]
    fn missing_glyph_falls_back_to_replacement() {
        let mut f = font();
        assert_eq!(run_width(&chars("ixi"), &f, None), 4.0);
        f.insert_glyph(REPLACEMENT_CHARACTER, GlyphBitmap::from_ascii(&["###"]));
        assert_eq!(run_width(&chars("ixi"), &f, None), 7.0);
    }

    #[test]
    fn emoji_width_follows_aspect_ratio() {
        let f = font();
        let mut provider = MapEmojiProvider::new();
        provider.insert("\u{1F600}", smiley());
        assert_eq!(emoji_size(&f, &smiley()), IntSize::new(16, 8));
        assert_eq!(run_width(&chars("i\u{1F600}"), &f, Some(&provider)), 1.0 + 1.0 + 16.0);
    }

    #[test]
    fn kerning_after_sequence_uses_its_last_code_point() {
        let mut f = font();
        f.set_kerning('\u{1F44D}', 'i', -10.0);
        f.set_kerning('\u{1F3FB}', 'i', -3.0);
        let mut provider = MapEmojiProvider::new();
        provider.insert("\u{1F44D}\u{1F3FB}", smiley());
        let text = chars("\u{1F44D}\u{1F3FB}i");
        assert_eq!(run_width(&text, &f, Some(&provider)), 16.0 + 1.0 - 3.0 + 1.0);
    }

    #[test]
    fn variation_selector_is_consumed_with_its_base() {
        let f = font();
        // '1' + VS16 is a keycap candidate; with no provider the text glyph
        // is used and the selector swallowed.
        assert_eq!(run_width(&chars("1\u{FE0F}i"), &f, None), 2.0 + 1.0 + 1.0);
    }

    #[test]
    fn line_width_sums_runs() {
        let f = font();
        let runs = directional_runs(&chars("im im"), TextDirection::Ltr);
        assert_eq!(line_width(&runs, &f, None), run_width(&chars("im im"), &f, None));
    }
}
