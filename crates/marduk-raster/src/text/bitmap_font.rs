use std::collections::HashMap;
use std::rc::Rc;

use crate::surface::{Bitmap, Surface};

use super::font::{Font, Glyph, GlyphBitmap, GlyphImage};

#[derive(Debug, Clone)]
struct MonoGlyph {
    bitmap: GlyphBitmap,
    advance: f32,
    left_bearing: f32,
    ascent: f32,
}

#[derive(Debug, Clone)]
struct ColorGlyph {
    bitmap: Rc<Bitmap>,
    advance: f32,
}

/// An in-memory monochrome font.
///
/// Glyph bitmaps hang from the top of the line by default: their top row
/// sits `ascent` above the baseline. Color glyphs are scaled to their
/// advance width when drawn.
#[derive(Debug, Clone)]
pub struct BitmapFont {
    pixel_size: f32,
    ascent: f32,
    line_height: f32,
    glyph_spacing: f32,
    space_width: f32,
    fixed_width: Option<f32>,
    glyphs: HashMap<char, MonoGlyph>,
    color_glyphs: HashMap<char, ColorGlyph>,
    kerning: HashMap<(char, char), f32>,
}

impl BitmapFont {
    pub fn new(pixel_size: f32, ascent: f32, line_height: f32) -> Self {
        Self {
            pixel_size,
            ascent,
            line_height,
            glyph_spacing: 0.0,
            space_width: (pixel_size / 2.0).floor(),
            fixed_width: None,
            glyphs: HashMap::new(),
            color_glyphs: HashMap::new(),
            kerning: HashMap::new(),
        }
    }

    pub fn with_glyph_spacing(mut self, spacing: f32) -> Self {
        self.glyph_spacing = spacing;
        self
    }

    /// Width of whitespace characters that have no glyph of their own.
    pub fn with_space_width(mut self, width: f32) -> Self {
        self.space_width = width;
        self
    }

    /// Makes every glyph advance by `width`.
    pub fn with_fixed_width(mut self, width: f32) -> Self {
        self.fixed_width = Some(width);
        self
    }

    /// Adds a glyph whose advance is its bitmap width.
    pub fn insert_glyph(&mut self, ch: char, bitmap: GlyphBitmap) {
        let advance = bitmap.width() as f32;
        let ascent = self.ascent;
        self.insert_glyph_with_metrics(ch, bitmap, advance, 0.0, ascent);
    }

    pub fn insert_glyph_with_metrics(
        &mut self,
        ch: char,
        bitmap: GlyphBitmap,
        advance: f32,
        left_bearing: f32,
        ascent: f32,
    ) {
        self.glyphs.insert(ch, MonoGlyph { bitmap, advance, left_bearing, ascent });
    }

    /// Adds a color glyph. Color glyphs take precedence over mono ones.
    pub fn insert_color_glyph(&mut self, ch: char, bitmap: Rc<Bitmap>) {
        let advance = if bitmap.height() > 0 {
            (bitmap.width() as f32 * self.pixel_size / bitmap.height() as f32).round()
        } else {
            0.0
        };
        self.color_glyphs.insert(ch, ColorGlyph { bitmap, advance });
    }

    pub fn set_kerning(&mut self, left: char, right: char, amount: f32) {
        self.kerning.insert((left, right), amount);
    }

    #[inline]
    fn advance_of(&self, natural: f32) -> f32 {
        self.fixed_width.unwrap_or(natural)
    }
}

impl Font for BitmapFont {
    fn glyph(&self, ch: char, _subpixel_offset: f32) -> Option<Glyph> {
        if let Some(color) = self.color_glyphs.get(&ch) {
            return Some(Glyph {
                image: GlyphImage::Color(Rc::clone(&color.bitmap)),
                left_bearing: 0.0,
                advance: self.advance_of(color.advance),
                ascent: self.ascent,
            });
        }
        let g = self.glyphs.get(&ch)?;
        Some(Glyph {
            image: GlyphImage::Mono(g.bitmap.clone()),
            left_bearing: g.left_bearing,
            advance: self.advance_of(g.advance),
            ascent: g.ascent,
        })
    }

    fn contains_glyph(&self, ch: char) -> bool {
        self.color_glyphs.contains_key(&ch) || self.glyphs.contains_key(&ch)
    }

    fn glyph_width(&self, ch: char) -> f32 {
        if let Some(color) = self.color_glyphs.get(&ch) {
            return self.advance_of(color.advance);
        }
        match self.glyphs.get(&ch) {
            Some(g) => self.advance_of(g.advance),
            None if ch.is_whitespace() => self.advance_of(self.space_width),
            None => 0.0,
        }
    }

    fn is_fixed_width(&self) -> bool {
        self.fixed_width.is_some()
    }

    fn fixed_width(&self) -> f32 {
        self.fixed_width.unwrap_or(0.0)
    }

    fn glyph_spacing(&self) -> f32 {
        self.glyph_spacing
    }

    fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn preferred_line_height(&self) -> f32 {
        self.line_height
    }

    fn glyphs_horizontal_kerning(&self, left: char, right: char) -> f32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0.0)
    }

    fn has_color_bitmaps(&self) -> bool {
        !self.color_glyphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::IntSize;
    use crate::paint::Color;
    use crate::surface::PixelFormat;

    fn font() -> BitmapFont {
        let mut f = BitmapFont::new(8.0, 7.0, 9.0).with_glyph_spacing(1.0);
        f.insert_glyph('i', GlyphBitmap::from_ascii(&["#", ".", "#", "#"]));
        f.insert_glyph('m', GlyphBitmap::from_ascii(&["#####", "#.#.#"]));
        f.set_kerning('i', 'm', -1.0);
        f
    }

    #[test]
    fn metrics_follow_inserted_glyphs() {
        let f = font();
        assert!(f.contains_glyph('i'));
        assert!(!f.contains_glyph('x'));
        assert_eq!(f.glyph_width('m'), 5.0);
        assert_eq!(f.glyph_width('x'), 0.0);
        assert_eq!(f.glyph_width(' '), 4.0);
        assert_eq!(f.glyphs_horizontal_kerning('i', 'm'), -1.0);
        assert_eq!(f.glyphs_horizontal_kerning('m', 'i'), 0.0);
        assert!(!f.has_color_bitmaps());
    }

    #[test]
    fn fixed_width_overrides_advances() {
        let f = font().with_fixed_width(6.0);
        assert!(f.is_fixed_width());
        assert_eq!(f.glyph_width('i'), 6.0);
        let g = f.glyph('m', 0.0).unwrap();
        assert_eq!(g.advance, 6.0);
    }

    #[test]
    fn color_glyph_scales_to_pixel_size() {
        let mut f = font();
        let size = IntSize::new(32, 16);
        let bitmap = Bitmap::new_filled(PixelFormat::Bgra8888, size, 1, Color::RED).unwrap();
        f.insert_color_glyph('★', Rc::new(bitmap));
        assert!(f.has_color_bitmaps());
        assert_eq!(f.glyph_width('★'), 16.0);
        let g = f.glyph('★', 0.0).unwrap();
        assert!(matches!(g.image, GlyphImage::Color(_)));
    }
}
