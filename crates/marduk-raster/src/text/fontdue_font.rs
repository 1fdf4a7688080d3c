use std::fmt;
use std::path::Path;

use anyhow::Context;

use crate::coords::IntSize;
use crate::paint::Color;
use crate::surface::{Bitmap, PixelFormat};

use super::font::{Font, Glyph, GlyphBitmap, GlyphImage};

/// Error returned when font bytes cannot be parsed.
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// A TrueType/OpenType font rasterized by `fontdue` at a fixed pixel size.
///
/// Glyphs come out as coverage masks ([`GlyphImage::Alpha`]) and are
/// rasterized on every request.
#[derive(Clone)]
pub struct FontdueFont {
    font: fontdue::Font,
    pixel_size: f32,
}

impl fmt::Debug for FontdueFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontdueFont")
            .field("name", &self.font.name())
            .field("pixel_size", &self.pixel_size)
            .finish()
    }
}

impl FontdueFont {
    /// Parses a TrueType or OpenType font from raw bytes.
    pub fn from_bytes(bytes: &[u8], pixel_size: f32) -> Result<Self, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        Ok(Self { font, pixel_size })
    }

    /// Reads and parses a font file.
    pub fn from_file(path: impl AsRef<Path>, pixel_size: f32) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading font file {}", path.display()))?;
        let font = Self::from_bytes(&bytes, pixel_size)
            .with_context(|| format!("parsing font file {}", path.display()))?;
        log::debug!("loaded font {:?} from {}", font.font.name(), path.display());
        Ok(font)
    }

    /// The same face at another size; the parsed font data is shared.
    #[must_use]
    pub fn with_pixel_size(&self, pixel_size: f32) -> Self {
        Self { font: self.font.clone(), pixel_size }
    }

    fn line_metrics(&self) -> Option<fontdue::LineMetrics> {
        self.font.horizontal_line_metrics(self.pixel_size)
    }
}

impl Font for FontdueFont {
    fn glyph(&self, ch: char, _subpixel_offset: f32) -> Option<Glyph> {
        if !self.contains_glyph(ch) {
            return None;
        }
        let (metrics, coverage) = self.font.rasterize(ch, self.pixel_size);
        let (w, h) = (metrics.width as i32, metrics.height as i32);
        let image = if w == 0 || h == 0 {
            GlyphImage::Mono(GlyphBitmap::new(0, 0))
        } else {
            let format = PixelFormat::Bgra8888;
            let data =
                coverage.iter().map(|&a| Color::WHITE.with_alpha(a).to_pixel(format)).collect();
            match Bitmap::from_pixels(format, IntSize::new(w, h), 1, data) {
                Ok(bitmap) => GlyphImage::Alpha(bitmap),
                Err(e) => {
                    log::debug!("glyph {ch:?}: {e}");
                    return None;
                }
            }
        };
        Some(Glyph {
            image,
            left_bearing: metrics.xmin as f32,
            advance: metrics.advance_width,
            // fontdue's ymin is the bottom edge relative to the baseline, y up.
            ascent: (metrics.ymin + h) as f32,
        })
    }

    fn contains_glyph(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }

    fn glyph_width(&self, ch: char) -> f32 {
        self.font.metrics(ch, self.pixel_size).advance_width
    }

    fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    fn ascent(&self) -> f32 {
        self.line_metrics().map_or(self.pixel_size, |m| m.ascent)
    }

    fn preferred_line_height(&self) -> f32 {
        self.line_metrics().map_or(self.pixel_size * 1.2, |m| m.new_line_size)
    }

    fn glyphs_horizontal_kerning(&self, left: char, right: char) -> f32 {
        self.font.horizontal_kern(left, right, self.pixel_size).unwrap_or(0.0)
    }
}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns a collection of loaded fonts, addressed by [`FontId`].
///
/// Fonts are immutable after loading; painters borrow them through
/// [`FontSystem::get`].
#[derive(Debug, Default)]
pub struct FontSystem {
    fonts: Vec<FontdueFont>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8], pixel_size: f32) -> Result<FontId, FontLoadError> {
        let font = FontdueFont::from_bytes(bytes, pixel_size)?;
        Ok(self.push(font))
    }

    /// Reads, parses and stores a font file.
    pub fn load_font_file(
        &mut self,
        path: impl AsRef<Path>,
        pixel_size: f32,
    ) -> anyhow::Result<FontId> {
        let font = FontdueFont::from_file(path, pixel_size)?;
        Ok(self.push(font))
    }

    /// Stores another size of an already loaded face.
    pub fn add_size(&mut self, id: FontId, pixel_size: f32) -> Option<FontId> {
        let font = self.get(id)?.with_pixel_size(pixel_size);
        Some(self.push(font))
    }

    fn push(&mut self, font: FontdueFont) -> FontId {
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        id
    }

    pub fn get(&self, id: FontId) -> Option<&FontdueFont> {
        self.fonts.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
