//! Text support: bidi runs, font and emoji contracts, bundled fonts, and
//! measurement. Drawing lives on [`Painter`](crate::painter::Painter).

pub mod bidi;
mod bitmap_font;
mod emoji;
mod font;
mod fontdue_font;
mod measure;

pub use bidi::{DirectionalRun, TextDirection};
pub use bitmap_font::BitmapFont;
pub use emoji::{
    could_start_emoji_sequence, is_emoji_char, CodePointCursor, EmojiProvider, MapEmojiProvider,
    VARIATION_SELECTOR_EMOJI, VARIATION_SELECTOR_TEXT,
};
pub use font::{Font, Glyph, GlyphBitmap, GlyphImage};
pub use fontdue_font::{FontId, FontLoadError, FontSystem, FontdueFont};
pub use measure::{emoji_size, line_width, run_width, REPLACEMENT_CHARACTER};

pub(crate) use measure::{resolve, walk_run, Resolved};
