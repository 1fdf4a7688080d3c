use std::collections::HashMap;
use std::rc::Rc;

use crate::surface::Bitmap;

pub const VARIATION_SELECTOR_TEXT: char = '\u{FE0E}';
pub const VARIATION_SELECTOR_EMOJI: char = '\u{FE0F}';
const COMBINING_KEYCAP: char = '\u{20E3}';

/// A read position over a line of code points.
#[derive(Debug, Clone)]
pub struct CodePointCursor<'t> {
    text: &'t [char],
    position: usize,
}

impl<'t> CodePointCursor<'t> {
    pub fn new(text: &'t [char]) -> Self {
        Self { text, position: 0 }
    }

    #[inline]
    pub fn current(&self) -> Option<char> {
        self.text.get(self.position).copied()
    }

    /// The code point `n` places ahead; `peek(0)` is [`current`](Self::current).
    #[inline]
    pub fn peek(&self, n: usize) -> Option<char> {
        self.text.get(self.position + n).copied()
    }

    /// Moves forward by `n`, stopping at the end.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.text.len());
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Code points from the current one to the end.
    #[inline]
    pub fn remaining(&self) -> &'t [char] {
        &self.text[self.position..]
    }
}

/// Maps code point sequences to emoji images.
pub trait EmojiProvider {
    /// Looks up the longest sequence starting at the cursor. On a match the
    /// cursor is left on the last consumed code point; otherwise it does
    /// not move.
    fn emoji_for(&self, cursor: &mut CodePointCursor<'_>) -> Option<Rc<Bitmap>>;
}

/// An [`EmojiProvider`] backed by a table of sequences.
#[derive(Debug, Default)]
pub struct MapEmojiProvider {
    entries: HashMap<Vec<char>, Rc<Bitmap>>,
    longest: usize,
}

impl MapEmojiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `sequence` (one or more code points). Empty sequences are
    /// ignored.
    pub fn insert(&mut self, sequence: &str, image: Rc<Bitmap>) {
        let key: Vec<char> = sequence.chars().collect();
        if key.is_empty() {
            return;
        }
        self.longest = self.longest.max(key.len());
        self.entries.insert(key, image);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EmojiProvider for MapEmojiProvider {
    fn emoji_for(&self, cursor: &mut CodePointCursor<'_>) -> Option<Rc<Bitmap>> {
        let remaining = cursor.remaining();
        let max = self.longest.min(remaining.len());
        for len in (1..=max).rev() {
            if let Some(image) = self.entries.get(&remaining[..len]) {
                cursor.advance(len - 1);
                return Some(Rc::clone(image));
            }
        }
        None
    }
}

/// Whether `ch` is in one of the emoji blocks.
pub fn is_emoji_char(ch: char) -> bool {
    matches!(
        ch as u32,
        0x00A9 | 0x00AE
            | 0x203C
            | 0x2049
            | 0x2122
            | 0x2139
            | 0x2194..=0x21AA
            | 0x231A..=0x23FF
            | 0x24C2
            | 0x25AA..=0x25FE
            | 0x2600..=0x27BF
            | 0x2934..=0x2935
            | 0x2B05..=0x2B55
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
            | 0x1F000..=0x1FAFF
    )
}

/// Whether the code point at `ch`, followed by `next`, may begin an emoji
/// sequence. Keycap bases (`0-9`, `#`, `*`) only count when followed by a
/// variation selector or the combining keycap.
pub fn could_start_emoji_sequence(ch: char, next: Option<char>) -> bool {
    if ch.is_ascii_digit() || ch == '#' || ch == '*' {
        return matches!(next, Some(VARIATION_SELECTOR_EMOJI | COMBINING_KEYCAP));
    }
    is_emoji_char(ch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::IntSize;
    use crate::paint::Color;
    use crate::surface::{PixelFormat, Surface};

    fn image(color: Color) -> Rc<Bitmap> {
        let b = Bitmap::new_filled(PixelFormat::Bgra8888, IntSize::new(2, 2), 1, color).unwrap();
        Rc::new(b)
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn cursor_peeks_and_clamps() {
        let text = chars("abc");
        let mut c = CodePointCursor::new(&text);
        assert_eq!(c.peek(2), Some('c'));
        c.advance(1);
        assert_eq!(c.current(), Some('b'));
        assert_eq!(c.remaining(), &['b', 'c']);
        c.advance(10);
        assert_eq!(c.current(), None);
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn longest_sequence_wins_and_cursor_stops_on_last() {
        let mut provider = MapEmojiProvider::new();
        provider.insert("\u{1F1FA}", image(Color::RED));
        provider.insert("\u{1F1FA}\u{1F1F8}", image(Color::BLUE));
        let text = chars("\u{1F1FA}\u{1F1F8}x");
        let mut c = CodePointCursor::new(&text);
        let found = provider.emoji_for(&mut c).unwrap();
        assert_eq!(found.get_pixel(0, 0), Color::BLUE);
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn miss_leaves_cursor_in_place() {
        let mut provider = MapEmojiProvider::new();
        provider.insert("\u{1F600}", image(Color::RED));
        let text = chars("ab");
        let mut c = CodePointCursor::new(&text);
        assert!(provider.emoji_for(&mut c).is_none());
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn keycap_bases_need_a_follower() {
        assert!(!could_start_emoji_sequence('1', Some('2')));
        assert!(!could_start_emoji_sequence('#', None));
        assert!(could_start_emoji_sequence('1', Some(VARIATION_SELECTOR_EMOJI)));
        assert!(could_start_emoji_sequence('\u{1F600}', None));
        assert!(could_start_emoji_sequence('\u{2764}', Some('a')));
        assert!(!could_start_emoji_sequence('a', None));
    }
}
