//! Simplified bidirectional reordering for a single line of text.
//!
//! This is a reduced subset of UAX #9: one caller-supplied paragraph
//! direction, no explicit embeddings, overrides or isolates, and no
//! paragraph detection. Character classes come from the Unicode tables in
//! `unicode-bidi`; everything after classification is done here.

use unicode_bidi::{bidi_class as unicode_bidi_class, BidiClass as UnicodeClass};

/// Paragraph or run direction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Base embedding level: 0 for LTR, 1 for RTL.
    #[inline]
    pub const fn level(self) -> u8 {
        match self {
            TextDirection::Ltr => 0,
            TextDirection::Rtl => 1,
        }
    }

    /// Even levels are LTR, odd levels RTL.
    #[inline]
    pub const fn from_level(level: u8) -> Self {
        if level % 2 == 0 { TextDirection::Ltr } else { TextDirection::Rtl }
    }

    #[inline]
    pub const fn is_rtl(self) -> bool {
        matches!(self, TextDirection::Rtl)
    }

    #[inline]
    const fn strong_class(self) -> BidiClass {
        match self {
            TextDirection::Ltr => BidiClass::StrongLtr,
            TextDirection::Rtl => BidiClass::StrongRtl,
        }
    }
}

/// The five classes the reordering works with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BidiClass {
    StrongLtr,
    StrongRtl,
    WeakNumber,
    WeakSeparator,
    Neutral,
}

impl BidiClass {
    /// Direction used when comparing the classes around a neutral run;
    /// numbers count as LTR.
    #[inline]
    fn flank_direction(self) -> Option<TextDirection> {
        match self {
            BidiClass::StrongLtr | BidiClass::WeakNumber => Some(TextDirection::Ltr),
            BidiClass::StrongRtl => Some(TextDirection::Rtl),
            BidiClass::WeakSeparator | BidiClass::Neutral => None,
        }
    }
}

/// Classifies `ch` from its Unicode bidi class.
pub fn bidi_class(ch: char) -> BidiClass {
    match unicode_bidi_class(ch) {
        UnicodeClass::L => BidiClass::StrongLtr,
        UnicodeClass::R | UnicodeClass::AL => BidiClass::StrongRtl,
        UnicodeClass::EN | UnicodeClass::AN | UnicodeClass::ET => BidiClass::WeakNumber,
        UnicodeClass::ES | UnicodeClass::CS => BidiClass::WeakSeparator,
        _ => BidiClass::Neutral,
    }
}

/// A maximal span of code points sharing one resolved embedding level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionalRun {
    text: Vec<char>,
    level: u8,
}

impl DirectionalRun {
    pub fn new(text: Vec<char>, level: u8) -> Self {
        Self { text, level }
    }

    #[inline]
    pub fn text(&self) -> &[char] {
        &self.text
    }

    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[inline]
    pub fn direction(&self) -> TextDirection {
        TextDirection::from_level(self.level)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn mirror_if_rtl(&mut self) {
        if self.direction().is_rtl() {
            for ch in &mut self.text {
                *ch = mirror_char(*ch);
            }
        }
    }
}

/// Splits one line into directional runs in visual (left-to-right) order.
///
/// Code points inside an RTL run stay in logical order; the glyph painter
/// lays them out right to left. Mirrorable characters in RTL runs are
/// already replaced.
pub fn split_into_directional_runs(line: &[char], paragraph: TextDirection) -> Vec<DirectionalRun> {
    if line.is_empty() {
        return Vec::new();
    }
    let base = paragraph.level();
    let paragraph_class = paragraph.strong_class();
    let mut classes: Vec<BidiClass> = line.iter().copied().map(bidi_class).collect();

    // Separators take the nearest preceding strong class.
    for i in 0..classes.len() {
        if classes[i] != BidiClass::WeakSeparator {
            continue;
        }
        classes[i] = classes[..i]
            .iter()
            .rev()
            .copied()
            .find(|c| matches!(c, BidiClass::StrongLtr | BidiClass::StrongRtl))
            .unwrap_or(paragraph_class);
    }

    // Neutral runs: flanking directions agree → that direction, otherwise
    // the paragraph's. Line edges count as the paragraph direction.
    let mut i = 0;
    while i < classes.len() {
        if classes[i] != BidiClass::Neutral {
            i += 1;
            continue;
        }
        let end = classes[i..]
            .iter()
            .position(|&c| c != BidiClass::Neutral)
            .map_or(classes.len(), |n| i + n);
        let before = if i == 0 { Some(paragraph) } else { classes[i - 1].flank_direction() };
        let after = match classes.get(end) {
            Some(class) => class.flank_direction(),
            None => Some(paragraph),
        };
        let resolved = match (before, after) {
            (Some(a), Some(b)) if a == b => a.strong_class(),
            _ => paragraph_class,
        };
        classes[i..end].fill(resolved);
        i = end;
    }

    // Implicit levels.
    let levels: Vec<u8> = classes
        .iter()
        .map(|&class| match (base % 2 == 0, class) {
            (true, BidiClass::StrongRtl) => base + 1,
            (true, BidiClass::WeakNumber | BidiClass::WeakSeparator) => base + 2,
            (false, BidiClass::StrongLtr | BidiClass::WeakNumber | BidiClass::WeakSeparator) => {
                base + 1
            }
            _ => base,
        })
        .collect();

    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=line.len() {
        if i == line.len() || levels[i] != levels[start] {
            runs.push(DirectionalRun::new(line[start..i].to_vec(), levels[start]));
            start = i;
        }
    }

    reorder_runs(&mut runs);
    for run in &mut runs {
        run.mirror_if_rtl();
    }
    runs
}

/// Runs for drawing: a line without mixed directions becomes a single run
/// at the paragraph level, anything else goes through
/// [`split_into_directional_runs`].
pub fn directional_runs(line: &[char], paragraph: TextDirection) -> Vec<DirectionalRun> {
    if line.is_empty() {
        return Vec::new();
    }
    if contains_bidirectional_text(line, paragraph) {
        return split_into_directional_runs(line, paragraph);
    }
    let mut run = DirectionalRun::new(line.to_vec(), paragraph.level());
    run.mirror_if_rtl();
    vec![run]
}

/// From the highest level down to the lowest odd level, reverses every
/// contiguous sequence of runs at that level or higher.
fn reorder_runs(runs: &mut [DirectionalRun]) {
    let Some(max) = runs.iter().map(|r| r.level).max() else { return };
    let Some(min_odd) = runs.iter().map(|r| r.level).filter(|l| l % 2 == 1).min() else { return };

    for level in (min_odd..=max).rev() {
        let mut i = 0;
        while i < runs.len() {
            if runs[i].level < level {
                i += 1;
                continue;
            }
            let end = runs[i..].iter().position(|r| r.level < level).map_or(runs.len(), |n| i + n);
            runs[i..end].reverse();
            i = end;
        }
    }
}

/// Direction of the first strong character, if any.
pub fn first_strong_direction(text: &[char]) -> Option<TextDirection> {
    text.iter().find_map(|&ch| match bidi_class(ch) {
        BidiClass::StrongLtr => Some(TextDirection::Ltr),
        BidiClass::StrongRtl => Some(TextDirection::Rtl),
        _ => None,
    })
}

/// Whether any character would resolve against `paragraph`: strong RTL in
/// an LTR paragraph, strong LTR or numbers in an RTL one.
pub fn contains_bidirectional_text(text: &[char], paragraph: TextDirection) -> bool {
    text.iter().any(|&ch| match (paragraph, bidi_class(ch)) {
        (TextDirection::Ltr, BidiClass::StrongRtl) => true,
        (TextDirection::Rtl, BidiClass::StrongLtr | BidiClass::WeakNumber) => true,
        _ => false,
    })
}

const MIRROR_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('<', '>'),
    ('[', ']'),
    ('{', '}'),
    ('\u{AB}', '\u{BB}'),
    ('\u{2039}', '\u{203A}'),
    ('\u{2045}', '\u{2046}'),
    ('\u{207D}', '\u{207E}'),
    ('\u{208D}', '\u{208E}'),
    ('\u{2208}', '\u{220B}'),
    ('\u{2264}', '\u{2265}'),
    ('\u{226A}', '\u{226B}'),
    ('\u{2282}', '\u{2283}'),
    ('\u{2286}', '\u{2287}'),
    ('\u{27E6}', '\u{27E7}'),
    ('\u{27E8}', '\u{27E9}'),
    ('\u{3008}', '\u{3009}'),
    ('\u{300A}', '\u{300B}'),
    ('\u{300C}', '\u{300D}'),
    ('\u{300E}', '\u{300F}'),
    ('\u{3010}', '\u{3011}'),
    ('\u{3014}', '\u{3015}'),
    ('\u{FF08}', '\u{FF09}'),
    ('\u{FF1C}', '\u{FF1E}'),
    ('\u{FF3B}', '\u{FF3D}'),
    ('\u{FF5B}', '\u{FF5D}'),
];

/// The mirrored form of `ch` for RTL display, or `ch` itself.
pub fn mirror_char(ch: char) -> char {
    MIRROR_PAIRS
        .iter()
        .find_map(|&(open, close)| {
            if ch == open {
                Some(close)
            } else if ch == close {
                Some(open)
            } else {
                None
            }
        })
        .unwrap_or(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn texts(runs: &[DirectionalRun]) -> Vec<String> {
        runs.iter().map(|r| r.text().iter().collect()).collect()
    }

    // ── classification ────────────────────────────────────────────────────

    #[test]
    fn classes_from_unicode_table() {
        assert_eq!(bidi_class('a'), BidiClass::StrongLtr);
        assert_eq!(bidi_class('א'), BidiClass::StrongRtl);
        assert_eq!(bidi_class('ب'), BidiClass::StrongRtl);
        assert_eq!(bidi_class('7'), BidiClass::WeakNumber);
        assert_eq!(bidi_class('$'), BidiClass::WeakNumber);
        assert_eq!(bidi_class(','), BidiClass::WeakSeparator);
        assert_eq!(bidi_class('+'), BidiClass::WeakSeparator);
        assert_eq!(bidi_class(' '), BidiClass::Neutral);
        assert_eq!(bidi_class('('), BidiClass::Neutral);
    }

    #[test]
    fn mirror_is_symmetric() {
        assert_eq!(mirror_char('('), ')');
        assert_eq!(mirror_char(')'), '(');
        assert_eq!(mirror_char('\u{AB}'), '\u{BB}');
        assert_eq!(mirror_char('x'), 'x');
    }

    // ── single direction ──────────────────────────────────────────────────

    #[test]
    fn pure_ltr_is_one_ltr_run() {
        let runs = split_into_directional_runs(&chars("hello (world)"), TextDirection::Ltr);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].direction(), TextDirection::Ltr);
        assert_eq!(texts(&runs), vec!["hello (world)"]);
    }

    #[test]
    fn pure_rtl_is_one_mirrored_rtl_run() {
        for paragraph in [TextDirection::Ltr, TextDirection::Rtl] {
            let runs = split_into_directional_runs(&chars("אבג"), paragraph);
            assert_eq!(runs.len(), 1);
            assert_eq!(runs[0].direction(), TextDirection::Rtl);
        }
        let runs = split_into_directional_runs(&chars("(שלום [עולם])"), TextDirection::Rtl);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].direction(), TextDirection::Rtl);
        assert_eq!(texts(&runs), vec![")שלום ]עולם[("]);
    }

    #[test]
    fn empty_line_has_no_runs() {
        assert!(split_into_directional_runs(&[], TextDirection::Ltr).is_empty());
        assert!(directional_runs(&[], TextDirection::Rtl).is_empty());
    }

    // ── mixed ─────────────────────────────────────────────────────────────

    #[test]
    fn rtl_word_inside_ltr_paragraph() {
        let runs = split_into_directional_runs(&chars("abc אבג def"), TextDirection::Ltr);
        assert_eq!(texts(&runs), vec!["abc ", "אבג", " def"]);
        let levels: Vec<u8> = runs.iter().map(DirectionalRun::level).collect();
        assert_eq!(levels, vec![0, 1, 0]);
    }

    #[test]
    fn ltr_word_inside_rtl_paragraph_is_reordered() {
        let runs = split_into_directional_runs(&chars("אב cd גד"), TextDirection::Rtl);
        // Visual order: the last logical run comes first.
        assert_eq!(texts(&runs), vec![" גד", "cd", "אב "]);
        assert_eq!(runs[1].direction(), TextDirection::Ltr);
    }

    #[test]
    fn numbers_get_their_own_even_level() {
        let runs = split_into_directional_runs(&chars("abc 123"), TextDirection::Ltr);
        assert_eq!(texts(&runs), vec!["abc ", "123"]);
        assert_eq!(runs[1].level(), 2);
        assert_eq!(runs[1].direction(), TextDirection::Ltr);
    }

    #[test]
    fn separator_inherits_preceding_strong_class() {
        let runs = split_into_directional_runs(&chars("אב-גד"), TextDirection::Ltr);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].direction(), TextDirection::Rtl);
    }

    #[test]
    fn leading_and_trailing_neutrals_take_paragraph_direction() {
        let runs = split_into_directional_runs(&chars(" אב "), TextDirection::Ltr);
        assert_eq!(texts(&runs), vec![" ", "אב", " "]);
    }

    // ── helpers ───────────────────────────────────────────────────────────

    #[test]
    fn fast_path_matches_single_direction_text() {
        let line = chars("[שלום]");
        assert!(!contains_bidirectional_text(&line, TextDirection::Rtl));
        let expected = split_into_directional_runs(&line, TextDirection::Rtl);
        assert_eq!(directional_runs(&line, TextDirection::Rtl), expected);
    }

    #[test]
    fn first_strong_skips_weak_and_neutral() {
        assert_eq!(first_strong_direction(&chars("12, אב c")), Some(TextDirection::Rtl));
        assert_eq!(first_strong_direction(&chars("12 ,.")), None);
        assert!(contains_bidirectional_text(&chars("a 1"), TextDirection::Rtl));
        assert!(!contains_bidirectional_text(&chars("a 1"), TextDirection::Ltr));
    }
}
