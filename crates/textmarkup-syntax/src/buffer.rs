//! # Safe Unicode Buffer
//!
//! The contract between the parser and whatever stores the text. Everything
//! is addressed in **UTF-16 code units**: offsets, lengths and ranges handed
//! to and returned from the engine all use that unit, because the editor
//! surfaces the engine sits behind speak UTF-16.
//!
//! Implementors only need [`SafeUnicodeBuffer::count`] and
//! [`SafeUnicodeBuffer::utf16`]. Scalar decoding, grapheme lookup and string
//! extraction are provided on top of those two.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// Random access to a sequence of UTF-16 code units.
///
/// "Safe" means out-of-range reads return `None` instead of panicking, so
/// rules can probe past the end of the buffer while deciding.
pub trait SafeUnicodeBuffer {
    /// Total number of UTF-16 code units.
    fn count(&self) -> usize;

    /// The code unit at `index`, or `None` at or past the end.
    fn utf16(&self, index: usize) -> Option<u16>;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Appends the code units in `range` to `into`. The range is clamped to
    /// the buffer.
    fn copy_code_units(&self, range: Range<usize>, into: &mut Vec<u16>) {
        let end = range.end.min(self.count());
        into.extend((range.start..end).filter_map(|i| self.utf16(i)));
    }

    /// Decodes the text in `range`. Unpaired surrogates become U+FFFD.
    fn string(&self, range: Range<usize>) -> String {
        let mut units = Vec::with_capacity(range.len());
        self.copy_code_units(range, &mut units);
        String::from_utf16_lossy(&units)
    }

    /// The Unicode scalar starting at `index` and its width in code units
    /// (2 for a surrogate pair, otherwise 1).
    fn scalar(&self, index: usize) -> Option<(char, usize)> {
        let unit = self.utf16(index)?;
        if is_high_surrogate(unit)
            && let Some(low) = self.utf16(index + 1)
            && let Some(Ok(c)) = char::decode_utf16([unit, low]).next()
        {
            return Some((c, 2));
        }
        let c = char::decode_utf16([unit])
            .next()
            .and_then(Result::ok)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        Some((c, 1))
    }

    /// The user-perceived character (extended grapheme cluster) starting at
    /// `index`.
    ///
    /// Steps over surrogate pairs, combining marks and emoji sequences.
    /// `index` is expected to sit on a cluster boundary.
    fn character(&self, index: usize) -> Option<String> {
        let count = self.count();
        if index >= count {
            return None;
        }
        let mut window = 8;
        loop {
            let mut end = (index + window).min(count);
            // Never cut a surrogate pair: a lone high surrogate at the edge of
            // the window would decode to U+FFFD and fake a cluster boundary.
            if end < count
                && end > index + 1
                && self.utf16(end - 1).is_some_and(is_high_surrogate)
            {
                end -= 1;
            }
            let text = self.string(index..end);
            let first = text.graphemes(true).next()?;
            if first.len() < text.len() || end == count {
                return Some(first.to_string());
            }
            window *= 2;
        }
    }
}

impl SafeUnicodeBuffer for [u16] {
    fn count(&self) -> usize {
        self.len()
    }

    fn utf16(&self, index: usize) -> Option<u16> {
        self.get(index).copied()
    }

    fn copy_code_units(&self, range: Range<usize>, into: &mut Vec<u16>) {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        into.extend_from_slice(&self[start..end]);
    }
}

impl SafeUnicodeBuffer for Vec<u16> {
    fn count(&self) -> usize {
        self.len()
    }

    fn utf16(&self, index: usize) -> Option<u16> {
        self.get(index).copied()
    }

    fn copy_code_units(&self, range: Range<usize>, into: &mut Vec<u16>) {
        self.as_slice().copy_code_units(range, into);
    }
}

/// An immutable, contiguous UTF-16 buffer.
///
/// Handy for parsing text that is never edited and for tests; editable
/// documents use a piece table instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringBuffer {
    units: Vec<u16>,
}

impl StringBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            units: text.encode_utf16().collect(),
        }
    }

    pub fn as_units(&self) -> &[u16] {
        &self.units
    }
}

impl From<&str> for StringBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl std::fmt::Display for StringBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf16_lossy(&self.units))
    }
}

impl SafeUnicodeBuffer for StringBuffer {
    fn count(&self) -> usize {
        self.units.len()
    }

    fn utf16(&self, index: usize) -> Option<u16> {
        self.units.get(index).copied()
    }

    fn copy_code_units(&self, range: Range<usize>, into: &mut Vec<u16>) {
        self.units.as_slice().copy_code_units(range, into);
    }
}

pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn count_is_in_utf16_units() {
        let buffer = StringBuffer::from("a😀b");
        assert_eq!(buffer.count(), 4);
        assert_eq!(buffer.to_string(), "a😀b");
    }

    #[test]
    fn utf16_past_end_is_none() {
        let buffer = StringBuffer::from("ab");
        assert_eq!(buffer.utf16(1), Some(u16::from(b'b')));
        assert_eq!(buffer.utf16(2), None);
        assert_eq!(buffer.utf16(usize::MAX), None);
    }

    #[test]
    fn scalar_decodes_surrogate_pairs() {
        let buffer = StringBuffer::from("a😀");
        assert_eq!(buffer.scalar(0), Some(('a', 1)));
        assert_eq!(buffer.scalar(1), Some(('😀', 2)));
        assert_eq!(buffer.scalar(3), None);
    }

    #[test]
    fn scalar_on_lone_surrogate_is_replacement() {
        let units: Vec<u16> = vec![0xD83D, u16::from(b'x')];
        assert_eq!(units.scalar(0), Some((char::REPLACEMENT_CHARACTER, 1)));
    }

    #[test]
    fn character_steps_over_combining_marks() {
        // "e" + COMBINING ACUTE ACCENT, then "x"
        let buffer = StringBuffer::from("e\u{301}x");
        assert_eq!(buffer.character(0).as_deref(), Some("e\u{301}"));
        assert_eq!(buffer.character(2).as_deref(), Some("x"));
    }

    #[test]
    fn character_keeps_long_emoji_sequences_whole() {
        // Family emoji: four people joined by ZWJ, 11 code units.
        let family = "👨\u{200D}👩\u{200D}👧\u{200D}👦";
        let text = format!("{family}!");
        let buffer = StringBuffer::from(text.as_str());
        assert_eq!(buffer.character(0).as_deref(), Some(family));
        let bang = family.encode_utf16().count();
        assert_eq!(buffer.character(bang).as_deref(), Some("!"));
    }

    #[test]
    fn character_at_end_is_none() {
        let buffer = StringBuffer::from("ab");
        assert_eq!(buffer.character(2), None);
    }

    #[test]
    fn string_extracts_and_clamps_ranges() {
        let buffer = StringBuffer::from("hello world");
        assert_eq!(buffer.string(6..11), "world");
        assert_eq!(buffer.string(6..100), "world");
    }

    #[test]
    fn slices_are_buffers() {
        let units: Vec<u16> = "xyz".encode_utf16().collect();
        assert_eq!(units.as_slice().count(), 3);
        assert_eq!(units.as_slice().string(1..3), "yz");
    }
}
