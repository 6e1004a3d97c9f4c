use std::fmt;
use std::ops::Range;

use textmarkup_syntax::SafeUnicodeBuffer;

/// Which backing buffer a [`Piece`] points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceSource {
    Original,
    Added,
}

/// A run of code units copied from one of the backing buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub source: PieceSource,
    pub start: usize,
    pub length: usize,
}

/// Editable UTF-16 text as a piece table.
///
/// The text loaded at construction is never modified; everything typed later
/// is appended to a separate buffer. The logical contents are the
/// concatenation of the pieces, in order.
///
/// ## Invariants
///
/// - No piece has length zero.
/// - `starts[i]` is the logical offset of `pieces[i]`; the lengths sum to
///   [`SafeUnicodeBuffer::count`].
/// - The original buffer never changes and the added buffer only grows
///   (until [`PieceTable::revert_to_original`]).
#[derive(Debug, Clone, Default)]
pub struct PieceTable {
    original: Vec<u16>,
    added: Vec<u16>,
    pieces: Vec<Piece>,
    starts: Vec<usize>,
    count: usize,
}

impl PieceTable {
    pub fn new(text: &str) -> Self {
        Self::from_units(text.encode_utf16().collect())
    }

    pub fn from_units(original: Vec<u16>) -> Self {
        let mut table = Self {
            original,
            ..Self::default()
        };
        table.reset_pieces();
        table
    }

    fn reset_pieces(&mut self) {
        self.pieces.clear();
        if !self.original.is_empty() {
            self.pieces.push(Piece {
                source: PieceSource::Original,
                start: 0,
                length: self.original.len(),
            });
        }
        self.refresh_starts(0);
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    fn units(&self, piece: &Piece) -> &[u16] {
        let source = match piece.source {
            PieceSource::Original => &self.original,
            PieceSource::Added => &self.added,
        };
        &source[piece.start..piece.start + piece.length]
    }

    /// Index of the piece containing `at` and the offset within it.
    /// `at` must be below `count`.
    fn locate(&self, at: usize) -> (usize, usize) {
        match self.starts.binary_search(&at) {
            Ok(index) => (index, 0),
            Err(index) => (index - 1, at - self.starts[index - 1]),
        }
    }

    /// Recomputes piece offsets from `from` onwards.
    fn refresh_starts(&mut self, from: usize) {
        self.starts.truncate(from);
        let mut offset = match from.checked_sub(1) {
            Some(prev) => self.starts[prev] + self.pieces[prev].length,
            None => 0,
        };
        for piece in &self.pieces[from..] {
            self.starts.push(offset);
            offset += piece.length;
        }
        self.count = offset;
    }

    /// Makes `at` a piece boundary and returns the index of the piece that
    /// starts there (`pieces.len()` at the end).
    fn split_at(&mut self, at: usize) -> usize {
        if at >= self.count {
            return self.pieces.len();
        }
        let (index, offset) = self.locate(at);
        if offset == 0 {
            return index;
        }
        let piece = self.pieces[index];
        self.pieces[index].length = offset;
        self.pieces.insert(
            index + 1,
            Piece {
                source: piece.source,
                start: piece.start + offset,
                length: piece.length - offset,
            },
        );
        self.starts.insert(index + 1, at);
        index + 1
    }

    /// Replaces `range` with `units`.
    ///
    /// Covers insertion (empty range), deletion (empty `units`) and
    /// replacement. Typing at the end of the most recent insertion extends
    /// that piece instead of adding a new one.
    ///
    /// # Panics
    ///
    /// If the range is inverted or extends past the end of the text.
    pub fn replace(&mut self, range: Range<usize>, units: &[u16]) {
        assert!(
            range.start <= range.end && range.end <= self.count,
            "replace range {range:?} out of bounds for piece table of {} code units",
            self.count
        );
        if range.is_empty() && units.is_empty() {
            return;
        }
        if range.is_empty() && self.try_extend_last_insert(range.start, units) {
            return;
        }

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        let inserted = (!units.is_empty()).then(|| {
            let piece = Piece {
                source: PieceSource::Added,
                start: self.added.len(),
                length: units.len(),
            };
            self.added.extend_from_slice(units);
            piece
        });
        self.pieces.splice(first..last, inserted);
        self.refresh_starts(first);
    }

    pub fn replace_str(&mut self, range: Range<usize>, text: &str) {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.replace(range, &units);
    }

    fn try_extend_last_insert(&mut self, at: usize, units: &[u16]) -> bool {
        let Some(index) = at.checked_sub(1).map(|before| self.locate(before).0) else {
            return false;
        };
        let piece = self.pieces[index];
        let extends = piece.source == PieceSource::Added
            && self.starts[index] + piece.length == at
            && piece.start + piece.length == self.added.len();
        if !extends {
            return false;
        }
        self.added.extend_from_slice(units);
        self.pieces[index].length += units.len();
        self.refresh_starts(index + 1);
        true
    }

    /// Drops every edit, restoring the text the table was created with.
    pub fn revert_to_original(&mut self) {
        self.added.clear();
        self.reset_pieces();
    }

    /// The full contents as UTF-16.
    pub fn to_units(&self) -> Vec<u16> {
        let mut units = Vec::with_capacity(self.count);
        for piece in &self.pieces {
            units.extend_from_slice(self.units(piece));
        }
        units
    }
}

impl From<&str> for PieceTable {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for PieceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf16_lossy(&self.to_units()))
    }
}

impl SafeUnicodeBuffer for PieceTable {
    fn count(&self) -> usize {
        self.count
    }

    fn utf16(&self, index: usize) -> Option<u16> {
        if index >= self.count {
            return None;
        }
        let (piece, offset) = self.locate(index);
        self.units(&self.pieces[piece]).get(offset).copied()
    }

    fn copy_code_units(&self, range: Range<usize>, into: &mut Vec<u16>) {
        let end = range.end.min(self.count);
        if range.start >= end {
            return;
        }
        let (mut index, mut offset) = self.locate(range.start);
        let mut remaining = end - range.start;
        while remaining > 0 {
            let units = &self.units(&self.pieces[index])[offset..];
            let take = units.len().min(remaining);
            into.extend_from_slice(&units[..take]);
            remaining -= take;
            index += 1;
            offset = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn assert_invariants(table: &PieceTable) {
        assert!(table.pieces().iter().all(|p| p.length > 0), "zero-length piece");
        let total: usize = table.pieces().iter().map(|p| p.length).sum();
        assert_eq!(total, table.count());
    }

    #[test]
    fn new_table_has_one_original_piece() {
        let table = PieceTable::new("hello");
        assert_eq!(table.count(), 5);
        assert_eq!(
            table.pieces(),
            &[Piece {
                source: PieceSource::Original,
                start: 0,
                length: 5
            }]
        );
    }

    #[test]
    fn empty_table_has_no_pieces() {
        let table = PieceTable::new("");
        assert!(table.pieces().is_empty());
        assert!(table.is_empty());
        assert_eq!(table.utf16(0), None);
    }

    #[rstest]
    #[case::insert_start(0..0, "> ", "> hello world")]
    #[case::insert_middle(5..5, ",", "hello, world")]
    #[case::insert_end(11..11, "!", "hello world!")]
    #[case::delete_start(0..6, "", "world")]
    #[case::delete_middle(4..7, "", "hellorld")]
    #[case::delete_all(0..11, "", "")]
    #[case::replace_word(6..11, "there", "hello there")]
    #[case::replace_with_longer(0..1, "HHH", "HHHello world")]
    #[case::noop(3..3, "", "hello world")]
    fn replace_cases(#[case] range: Range<usize>, #[case] text: &str, #[case] expected: &str) {
        let mut table = PieceTable::new("hello world");
        table.replace_str(range, text);
        assert_eq!(table.to_string(), expected);
        assert_invariants(&table);
    }

    #[test]
    fn consecutive_typing_coalesces() {
        let mut table = PieceTable::new("ab");
        table.replace_str(1..1, "x");
        table.replace_str(2..2, "y");
        table.replace_str(3..3, "z");
        assert_eq!(table.to_string(), "axyzb");
        assert_eq!(table.pieces().len(), 3);
        assert_eq!(table.pieces()[1].length, 3);
    }

    #[test]
    fn typing_elsewhere_starts_a_new_piece() {
        let mut table = PieceTable::new("ab");
        table.replace_str(1..1, "x");
        table.replace_str(0..0, "y");
        assert_eq!(table.to_string(), "yaxb");
        assert_eq!(table.pieces().len(), 4);
        assert_invariants(&table);
    }

    #[test]
    fn edits_across_piece_boundaries() {
        let mut table = PieceTable::new("0123456789");
        table.replace_str(3..3, "abc");
        table.replace_str(8..8, "XY");
        assert_eq!(table.to_string(), "012abc34XY56789");
        table.replace_str(4..12, "-");
        assert_eq!(table.to_string(), "012a-789");
        assert_invariants(&table);
        assert_eq!(table.string(3..6), "a-7");
    }

    #[test]
    fn code_unit_access_spans_pieces() {
        let mut table = PieceTable::new("ab");
        table.replace_str(1..1, "😀");
        assert_eq!(table.count(), 4);
        assert_eq!(table.utf16(0), Some(u16::from(b'a')));
        assert_eq!(table.scalar(1), Some(('😀', 2)));
        assert_eq!(table.character(1).as_deref(), Some("😀"));
        assert_eq!(table.utf16(3), Some(u16::from(b'b')));
        assert_eq!(table.utf16(4), None);
    }

    #[test]
    fn copy_code_units_clamps_and_spans_pieces() {
        let mut table = PieceTable::new("hello");
        table.replace_str(5..5, " world");
        let mut out = Vec::new();
        table.copy_code_units(3..100, &mut out);
        assert_eq!(String::from_utf16_lossy(&out), "lo world");
    }

    #[test]
    fn revert_restores_original() {
        let mut table = PieceTable::new("original");
        table.replace_str(0..8, "changed");
        table.replace_str(7..7, "!");
        table.revert_to_original();
        assert_eq!(table.to_string(), "original");
        assert_eq!(table.pieces().len(), 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn replace_past_end_panics() {
        let mut table = PieceTable::new("abc");
        table.replace_str(2..4, "x");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    #[allow(clippy::reversed_empty_ranges)]
    fn inverted_range_panics() {
        let mut table = PieceTable::new("abc");
        table.replace_str(2..1, "x");
    }
}
