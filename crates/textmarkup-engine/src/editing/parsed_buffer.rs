use std::ops::Range;
use std::sync::Arc;

use log::debug;
use textmarkup_syntax::{
    AnchoredNode, Grammar, MemoStats, MemoizationTable, ParseError, SafeUnicodeBuffer,
    SyntaxTreeNode,
};

use super::patch::Patch;
use super::piece_table::PieceTable;

/// An editable document whose syntax tree is kept current.
///
/// Owns exactly one [`PieceTable`] and one [`MemoizationTable`]. Every edit
/// goes through [`ParsedBuffer::replace_characters`], which mutates the
/// text, invalidates the affected memo entries and re-parses before
/// returning.
#[derive(Debug)]
pub struct ParsedBuffer {
    buffer: PieceTable,
    memo: MemoizationTable,
    result: Result<Arc<SyntaxTreeNode>, ParseError>,
    version: u64,
}

impl ParsedBuffer {
    /// Loads `text` and parses it with `grammar`.
    pub fn new(text: &str, grammar: Arc<Grammar>) -> Self {
        let buffer = PieceTable::new(text);
        let mut memo = MemoizationTable::new(grammar);
        let result = Self::run(&mut memo, &buffer);
        Self {
            buffer,
            memo,
            result,
            version: 0,
        }
    }

    fn run(memo: &mut MemoizationTable, buffer: &PieceTable) -> Result<Arc<SyntaxTreeNode>, ParseError> {
        let result = memo
            .parse(buffer)
            .and_then(|parse| parse.into_complete(buffer.count()));
        match &result {
            Err(ParseError::Incomplete {
                consumed, length, ..
            }) => debug!("parse stopped at {consumed} of {length} code units"),
            Err(ParseError::NoMatch { examined_length }) => {
                debug!("start rule failed after examining {examined_length} code units")
            }
            Ok(_) => {}
        }
        result
    }

    /// Replaces `range` (UTF-16 code units) with `text` and re-parses.
    ///
    /// # Panics
    ///
    /// If the range is inverted or extends past the end of the document.
    pub fn replace_characters(&mut self, range: Range<usize>, text: &str) -> Patch {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.replace_code_units(range, &units)
    }

    pub fn replace_code_units(&mut self, range: Range<usize>, units: &[u16]) -> Patch {
        self.buffer.replace(range.clone(), units);
        self.memo.apply_edit(range.clone(), units.len());
        self.result = Self::run(&mut self.memo, &self.buffer);
        self.version += 1;
        Patch::new(range, units.len(), self.version)
    }

    /// Discards every edit and re-parses the original text.
    pub fn revert_to_original(&mut self) -> Patch {
        let before = self.buffer.count();
        self.buffer.revert_to_original();
        self.memo.clear();
        self.result = Self::run(&mut self.memo, &self.buffer);
        self.version += 1;
        Patch::new(0..before, self.buffer.count(), self.version)
    }

    /// The outcome of the most recent parse.
    pub fn result(&self) -> Result<&Arc<SyntaxTreeNode>, &ParseError> {
        self.result.as_ref()
    }

    /// The tree, if the last parse covered the whole document.
    pub fn tree(&self) -> Option<&Arc<SyntaxTreeNode>> {
        self.result.as_ref().ok()
    }

    /// The tree if complete, otherwise whatever prefix did parse.
    pub fn partial_tree(&self) -> Option<&Arc<SyntaxTreeNode>> {
        match &self.result {
            Ok(root) => Some(root),
            Err(error) => error.partial_tree(),
        }
    }

    pub fn path_to_location(&self, offset: usize) -> Vec<AnchoredNode> {
        self.partial_tree()
            .map(|root| root.path_to_location(offset))
            .unwrap_or_default()
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.count() == 0
    }

    /// Number of edits applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn buffer(&self) -> &PieceTable {
        &self.buffer
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        self.memo.grammar()
    }

    pub fn memo_table(&self) -> &MemoizationTable {
        &self.memo
    }

    pub fn stats(&self) -> &MemoStats {
        self.memo.stats()
    }

    pub fn reset_stats(&mut self) {
        self.memo.reset_stats();
    }
}
