//! # Incremental packrat engine
//!
//! [`MemoizationTable`] evaluates a [`Grammar`] against a buffer, caching the
//! result of every `Memoize` rule at every position it was tried. Between
//! parses the owner reports each buffer edit through
//! [`MemoizationTable::apply_edit`]; entries whose examined span touched the
//! edit are dropped, entries after it are shifted, and the next
//! [`MemoizationTable::parse`] reuses whatever survived.
//!
//! The table never sees the buffer's contents change. Calling `apply_edit`
//! after every mutation, and before the next parse, is the owner's job.

mod evaluate;
mod memo;
mod result;
mod stats;

use std::ops::Range;
use std::sync::Arc;

use log::debug;

pub use memo::MemoStore;
pub use result::{Fragment, ParseResult};
pub use stats::MemoStats;

use crate::buffer::SafeUnicodeBuffer;
use crate::error::ParseError;
use crate::grammar::{Grammar, RuleId};
use crate::node_type::NodeType;
use crate::tree::SyntaxTreeNode;
use evaluate::Evaluator;

/// A successful run of the start rule.
#[derive(Debug, Clone)]
pub struct Parse {
    pub root: Arc<SyntaxTreeNode>,
    /// Code units matched from position 0.
    pub consumed: usize,
    pub examined_length: usize,
}

impl Parse {
    /// Whether the whole buffer of `length` units was consumed.
    pub fn is_complete(&self, length: usize) -> bool {
        self.consumed == length
    }

    /// The root if the parse covered `length` units, otherwise
    /// [`ParseError::Incomplete`] carrying the partial tree.
    pub fn into_complete(self, length: usize) -> Result<Arc<SyntaxTreeNode>, ParseError> {
        if self.is_complete(length) {
            Ok(self.root)
        } else {
            Err(ParseError::Incomplete {
                consumed: self.consumed,
                length,
                partial: self.root,
            })
        }
    }
}

/// Memoized evaluation state for one buffer.
#[derive(Debug)]
pub struct MemoizationTable {
    grammar: Arc<Grammar>,
    store: MemoStore,
    stats: MemoStats,
}

impl MemoizationTable {
    pub fn new(grammar: Arc<Grammar>) -> Self {
        let stats = MemoStats::new(grammar.rule_count());
        Self {
            grammar,
            store: MemoStore::new(),
            stats,
        }
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// Runs the start rule at position 0.
    ///
    /// A partial match is still `Ok`; check [`Parse::is_complete`]. The
    /// root is the start rule's node when it produced exactly one node
    /// covering the match, otherwise a [`NodeType::ROOT`] node over the
    /// whole fragment.
    pub fn parse<B: SafeUnicodeBuffer + ?Sized>(&mut self, buffer: &B) -> Result<Parse, ParseError> {
        let start = self.grammar.start();
        let result = self.evaluate(start, buffer, 0);
        if !result.succeeded {
            return Err(ParseError::NoMatch {
                examined_length: result.examined_length,
            });
        }
        let single = result
            .fragment
            .single_node()
            .filter(|node| node.length() == result.length)
            .cloned();
        let root = match single {
            Some(node) => node,
            None => SyntaxTreeNode::with_children(NodeType::ROOT, result.fragment.into_nodes()),
        };
        Ok(Parse {
            root,
            consumed: result.length,
            examined_length: result.examined_length,
        })
    }

    /// Evaluates any rule of the grammar at `position`, through the cache.
    pub fn evaluate<B: SafeUnicodeBuffer + ?Sized>(
        &mut self,
        rule: RuleId,
        buffer: &B,
        position: usize,
    ) -> ParseResult {
        Evaluator::new(&self.grammar, buffer, &mut self.store, &mut self.stats).eval(rule, position)
    }

    /// Reports that `original_range` of the buffer was replaced by
    /// `replacement_length` code units.
    pub fn apply_edit(&mut self, original_range: Range<usize>, replacement_length: usize) {
        let before = self.store.len();
        let removed = self.store.apply_edit(original_range.clone(), replacement_length);
        self.stats.invalidated = removed;
        debug!(
            "edit {:?} -> {replacement_length} units invalidated {removed} of {before} memo entries",
            original_range
        );
    }

    pub fn stats(&self) -> &MemoStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Drops every cached entry.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn memo(&self) -> &MemoStore {
        &self.store
    }
}
