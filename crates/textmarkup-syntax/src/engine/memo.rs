//! # Memo store
//!
//! Cached [`ParseResult`]s keyed by `(rule, position)`, laid out as one
//! column per buffer position so an edit can shift everything after it with
//! a single splice.
//!
//! ## Invalidation
//!
//! An entry at `s` with extent `x` depends on `[s, s + x)`. For an edit
//! replacing `[a, b)` with `n` units:
//!
//! - `s < a`: kept unless `s + x > a`, i.e. unless it looked into the edit.
//!   For a pure insertion (`a == b`) this is exactly `s < a < s + x`.
//! - `s == a < b`: kept only if it looked at nothing (`x == 0`).
//! - `a < s < b`: removed; the text it started on is gone.
//! - `s >= b`: kept and moved to `s + n - (b - a)`.
//!
//! Each column tracks the largest extent among its entries, so columns that
//! cannot reach the edit are skipped without looking at their entries.

use std::iter;
use std::ops::Range;

use log::trace;

use super::result::ParseResult;
use crate::grammar::RuleId;

#[derive(Debug, Clone, Default)]
struct MemoColumn {
    entries: Vec<(RuleId, ParseResult)>,
    max_extent: usize,
}

impl MemoColumn {
    fn get(&self, rule: RuleId) -> Option<&ParseResult> {
        self.entries
            .iter()
            .find(|(id, _)| *id == rule)
            .map(|(_, result)| result)
    }

    /// Inserts or replaces. Returns true if the rule was not present.
    fn insert(&mut self, rule: RuleId, result: ParseResult) -> bool {
        self.max_extent = self.max_extent.max(result.extent());
        if let Some(slot) = self.entries.iter_mut().find(|(id, _)| *id == rule) {
            slot.1 = result;
            false
        } else {
            self.entries.push((rule, result));
            true
        }
    }

    /// Keeps entries matching `keep`; returns how many were dropped.
    fn retain(&mut self, keep: impl Fn(&ParseResult) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, result)| keep(result));
        self.max_extent = self
            .entries
            .iter()
            .map(|(_, result)| result.extent())
            .max()
            .unwrap_or(0);
        before - self.entries.len()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Position-indexed cache of rule results.
#[derive(Debug, Default)]
pub struct MemoStore {
    columns: Vec<Option<MemoColumn>>,
    len: usize,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, rule: RuleId, position: usize) -> Option<&ParseResult> {
        self.columns.get(position)?.as_ref()?.get(rule)
    }

    pub fn insert(&mut self, rule: RuleId, position: usize, result: ParseResult) {
        if position >= self.columns.len() {
            self.columns.resize_with(position + 1, || None);
        }
        let column = self.columns[position].get_or_insert_with(MemoColumn::default);
        if column.insert(rule, result) {
            self.len += 1;
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.columns.clear();
        self.len = 0;
    }

    /// Positions that currently hold at least one entry, ascending.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.as_ref().is_some_and(|c| c.len() > 0))
            .map(|(position, _)| position)
    }

    /// Drops entries affected by replacing `range` with `replacement_length`
    /// units and moves the ones after it. Returns how many were dropped.
    pub fn apply_edit(&mut self, range: Range<usize>, replacement_length: usize) -> usize {
        let Range { start: a, end: b } = range;
        let mut removed = 0;

        for (s, slot) in self.columns.iter_mut().enumerate().take(a) {
            if let Some(column) = slot
                && s + column.max_extent > a
            {
                removed += column.retain(|result| s + result.extent() <= a);
            }
        }

        if a < self.columns.len() {
            let end = b.min(self.columns.len());
            let fresh = iter::repeat_with(|| None).take(replacement_length);
            let replaced: Vec<_> = self.columns.splice(a..end, fresh).collect();

            let mut kept_at_start = None;
            for (offset, column) in replaced.into_iter().enumerate() {
                let Some(mut column) = column else { continue };
                if offset == 0 {
                    removed += column.retain(|result| result.extent() == 0);
                    if column.len() > 0 {
                        kept_at_start = Some(column);
                    }
                } else {
                    removed += column.len();
                }
            }

            if let Some(kept) = kept_at_start {
                self.merge_column(a, kept);
            }
        }

        self.len -= removed;
        if removed > 0 {
            trace!("memo edit {a}..{b} -> {replacement_length}: dropped {removed}, {} left", self.len);
        }
        removed
    }

    /// Puts zero-extent survivors back at the edit start. When a shifted
    /// column already sits there its entries win; both are valid.
    fn merge_column(&mut self, position: usize, kept: MemoColumn) {
        if position >= self.columns.len() {
            self.columns.resize_with(position + 1, || None);
        }
        match &mut self.columns[position] {
            slot @ None => *slot = Some(kept),
            Some(existing) => {
                for (rule, result) in kept.entries {
                    if existing.get(rule).is_none() {
                        existing.insert(rule, result);
                    } else {
                        // Duplicate: the shifted entry stays, this one is gone.
                        self.len -= 1;
                    }
                }
            }
        }
    }
}
