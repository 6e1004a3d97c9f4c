use std::ops::Range;

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Span of the replacement text in the new document.
    pub changed: Range<usize>,
    /// Change in document length, in code units.
    pub delta: isize,
    pub version: u64,
}

impl Patch {
    pub(crate) fn new(replaced: Range<usize>, inserted: usize, version: u64) -> Self {
        let delta = inserted as isize - replaced.len() as isize;
        Self {
            changed: replaced.start..replaced.start + inserted,
            delta,
            version,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.changed.is_empty() && self.delta == 0
    }
}
