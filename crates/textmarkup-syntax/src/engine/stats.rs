use crate::grammar::RuleId;

/// Counters for judging how incremental a re-parse was.
///
/// `hits` and `misses` count lookups of `Memoize` rules. Every rule
/// evaluation that was not answered from the cache is counted per rule in
/// [`MemoStats::evaluations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped by the most recent edit.
    pub invalidated: usize,
    evaluations: Vec<u64>,
}

impl MemoStats {
    pub(crate) fn new(rule_count: usize) -> Self {
        Self {
            evaluations: vec![0; rule_count],
            ..Self::default()
        }
    }

    pub(crate) fn record_evaluation(&mut self, rule: RuleId) {
        if let Some(count) = self.evaluations.get_mut(rule.index()) {
            *count += 1;
        }
    }

    /// How many times `rule` was evaluated since the last reset.
    pub fn evaluations(&self, rule: RuleId) -> u64 {
        self.evaluations.get(rule.index()).copied().unwrap_or(0)
    }

    pub fn total_evaluations(&self) -> u64 {
        self.evaluations.iter().sum()
    }

    /// Fraction of memo lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }

    pub fn reset(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.invalidated = 0;
        self.evaluations.iter_mut().for_each(|count| *count = 0);
    }
}
