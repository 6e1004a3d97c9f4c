//! Rule evaluation.
//!
//! One recursive function over the rule arena. Positions are absolute buffer
//! offsets; every [`ParseResult`] it returns is relative to the position the
//! rule was invoked at.

use log::{debug, trace};

use super::memo::MemoStore;
use super::result::{Fragment, ParseResult};
use super::stats::MemoStats;
use crate::buffer::{SafeUnicodeBuffer, is_high_surrogate};
use crate::grammar::{CharacterSet, Grammar, Rule, RuleId, fold_case};

pub(crate) struct Evaluator<'a, B: ?Sized> {
    grammar: &'a Grammar,
    buffer: &'a B,
    memo: &'a mut MemoStore,
    stats: &'a mut MemoStats,
}

impl<'a, B: SafeUnicodeBuffer + ?Sized> Evaluator<'a, B> {
    pub(crate) fn new(
        grammar: &'a Grammar,
        buffer: &'a B,
        memo: &'a mut MemoStore,
        stats: &'a mut MemoStats,
    ) -> Self {
        Self {
            grammar,
            buffer,
            memo,
            stats,
        }
    }

    pub(crate) fn eval(&mut self, id: RuleId, position: usize) -> ParseResult {
        let grammar = self.grammar;
        let rule = grammar.rule(id);
        if !matches!(rule, Rule::Memoize(_)) {
            self.stats.record_evaluation(id);
        }
        match rule {
            Rule::Literal {
                units,
                case_insensitive,
            } => self.literal(units, *case_insensitive, position),
            Rule::CharacterSet(set) => self.scalar(Some(set), position),
            Rule::Dot => self.scalar(None, position),
            Rule::Sequence(members) => self.sequence(members, position),
            Rule::Choice(alternatives) => self.choice(alternatives, position),
            Rule::Repeat { rule, min, max } => self.repeat(id, *rule, *min, *max, position),
            Rule::PositiveLookahead(inner) => {
                let result = self.eval(*inner, position);
                if result.succeeded {
                    ParseResult::success(0, result.examined_length, Fragment::default())
                } else {
                    ParseResult::failure(result.examined_length)
                }
            }
            Rule::NegativeLookahead(inner) => {
                let result = self.eval(*inner, position);
                if result.succeeded {
                    ParseResult::failure(result.examined_length)
                } else {
                    ParseResult::success(0, result.examined_length, Fragment::default())
                }
            }
            Rule::Wrap { rule, node_type } => {
                let result = self.eval(*rule, position);
                if !result.succeeded {
                    return result;
                }
                let node = result.fragment.wrap(*node_type, result.length);
                ParseResult::success(result.length, result.examined_length, Fragment::node(node))
            }
            Rule::Reference(target) => self.eval(*target, position),
            Rule::Memoize(inner) => self.memoized(id, *inner, position),
        }
    }

    fn memoized(&mut self, id: RuleId, inner: RuleId, position: usize) -> ParseResult {
        if let Some(hit) = self.memo.get(id, position) {
            self.stats.hits += 1;
            return hit.clone();
        }
        self.stats.misses += 1;
        self.stats.record_evaluation(id);
        trace!("memo miss {} at {position}", self.grammar.describe(id));
        let result = self.eval(inner, position);
        self.memo.insert(id, position, result.clone());
        result
    }

    /// Matches `units` exactly. A failure has examined up to and including
    /// the first mismatching unit (or the end-of-buffer probe).
    fn literal(&self, units: &[u16], case_insensitive: bool, position: usize) -> ParseResult {
        for (offset, &expected) in units.iter().enumerate() {
            let matched = self.buffer.utf16(position + offset).is_some_and(|actual| {
                if case_insensitive {
                    fold_case(actual) == expected
                } else {
                    actual == expected
                }
            });
            if !matched {
                return ParseResult::failure(offset + 1);
            }
        }
        ParseResult::success(units.len(), units.len(), Fragment::text(units.len()))
    }

    /// One Unicode scalar, restricted to `set` when given (Dot otherwise).
    fn scalar(&self, set: Option<&CharacterSet>, position: usize) -> ParseResult {
        let Some((c, width)) = self.buffer.scalar(position) else {
            return ParseResult::failure(1);
        };
        // Decoding a high surrogate looks at the next unit even when the
        // pair turns out to be broken.
        let examined = match self.buffer.utf16(position) {
            Some(unit) if is_high_surrogate(unit) => 2,
            _ => width,
        };
        if set.is_none_or(|set| set.contains(c)) {
            ParseResult::success(width, examined, Fragment::text(width))
        } else {
            ParseResult::failure(examined)
        }
    }

    fn sequence(&mut self, members: &[RuleId], position: usize) -> ParseResult {
        let mut offset = 0;
        let mut examined = 0;
        let mut fragment = Fragment::default();
        for &member in members {
            let result = self.eval(member, position + offset);
            examined = examined.max(offset + result.examined_length);
            if !result.succeeded {
                return ParseResult::failure(examined);
            }
            offset += result.length;
            fragment.append(result.fragment);
        }
        ParseResult::success(offset, examined, fragment)
    }

    fn choice(&mut self, alternatives: &[RuleId], position: usize) -> ParseResult {
        let mut examined = 0;
        for &alternative in alternatives {
            let result = self.eval(alternative, position);
            examined = examined.max(result.examined_length);
            if result.succeeded {
                return ParseResult::success(result.length, examined, result.fragment);
            }
        }
        ParseResult::failure(examined)
    }

    /// Greedy repetition. A zero-width success counts as one iteration and
    /// stops the loop, since repeating it would never make progress.
    fn repeat(
        &mut self,
        id: RuleId,
        inner: RuleId,
        min: usize,
        max: Option<usize>,
        position: usize,
    ) -> ParseResult {
        let mut count = 0;
        let mut offset = 0;
        let mut examined = 0;
        let mut fragment = Fragment::default();
        while max.is_none_or(|max| count < max) {
            let result = self.eval(inner, position + offset);
            examined = examined.max(offset + result.examined_length);
            if !result.succeeded {
                break;
            }
            count += 1;
            fragment.append(result.fragment);
            if result.length == 0 {
                debug!(
                    "zero-width match of {} in repetition {} at {}; stopping after {count} iteration(s)",
                    self.grammar.describe(inner),
                    self.grammar.describe(id),
                    position + offset
                );
                break;
            }
            offset += result.length;
        }
        if count >= min {
            ParseResult::success(offset, examined, fragment)
        } else {
            ParseResult::failure(examined)
        }
    }
}
