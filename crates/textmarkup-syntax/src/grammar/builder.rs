use std::ops::{Bound, RangeBounds};

use super::validate;
use super::{CharacterSet, Grammar, Rule, RuleId};
use crate::error::GrammarError;
use crate::node_type::NodeType;

/// Incrementally assembles a [`Grammar`].
///
/// Every combinator pushes one rule into the arena and returns its id.
/// Mistakes that can only be seen once the whole graph exists (undefined
/// declarations, left recursion) and misuse of the builder itself are
/// collected and reported by [`GrammarBuilder::build`].
///
/// ```
/// use textmarkup_syntax::{CharacterSet, GrammarBuilder, NodeType};
///
/// const WORD: NodeType = NodeType::new("word");
///
/// let mut g = GrammarBuilder::new();
/// let letter = g.character_set(CharacterSet::range('a', 'z'));
/// let letters = g.one_or_more(letter);
/// let word = g.wrap(letters, WORD);
/// let grammar = g.build(word).unwrap();
/// assert_eq!(grammar.rule_count(), 3);
/// ```
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    /// `None` marks a declaration that has not been defined yet.
    rules: Vec<Option<Rule>>,
    names: Vec<Option<String>>,
    errors: Vec<GrammarError>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, rule: Rule) -> RuleId {
        let id = RuleId::from_index(self.rules.len());
        self.rules.push(Some(rule));
        self.names.push(None);
        id
    }

    pub fn literal(&mut self, text: &str) -> RuleId {
        self.push(Rule::Literal {
            units: text.encode_utf16().collect(),
            case_insensitive: false,
        })
    }

    /// Matches `text` ignoring simple (one-to-one) case differences.
    pub fn literal_case_insensitive(&mut self, text: &str) -> RuleId {
        self.push(Rule::Literal {
            units: text.encode_utf16().map(fold_case).collect(),
            case_insensitive: true,
        })
    }

    pub fn character_set(&mut self, set: CharacterSet) -> RuleId {
        self.push(Rule::CharacterSet(set))
    }

    /// Shorthand for a character set of exactly these characters.
    pub fn one_of(&mut self, chars: &str) -> RuleId {
        self.character_set(CharacterSet::any_of(chars))
    }

    /// Shorthand for a character set of everything but these characters.
    pub fn none_of(&mut self, chars: &str) -> RuleId {
        self.character_set(CharacterSet::none_of(chars))
    }

    pub fn dot(&mut self) -> RuleId {
        self.push(Rule::Dot)
    }

    pub fn sequence(&mut self, rules: impl IntoIterator<Item = RuleId>) -> RuleId {
        self.push(Rule::Sequence(rules.into_iter().collect()))
    }

    pub fn choice(&mut self, rules: impl IntoIterator<Item = RuleId>) -> RuleId {
        self.push(Rule::Choice(rules.into_iter().collect()))
    }

    /// Repeats `rule` a number of times within `range`, greedily.
    pub fn repeat(&mut self, rule: RuleId, range: impl RangeBounds<usize>) -> RuleId {
        let min = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let max = match range.end_bound() {
            Bound::Included(&n) => Some(n),
            Bound::Excluded(&n) => Some(n.saturating_sub(1)),
            Bound::Unbounded => None,
        };
        let empty = match range.end_bound() {
            Bound::Included(&n) => n < min,
            Bound::Excluded(&n) => n <= min,
            Bound::Unbounded => false,
        };
        let id = self.push(Rule::Repeat { rule, min, max });
        if empty {
            self.errors.push(GrammarError::InvalidRepeatRange {
                rule: id,
                min,
                max: max.unwrap_or(0),
            });
        }
        id
    }

    pub fn zero_or_more(&mut self, rule: RuleId) -> RuleId {
        self.repeat(rule, ..)
    }

    pub fn one_or_more(&mut self, rule: RuleId) -> RuleId {
        self.repeat(rule, 1..)
    }

    pub fn optional(&mut self, rule: RuleId) -> RuleId {
        self.repeat(rule, ..=1)
    }

    /// Succeeds without consuming if `rule` would succeed here.
    pub fn lookahead(&mut self, rule: RuleId) -> RuleId {
        self.push(Rule::PositiveLookahead(rule))
    }

    /// Succeeds without consuming if `rule` would fail here.
    pub fn not(&mut self, rule: RuleId) -> RuleId {
        self.push(Rule::NegativeLookahead(rule))
    }

    pub fn wrap(&mut self, rule: RuleId, node_type: NodeType) -> RuleId {
        self.push(Rule::Wrap { rule, node_type })
    }

    pub fn memoize(&mut self, rule: RuleId) -> RuleId {
        self.push(Rule::Memoize(rule))
    }

    /// Reserves an id for a rule defined later with [`Self::define`].
    ///
    /// This is how recursive rules are written: combinators may use the
    /// declared id straight away.
    pub fn declare(&mut self, name: &str) -> RuleId {
        let id = RuleId::from_index(self.rules.len());
        self.rules.push(None);
        self.names.push(Some(name.to_string()));
        id
    }

    /// Points a declaration at the rule that implements it.
    pub fn define(&mut self, declared: RuleId, rule: RuleId) {
        let Some(slot) = self.rules.get_mut(declared.index()) else {
            self.errors.push(GrammarError::NotADeclaration { rule: declared });
            return;
        };
        match slot {
            None => *slot = Some(Rule::Reference(rule)),
            Some(Rule::Reference(_)) => {
                let name = self.names[declared.index()].clone().unwrap_or_default();
                self.errors.push(GrammarError::Redefined { name });
            }
            Some(_) => self
                .errors
                .push(GrammarError::NotADeclaration { rule: declared }),
        }
    }

    /// Attaches a name used in diagnostics and by [`Grammar::find`].
    pub fn name(&mut self, rule: RuleId, name: &str) -> RuleId {
        if let Some(slot) = self.names.get_mut(rule.index()) {
            *slot = Some(name.to_string());
        }
        rule
    }

    /// Freezes the grammar with `start` as its entry rule.
    ///
    /// Reports the first problem found: builder misuse first, then
    /// undefined declarations, dangling ids, empty sequences and choices,
    /// and finally left recursion.
    pub fn build(self, start: RuleId) -> Result<Grammar, GrammarError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        let mut rules = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.into_iter().enumerate() {
            match rule {
                Some(rule) => rules.push(rule),
                None => {
                    return Err(GrammarError::UndefinedRule {
                        name: self.names[index].clone().unwrap_or_default(),
                    });
                }
            }
        }
        let grammar = Grammar {
            rules,
            names: self.names,
            start,
        };
        validate::validate(&grammar)?;
        Ok(grammar)
    }
}

/// Simple case folding of a single code unit. Characters whose lowercase
/// form is not a single BMP scalar are left alone.
pub(crate) fn fold_case(unit: u16) -> u16 {
    if unit < 0x80 {
        return u16::from((unit as u8).to_ascii_lowercase());
    }
    let Some(c) = char::from_u32(u32::from(unit)) else {
        return unit;
    };
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => u16::try_from(u32::from(l)).unwrap_or(unit),
        _ => unit,
    }
}
