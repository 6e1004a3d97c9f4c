//! # Grammar
//!
//! A grammar is an arena of [`Rule`]s addressed by [`RuleId`]. Rules refer
//! to each other only by id, so recursive grammars are plain data: a rule
//! that needs to refer to itself (or to a rule defined later) goes through a
//! forward declaration, see [`GrammarBuilder::declare`].
//!
//! Grammars are frozen by [`GrammarBuilder::build`], which validates them,
//! and are then shared immutably (`Arc<Grammar>`) between any number of
//! parsed buffers.

mod builder;
mod charset;
mod validate;

use std::fmt;

pub use builder::GrammarBuilder;
pub(crate) use builder::fold_case;
pub use charset::CharacterSet;

use crate::node_type::NodeType;

/// Index of a rule in its grammar's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    /// Panics if the arena has outgrown `u32`; ids must stay distinct.
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "rule arena exceeds u32::MAX rules");
        RuleId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of the rule graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Exact code units. Case-insensitive literals store folded units.
    Literal {
        units: Vec<u16>,
        case_insensitive: bool,
    },
    /// One Unicode scalar from the set.
    CharacterSet(CharacterSet),
    /// Any one Unicode scalar.
    Dot,
    /// All members in order; consumes nothing on failure.
    Sequence(Vec<RuleId>),
    /// Ordered choice: the first alternative that succeeds wins.
    Choice(Vec<RuleId>),
    /// Greedy repetition; `max: None` is unbounded.
    Repeat {
        rule: RuleId,
        min: usize,
        max: Option<usize>,
    },
    PositiveLookahead(RuleId),
    NegativeLookahead(RuleId),
    /// Turns whatever the inner rule consumed into one node of `node_type`.
    Wrap { rule: RuleId, node_type: NodeType },
    /// Routes the inner rule through the memoization table.
    Memoize(RuleId),
    /// A defined forward declaration; evaluates its target.
    Reference(RuleId),
}

impl Rule {
    /// Rules this rule may invoke, in order.
    pub fn children(&self) -> &[RuleId] {
        match self {
            Rule::Literal { .. } | Rule::CharacterSet(_) | Rule::Dot => &[],
            Rule::Sequence(rules) | Rule::Choice(rules) => rules,
            Rule::Repeat { rule, .. }
            | Rule::PositiveLookahead(rule)
            | Rule::NegativeLookahead(rule)
            | Rule::Wrap { rule, .. }
            | Rule::Memoize(rule)
            | Rule::Reference(rule) => std::slice::from_ref(rule),
        }
    }
}

/// A validated, immutable rule graph with one entry rule.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    names: Vec<Option<String>>,
    start: RuleId,
}

impl Grammar {
    pub fn start(&self) -> RuleId {
        self.start
    }

    /// # Panics
    ///
    /// If `id` does not belong to this grammar.
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn name(&self, id: RuleId) -> Option<&str> {
        self.names.get(id.index())?.as_deref()
    }

    /// The rule's name if it has one, otherwise its id.
    pub fn describe(&self, id: RuleId) -> String {
        match self.name(id) {
            Some(name) => name.to_string(),
            None => id.to_string(),
        }
    }

    /// Looks a rule up by the name given through `declare` or `name`.
    pub fn find(&self, name: &str) -> Option<RuleId> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .map(RuleId::from_index)
    }
}
