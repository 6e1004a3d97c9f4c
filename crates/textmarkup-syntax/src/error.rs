use std::sync::Arc;

use thiserror::Error;

use crate::grammar::RuleId;
use crate::tree::SyntaxTreeNode;

/// A grammar that cannot be frozen.
///
/// Returned by [`GrammarBuilder::build`](crate::GrammarBuilder::build). These
/// are mistakes in the grammar definition, not in the text being parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("rule `{name}` was declared but never defined")]
    UndefinedRule { name: String },

    #[error("rule `{name}` is defined twice")]
    Redefined { name: String },

    #[error("rule {rule} is not a forward declaration")]
    NotADeclaration { rule: RuleId },

    #[error("rule {rule} is a choice without alternatives")]
    EmptyChoice { rule: RuleId },

    #[error("rule {rule} is a sequence without members")]
    EmptySequence { rule: RuleId },

    #[error("rule {rule} has an inverted repeat range {min}..={max}")]
    InvalidRepeatRange { rule: RuleId, min: usize, max: usize },

    #[error("rule {rule} refers to unknown rule {target}")]
    UnknownRule { rule: RuleId, target: RuleId },

    #[error("left recursion: {}", cycle.join(" -> "))]
    LeftRecursion { cycle: Vec<String> },
}

/// Why a buffer did not produce a complete syntax tree.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// The start rule failed at position 0.
    #[error("start rule did not match (examined {examined_length} code units)")]
    NoMatch { examined_length: usize },

    /// The start rule matched but stopped before the end of the buffer.
    ///
    /// `partial` covers `0..consumed`; the text after it is unparsed.
    #[error("parse stopped at {consumed} of {length} code units")]
    Incomplete {
        consumed: usize,
        length: usize,
        partial: Arc<SyntaxTreeNode>,
    },
}

impl ParseError {
    /// The tree that was built before parsing stopped, if any.
    pub fn partial_tree(&self) -> Option<&Arc<SyntaxTreeNode>> {
        match self {
            ParseError::NoMatch { .. } => None,
            ParseError::Incomplete { partial, .. } => Some(partial),
        }
    }
}
