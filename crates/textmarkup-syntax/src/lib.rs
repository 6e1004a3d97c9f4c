//! # textmarkup-syntax
//!
//! A packrat PEG engine that re-parses edited text incrementally, working
//! directly on UTF-16 code units.
//!
//! ## What does "incremental" mean here?
//!
//! Every `Memoize` rule caches what it decided at every position it was
//! tried, together with **how far it looked** to decide (its examined
//! length). When the text changes, only the cached decisions that looked at
//! the changed region are thrown away; everything after the edit is shifted
//! and reused. Typing one character in a large document therefore
//! re-evaluates the block being typed in, not the document.
//!
//! ## Architecture Overview
//!
//! ```text
//! GrammarBuilder ──build()──▶ Arc<Grammar> ──▶ MemoizationTable ──parse(&buffer)──▶ SyntaxTreeNode
//!                                                   ▲
//!                          apply_edit(range, len) ──┘
//! ```
//!
//! ### 1. Buffers ([`buffer`] module)
//!
//! The engine reads text through [`SafeUnicodeBuffer`]: code unit by index,
//! a count, and grapheme lookup. Reads past the end return `None`, so rules
//! can probe the end of the buffer without special cases.
//!
//! ### 2. Grammar ([`grammar`] module)
//!
//! Rules live in an arena and refer to each other by [`RuleId`]. Recursive
//! rules are written with forward declarations. [`GrammarBuilder::build`]
//! rejects left recursion, dangling references and empty choices.
//!
//! ### 3. Engine ([`engine`] module)
//!
//! [`MemoizationTable`] evaluates rules and owns the cache. It exposes
//! [`MemoStats`] so callers and tests can see how much work a re-parse did.
//!
//! ### 4. Tree ([`tree`] module)
//!
//! [`SyntaxTreeNode`]s carry a type, a length and children. They know
//! nothing about absolute positions, which is what allows cached subtrees to
//! move with the text. Consumers attach data through [`AnnotationTable`].
//!
//! ## Module Structure
//!
//! ```text
//! textmarkup-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── buffer.rs        # SafeUnicodeBuffer trait, StringBuffer
//! ├── node_type.rs     # NodeType tags
//! ├── tree.rs          # SyntaxTreeNode, NodeId, AnchoredNode
//! ├── annotations.rs   # AnnotationTable side-table
//! ├── error.rs         # GrammarError, ParseError
//! ├── grammar/
//! │   ├── mod.rs       # Rule, RuleId, Grammar
//! │   ├── builder.rs   # GrammarBuilder
//! │   ├── charset.rs   # CharacterSet
//! │   └── validate.rs  # Left recursion and structural checks
//! └── engine/
//!     ├── mod.rs       # MemoizationTable, Parse
//!     ├── evaluate.rs  # Rule semantics
//!     ├── memo.rs      # MemoStore and edit invalidation
//!     ├── result.rs    # ParseResult, Fragment
//!     └── stats.rs     # MemoStats
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use textmarkup_syntax::{GrammarBuilder, MemoizationTable, NodeType, StringBuffer};
//!
//! const LIST: NodeType = NodeType::new("list");
//! const ITEM: NodeType = NodeType::new("item");
//!
//! let mut g = GrammarBuilder::new();
//! let letter = g.none_of(",");
//! let letters = g.one_or_more(letter);
//! let item = g.wrap(letters, ITEM);
//! let comma = g.literal(",");
//! let next = g.sequence([comma, item]);
//! let rest = g.zero_or_more(next);
//! let body = g.sequence([item, rest]);
//! let list = g.wrap(body, LIST);
//! let grammar = Arc::new(g.build(list).unwrap());
//!
//! let mut table = MemoizationTable::new(grammar);
//! let parse = table.parse(&StringBuffer::from("a,b,c")).unwrap();
//! assert_eq!(parse.root.compact_structure(), "(list item item item)");
//! ```

pub mod annotations;
pub mod buffer;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod node_type;
pub mod tree;

pub use annotations::AnnotationTable;
pub use buffer::{SafeUnicodeBuffer, StringBuffer};
pub use engine::{Fragment, MemoStats, MemoizationTable, Parse, ParseResult};
pub use error::{GrammarError, ParseError};
pub use grammar::{CharacterSet, Grammar, GrammarBuilder, Rule, RuleId};
pub use node_type::NodeType;
pub use tree::{AnchoredNode, NodeId, SyntaxTreeNode};
