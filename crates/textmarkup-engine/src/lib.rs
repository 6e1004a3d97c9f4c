//! # textmarkup-engine
//!
//! Editable note documents on top of `textmarkup-syntax`: a piece-table
//! buffer, the [`ParsedBuffer`] facade that re-parses after every edit, a
//! mini-Markdown grammar and snapshot helpers for testing grammars.
//!
//! ```
//! use textmarkup_engine::{GrammarOptions, MarkdownGrammar, ParsedBuffer};
//!
//! let markdown = MarkdownGrammar::build(&GrammarOptions::default()).unwrap();
//! let mut doc = ParsedBuffer::new("- milk\n", markdown.grammar().clone());
//! doc.replace_characters(0..0, "# Shopping\n");
//! assert_eq!(
//!     doc.tree().unwrap().compact_structure(),
//!     "(document (header delimiter text) (list (list_item delimiter text)))"
//! );
//! ```

pub mod editing;
pub mod parsing;

pub use editing::{ParsedBuffer, Patch, Piece, PieceSource, PieceTable};
pub use parsing::{markdown, parse_document, snapshot};
pub use markdown::{GrammarOptions, MarkdownGrammar, MarkdownRules};
