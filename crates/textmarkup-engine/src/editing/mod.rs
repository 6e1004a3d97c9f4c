/*!
 * # Editing Core Module
 *
 * Editable documents whose syntax tree is re-derived after every edit.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: Piece Table
 * - The document text lives in a **`PieceTable`**: an immutable original
 *   buffer, an append-only added buffer, and an ordered list of pieces
 * - All offsets are **UTF-16 code units**, matching the editor's text APIs
 * - Saving writes the pieces verbatim; Markdown is never regenerated from a model
 *
 * ### 2. Range Replacement
 * - Every edit is a `replace_characters(range, text)` call; insertion and
 *   deletion are the empty-range and empty-text cases
 * - Each edit returns a **`Patch`** describing the changed span, the length
 *   delta and the new document version
 *
 * ### 3. Incremental Re-parse
 * - After mutating the buffer, the edit is reported to the
 *   `MemoizationTable`, which drops only the cached results that looked at
 *   the edited region and shifts everything after it
 * - The start rule is then re-run; unchanged blocks come straight from the cache
 *
 * ### 4. Explicit Failure
 * - A parse that does not cover the whole buffer is surfaced as
 *   `ParseError::Incomplete` with the partial tree, never silently truncated
 *
 * ## Module Structure
 *
 * - **`piece_table`**: `PieceTable`, `Piece`, `PieceSource`
 * - **`parsed_buffer`**: `ParsedBuffer`, the facade tying buffer and parser together
 * - **`patch`**: Edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use textmarkup_engine::editing::ParsedBuffer;
 * use textmarkup_engine::markdown::{GrammarOptions, MarkdownGrammar};
 *
 * let markdown = MarkdownGrammar::build(&GrammarOptions::default()).unwrap();
 * let mut doc = ParsedBuffer::new("# Title\n\nBody\n", markdown.grammar().clone());
 *
 * let patch = doc.replace_characters(7..7, "s");
 * assert_eq!(patch.delta, 1);
 * assert_eq!(doc.text(), "# Titles\n\nBody\n");
 * assert!(doc.tree().is_some());
 * ```
 */

pub mod parsed_buffer;
pub mod patch;
pub mod piece_table;

pub use parsed_buffer::ParsedBuffer;
pub use patch::Patch;
pub use piece_table::{Piece, PieceSource, PieceTable};
