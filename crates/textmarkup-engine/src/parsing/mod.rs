pub mod markdown;
pub mod snapshot;

#[cfg(test)]
mod tests;

use crate::editing::ParsedBuffer;
use markdown::{GrammarOptions, MarkdownGrammar};
use textmarkup_syntax::GrammarError;

/// Parses `text` with the Markdown grammar built from `options`.
///
/// Callers editing many documents should build the grammar once and share
/// it through [`ParsedBuffer::new`] instead.
pub fn parse_document(text: &str, options: &GrammarOptions) -> Result<ParsedBuffer, GrammarError> {
    let markdown = MarkdownGrammar::build(options)?;
    Ok(ParsedBuffer::new(text, markdown.grammar().clone()))
}
