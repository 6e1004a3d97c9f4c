//! # Mini-Markdown Grammar
//!
//! A note-taking subset of Markdown expressed as a PEG, built explicitly with
//! [`MarkdownGrammar::build`] and shared between documents through
//! `Arc<Grammar>`.
//!
//! ## Blocks
//!
//! Tried in order at the start of every line:
//!
//! 1. `blank_line`: optional spaces or tabs, then a newline (or the end)
//! 2. `header`: `#`×1..=`max_heading_level`, a space, inline text
//! 3. `code_fence`: ```` ``` ```` up to a closing fence or the end of the buffer
//! 4. `block_quote`: `>` lines whose content is a nested quote, header, item
//!    or text; nesting stops at a fixed depth and deeper `>` are plain text
//! 5. `list`: consecutive `- `, `* ` or `+ ` items
//! 6. `paragraph`: the fallback, consecutive lines that start no other block
//!
//! ## Inline
//!
//! Within headers, list items and paragraphs: code spans take precedence,
//! then `**strong**`, `*emphasis*`, `[[target|alias]]` wikilinks and plain
//! text. Any other character becomes a one-character text node, so every
//! line parses and every document is consumed completely.
//!
//! ## Memoization
//!
//! `block`, each list item and each paragraph line are memoized; this is
//! what lets an edit re-evaluate only the block it touched. Inline rules are
//! memoized when [`GrammarOptions::memoize_inline`] is set.

mod blocks;
mod inline;

use std::sync::Arc;

use textmarkup_syntax::{Grammar, GrammarBuilder, GrammarError, NodeType, RuleId};

pub const DOCUMENT: NodeType = NodeType::new("document");
pub const BLANK_LINE: NodeType = NodeType::new("blank_line");
pub const HEADER: NodeType = NodeType::new("header");
pub const PARAGRAPH: NodeType = NodeType::new("paragraph");
pub const LIST: NodeType = NodeType::new("list");
pub const LIST_ITEM: NodeType = NodeType::new("list_item");
pub const BLOCK_QUOTE: NodeType = NodeType::new("block_quote");
pub const CODE_FENCE: NodeType = NodeType::new("code_fence");
/// Markup characters: heading hashes, list bullets, quote markers, fences.
pub const DELIMITER: NodeType = NodeType::new("delimiter");
pub const TEXT: NodeType = NodeType::new("text");
pub const STRONG: NodeType = NodeType::new("strong");
pub const EMPHASIS: NodeType = NodeType::new("emphasis");
pub const CODE: NodeType = NodeType::new("code");
pub const WIKILINK: NodeType = NodeType::new("wikilink");
pub const WIKILINK_TARGET: NodeType = NodeType::new("wikilink_target");
pub const WIKILINK_ALIAS: NodeType = NodeType::new("wikilink_alias");

/// Knobs for [`MarkdownGrammar::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarOptions {
    /// Longest run of `#` recognised as a header marker.
    pub max_heading_level: usize,
    pub memoize_inline: bool,
}

impl Default for GrammarOptions {
    fn default() -> Self {
        Self {
            max_heading_level: 6,
            memoize_inline: true,
        }
    }
}

/// Rule ids of interest to callers, mostly for [`textmarkup_syntax::MemoStats`]
/// queries and for evaluating a single construct.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRules {
    pub document: RuleId,
    pub block: RuleId,
    pub blank_line: RuleId,
    pub header: RuleId,
    pub code_fence: RuleId,
    pub block_quote: RuleId,
    pub list: RuleId,
    pub list_item: RuleId,
    pub paragraph: RuleId,
    pub paragraph_line: RuleId,
    pub inline: RuleId,
}

/// Line-level building blocks shared by the block and inline rules.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lexical {
    pub newline: RuleId,
    pub not_newline: RuleId,
    /// Space or tab.
    pub whitespace: RuleId,
    /// A newline, or the end of the buffer.
    pub line_end: RuleId,
}

impl Lexical {
    fn build(g: &mut GrammarBuilder) -> Self {
        let newline = g.literal("\n");
        let not_newline = g.none_of("\n");
        let any = g.dot();
        let eof = g.not(any);
        let line_end = g.choice([newline, eof]);
        let whitespace = g.one_of(" \t");
        Self {
            newline,
            not_newline,
            whitespace,
            line_end,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarkdownGrammar {
    grammar: Arc<Grammar>,
    rules: MarkdownRules,
}

impl MarkdownGrammar {
    pub fn build(options: &GrammarOptions) -> Result<Self, GrammarError> {
        let mut g = GrammarBuilder::new();
        let lexical = Lexical::build(&mut g);
        let inline = inline::build(&mut g, &lexical, options);
        let blocks = blocks::build(&mut g, &lexical, &inline, options);

        let blocks_star = g.zero_or_more(blocks.block);
        let document = g.wrap(blocks_star, DOCUMENT);
        let document = g.name(document, "document");

        let grammar = Arc::new(g.build(document)?);
        Ok(Self {
            grammar,
            rules: MarkdownRules {
                document,
                block: blocks.block,
                blank_line: blocks.blank_line,
                header: blocks.header,
                code_fence: blocks.code_fence,
                block_quote: blocks.block_quote,
                list: blocks.list,
                list_item: blocks.list_item,
                paragraph: blocks.paragraph,
                paragraph_line: blocks.paragraph_line,
                inline: inline.inline,
            },
        })
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn rules(&self) -> &MarkdownRules {
        &self.rules
    }
}
