//! Block rules. Every block starts at the beginning of a line and ends after
//! its last newline (or at the end of the buffer).

use textmarkup_syntax::{GrammarBuilder, NodeType, RuleId};

use super::inline::InlineRules;
use super::{
    BLANK_LINE, BLOCK_QUOTE, CODE_FENCE, DELIMITER, GrammarOptions, HEADER, LIST, LIST_ITEM,
    Lexical, PARAGRAPH,
};

pub(crate) struct BlockRules {
    pub block: RuleId,
    pub blank_line: RuleId,
    pub header: RuleId,
    pub code_fence: RuleId,
    pub block_quote: RuleId,
    pub list: RuleId,
    pub list_item: RuleId,
    pub paragraph: RuleId,
    pub paragraph_line: RuleId,
}

/// Line openers, matched without their content. A paragraph line must not
/// start with any of them.
struct Markers {
    header: RuleId,
    fence: RuleId,
    quote: RuleId,
    bullet: RuleId,
}

impl Markers {
    fn build(g: &mut GrammarBuilder, options: &GrammarOptions) -> Self {
        let hash = g.literal("#");
        let hashes = g.repeat(hash, 1..=options.max_heading_level);
        let space = g.literal(" ");
        let header = g.sequence([hashes, space]);

        let fence = g.literal("```");

        let angle = g.literal(">");
        let optional_space = g.optional(space);
        let quote = g.sequence([angle, optional_space]);

        let indent = g.zero_or_more(space);
        let bullet_char = g.one_of("-*+");
        let bullet = g.sequence([indent, bullet_char, space]);

        Self {
            header,
            fence,
            quote,
            bullet,
        }
    }
}

pub(crate) fn build(
    g: &mut GrammarBuilder,
    lexical: &Lexical,
    inline: &InlineRules,
    options: &GrammarOptions,
) -> BlockRules {
    let markers = Markers::build(g, options);

    let blank_line = blank_line(g, lexical);
    let header = line_with_marker(g, markers.header, inline, lexical, HEADER);
    let header = g.name(header, "header");
    let code_fence = code_fence(g, lexical, markers.fence);

    let list_item = line_with_marker(g, markers.bullet, inline, lexical, LIST_ITEM);
    let list_item = g.name(list_item, "list_item");
    let memo_item = g.memoize(list_item);
    let items = g.one_or_more(memo_item);
    let list = g.wrap(items, LIST);
    let list = g.name(list, "list");

    let block_quote = block_quote(g, lexical, inline, &markers, header, list_item);

    let block_start = g.choice([
        blank_line,
        markers.header,
        markers.fence,
        markers.quote,
        markers.bullet,
    ]);
    let not_block_start = g.not(block_start);
    let paragraph_line = g.sequence([not_block_start, inline.inline_line, lexical.line_end]);
    let paragraph_line = g.name(paragraph_line, "paragraph_line");
    let memo_line = g.memoize(paragraph_line);
    let lines = g.one_or_more(memo_line);
    let paragraph = g.wrap(lines, PARAGRAPH);
    let paragraph = g.name(paragraph, "paragraph");

    let alternatives = g.choice([blank_line, header, code_fence, block_quote, list, paragraph]);
    let block = g.memoize(alternatives);
    let block = g.name(block, "block");

    BlockRules {
        block,
        blank_line,
        header,
        code_fence,
        block_quote,
        list,
        list_item,
        paragraph,
        paragraph_line,
    }
}

/// Whitespace up to a newline, or whitespace running to the end of the
/// buffer. An empty tail is not a blank line.
fn blank_line(g: &mut GrammarBuilder, lexical: &Lexical) -> RuleId {
    let any_ws = g.zero_or_more(lexical.whitespace);
    let terminated = g.sequence([any_ws, lexical.newline]);
    let some_ws = g.one_or_more(lexical.whitespace);
    let any = g.dot();
    let eof = g.not(any);
    let trailing = g.sequence([some_ws, eof]);
    let blank = g.choice([terminated, trailing]);
    let blank = g.wrap(blank, BLANK_LINE);
    g.name(blank, "blank_line")
}

/// `marker`, optional inline text, end of line.
fn line_with_marker(
    g: &mut GrammarBuilder,
    marker: RuleId,
    inline: &InlineRules,
    lexical: &Lexical,
    node_type: NodeType,
) -> RuleId {
    let delimiter = g.wrap(marker, DELIMITER);
    let text = g.optional(inline.inline_line);
    let line = g.sequence([delimiter, text, lexical.line_end]);
    g.wrap(line, node_type)
}

/// An opening fence with optional info string, raw lines, and a closing
/// fence. An unclosed fence runs to the end of the buffer.
fn code_fence(g: &mut GrammarBuilder, lexical: &Lexical, fence: RuleId) -> RuleId {
    let info = g.zero_or_more(lexical.not_newline);
    let opening = g.sequence([fence, info]);
    let opening = g.wrap(opening, DELIMITER);

    let rest_of_line = g.zero_or_more(lexical.not_newline);
    let terminated_line = g.sequence([rest_of_line, lexical.newline]);
    let last_chars = g.one_or_more(lexical.not_newline);
    let any_line = g.choice([terminated_line, last_chars]);
    let not_fence = g.not(fence);
    let body_line = g.sequence([not_fence, any_line]);
    let body = g.zero_or_more(body_line);

    let closing_fence = g.wrap(fence, DELIMITER);
    let trailing_ws = g.zero_or_more(lexical.whitespace);
    let closing = g.sequence([closing_fence, trailing_ws, lexical.line_end]);
    let closing = g.optional(closing);

    let block = g.sequence([opening, lexical.line_end, body, closing]);
    let block = g.wrap(block, CODE_FENCE);
    g.name(block, "code_fence")
}

/// Deepest `>` nesting that becomes nested quotes. Further markers on the
/// line are paragraph text.
pub(crate) const MAX_QUOTE_DEPTH: usize = 32;

/// One or more `>` lines. Each line's content is a nested quote, a header,
/// a list item, paragraph text or nothing.
///
/// Nesting is unrolled into [`MAX_QUOTE_DEPTH`] levels rather than written
/// as a recursive rule, so evaluation depth stays bounded on any input.
fn block_quote(
    g: &mut GrammarBuilder,
    lexical: &Lexical,
    inline: &InlineRules,
    markers: &Markers,
    header: RuleId,
    list_item: RuleId,
) -> RuleId {
    let delimiter = g.wrap(markers.quote, DELIMITER);
    let text_line = g.sequence([inline.inline_line, lexical.line_end]);
    let text = g.wrap(text_line, PARAGRAPH);

    let innermost = g.choice([header, list_item, text, lexical.line_end]);
    let mut quote_line = g.sequence([delimiter, innermost]);
    for _ in 1..MAX_QUOTE_DEPTH {
        let nested = g.wrap(quote_line, BLOCK_QUOTE);
        let content = g.choice([nested, header, list_item, text, lexical.line_end]);
        quote_line = g.sequence([delimiter, content]);
    }
    let quote_line = g.name(quote_line, "quote_line");

    let lines = g.one_or_more(quote_line);
    let quote = g.wrap(lines, BLOCK_QUOTE);
    g.name(quote, "block_quote")
}
