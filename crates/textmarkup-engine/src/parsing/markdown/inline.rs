//! Inline rules: code spans, strong, emphasis, wikilinks and text.
//!
//! Nothing here consumes a newline, so inline markup never spans lines.

use textmarkup_syntax::{GrammarBuilder, NodeType, RuleId};

use super::{
    CODE, EMPHASIS, GrammarOptions, Lexical, STRONG, TEXT, WIKILINK, WIKILINK_ALIAS,
    WIKILINK_TARGET,
};

pub(crate) struct InlineRules {
    /// A single inline element.
    pub inline: RuleId,
    /// One or more inline elements: the text of a header, item or paragraph line.
    pub inline_line: RuleId,
}

pub(crate) fn build(g: &mut GrammarBuilder, lexical: &Lexical, options: &GrammarOptions) -> InlineRules {
    let inline = g.declare("inline");

    let code = code_span(g);
    let strong = delimited(g, inline, "**", STRONG);
    let emphasis = delimited(g, inline, "*", EMPHASIS);
    let wikilink = wikilink(g);

    let plain = g.none_of("\n*`[");
    let plain_run = g.one_or_more(plain);
    let text = g.wrap(plain_run, TEXT);
    // Markup characters that opened nothing.
    let stray = g.wrap(lexical.not_newline, TEXT);

    let element = g.choice([code, strong, emphasis, wikilink, text, stray]);
    let element = if options.memoize_inline {
        g.memoize(element)
    } else {
        element
    };
    g.define(inline, element);

    let inline_line = g.one_or_more(inline);
    InlineRules {
        inline,
        inline_line: g.name(inline_line, "inline_line"),
    }
}

/// `` `...` `` with no nested markup.
fn code_span(g: &mut GrammarBuilder) -> RuleId {
    let tick = g.literal("`");
    let body_char = g.none_of("`\n");
    let body = g.one_or_more(body_char);
    let span = g.sequence([tick, body, tick]);
    g.wrap(span, CODE)
}

/// `marker`, one or more inline elements not starting with `marker`, `marker`.
fn delimited(g: &mut GrammarBuilder, inline: RuleId, marker: &str, node_type: NodeType) -> RuleId {
    let open = g.literal(marker);
    let close = g.literal(marker);
    let not_close = g.not(close);
    let content_element = g.sequence([not_close, inline]);
    let content = g.one_or_more(content_element);
    let span = g.sequence([open, content, close]);
    g.wrap(span, node_type)
}

/// `[[target]]` or `[[target|alias]]`.
fn wikilink(g: &mut GrammarBuilder) -> RuleId {
    let open = g.literal("[[");
    let close = g.literal("]]");

    let target_char = g.none_of("|]\n");
    let target_chars = g.one_or_more(target_char);
    let target = g.wrap(target_chars, WIKILINK_TARGET);

    let bar = g.literal("|");
    let alias_char = g.none_of("]\n");
    let alias_chars = g.one_or_more(alias_char);
    let alias = g.wrap(alias_chars, WIKILINK_ALIAS);
    let bar_alias = g.sequence([bar, alias]);
    let alias = g.optional(bar_alias);

    let link = g.sequence([open, target, alias, close]);
    g.wrap(link, WIKILINK)
}
