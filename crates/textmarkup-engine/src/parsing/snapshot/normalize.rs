use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;
use textmarkup_syntax::{SafeUnicodeBuffer, SyntaxTreeNode};

#[derive(Debug, Serialize)]
pub struct Snap {
    /// Buffer length in UTF-16 code units.
    pub length: usize,
    /// Whether the tree covers the whole buffer.
    pub complete: bool,
    pub root: NodeSnap,
}

#[derive(Debug, Serialize)]
pub struct NodeSnap {
    pub kind: String,
    pub span: (usize, usize),
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnap>,
}

/// Leaves carry a text preview; interior nodes show only their span.
pub fn normalize<B: SafeUnicodeBuffer + ?Sized>(buffer: &B, root: &Arc<SyntaxTreeNode>) -> Snap {
    Snap {
        length: buffer.count(),
        complete: root.length() == buffer.count(),
        root: node_snap(buffer, root, 0),
    }
}

fn node_snap<B: SafeUnicodeBuffer + ?Sized>(buffer: &B, node: &SyntaxTreeNode, start: usize) -> NodeSnap {
    let span = start..start + node.length();
    let mut offset = start;
    let children = node
        .children()
        .iter()
        .map(|child| {
            let snap = node_snap(buffer, child, offset);
            offset += child.length();
            snap
        })
        .collect();
    NodeSnap {
        kind: node.node_type().name().to_string(),
        span: (span.start, span.end),
        text: if node.is_leaf() {
            preview(buffer, span, 60)
        } else {
            String::new()
        },
        children,
    }
}

/// Extracts text for a range, truncating to `max` characters with "..."
/// suffix if needed.
///
/// Used for human-readable snapshot output.
pub fn preview<B: SafeUnicodeBuffer + ?Sized>(buffer: &B, range: Range<usize>, max: usize) -> String {
    let text = buffer.string(range);
    if text.chars().count() <= max {
        return text;
    }
    let mut s: String = text.chars().take(max).collect();
    s.push_str("...");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{GrammarOptions, MarkdownGrammar};
    use pretty_assertions::assert_eq;
    use textmarkup_syntax::{MemoizationTable, StringBuffer};

    #[test]
    fn preview_short_text_unchanged() {
        let buffer = StringBuffer::from("hello");
        assert_eq!(preview(&buffer, 0..5, 10), "hello");
    }

    #[test]
    fn preview_exact_length_unchanged() {
        let buffer = StringBuffer::from("hello");
        assert_eq!(preview(&buffer, 0..5, 5), "hello");
    }

    #[test]
    fn preview_truncates_long_text() {
        let buffer = StringBuffer::from("hello world");
        assert_eq!(preview(&buffer, 0..11, 5), "hello...");
    }

    #[test]
    fn preview_truncates_to_zero() {
        let buffer = StringBuffer::from("hello");
        assert_eq!(preview(&buffer, 0..5, 0), "...");
    }

    #[test]
    fn preview_counts_characters_not_code_units() {
        let buffer = StringBuffer::from("😀😀x");
        assert_eq!(preview(&buffer, 0..5, 2), "😀😀...");
    }

    #[test]
    fn normalize_uses_absolute_spans() {
        let markdown = MarkdownGrammar::build(&GrammarOptions::default()).unwrap();
        let buffer = StringBuffer::from("# A\nb\n");
        let root = MemoizationTable::new(markdown.grammar().clone())
            .parse(&buffer)
            .unwrap()
            .root;
        let snap = normalize(&buffer, &root);
        assert!(snap.complete);
        assert_eq!(snap.length, 6);
        let paragraph = &snap.root.children[1];
        assert_eq!(paragraph.kind, "paragraph");
        assert_eq!(paragraph.span, (4, 6));
        assert_eq!(paragraph.children[0].text, "b");
        assert_eq!(paragraph.children[1].kind, "anonymous");
        assert_eq!(paragraph.children[1].text, "\n");
    }
}
