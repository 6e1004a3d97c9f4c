use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::editing::ParsedBuffer;
use crate::markdown::{GrammarOptions, MarkdownGrammar};

fn markdown() -> MarkdownGrammar {
    MarkdownGrammar::build(&GrammarOptions::default()).unwrap()
}

#[test]
fn typing_in_header_does_not_revisit_paragraph() {
    let markdown = markdown();
    let rules = *markdown.rules();
    let mut doc = ParsedBuffer::new("# Title\n\nBody\n", markdown.grammar().clone());
    let paragraph_before = doc.tree().unwrap().children()[2].id();

    doc.reset_stats();
    doc.replace_characters(7..7, "s");

    assert_eq!(doc.text(), "# Titles\n\nBody\n");
    assert_eq!(doc.stats().evaluations(rules.header), 1);
    assert_eq!(doc.stats().evaluations(rules.paragraph), 0);
    let root = doc.tree().unwrap();
    assert_eq!(root.children()[2].id(), paragraph_before);
    assert_eq!(
        root.compact_structure(),
        "(document (header delimiter text) blank_line (paragraph text))"
    );
}

#[test]
fn deleting_the_newline_merges_paragraph_into_header() {
    let mut doc = ParsedBuffer::new("# Title\nBody\n", markdown().grammar().clone());
    assert_eq!(
        doc.tree().unwrap().compact_structure(),
        "(document (header delimiter text) (paragraph text))"
    );
    doc.replace_characters(7..8, "");
    assert_eq!(doc.text(), "# TitleBody\n");
    assert_eq!(doc.tree().unwrap().compact_structure(), "(document (header delimiter text))");
}

#[test]
fn typing_a_marker_turns_paragraph_into_list() {
    let mut doc = ParsedBuffer::new("intro\n\nitem\n", markdown().grammar().clone());
    doc.replace_characters(7..7, "- ");
    assert_eq!(
        doc.tree().unwrap().compact_structure(),
        "(document (paragraph text) blank_line (list (list_item delimiter text)))"
    );
}

#[test]
fn opening_a_fence_swallows_following_blocks() {
    let mut doc = ParsedBuffer::new("# A\n\ntext\n", markdown().grammar().clone());
    doc.replace_characters(0..0, "```\n");
    assert_eq!(doc.tree().unwrap().compact_structure(), "(document (code_fence delimiter))");
    doc.replace_characters(0..4, "");
    assert_eq!(
        doc.tree().unwrap().compact_structure(),
        "(document (header delimiter text) blank_line (paragraph text))"
    );
}

fn document_of(blocks: usize) -> String {
    "Some text here.\n\n".repeat(blocks)
}

#[rstest]
#[case::inline_memoized(true)]
#[case::inline_unmemoized(false)]
fn misses_do_not_grow_with_document_size(#[case] memoize_inline: bool) {
    let options = GrammarOptions {
        memoize_inline,
        ..GrammarOptions::default()
    };
    let markdown = MarkdownGrammar::build(&options).unwrap();
    // 6000 blocks is a little over 100k code units.
    let misses: Vec<u64> = [10, 100, 1000, 6000]
        .into_iter()
        .map(|blocks| {
            let mut doc = ParsedBuffer::new(&document_of(blocks), markdown.grammar().clone());
            let block_len = "Some text here.\n\n".len();
            let at = (blocks / 2) * block_len + 4;
            doc.reset_stats();
            doc.replace_characters(at..at, "x");
            assert!(doc.tree().is_some());
            doc.stats().misses
        })
        .collect();
    assert!(misses.windows(2).all(|w| w[0] == w[1]), "misses {misses:?}");
    assert!(misses[0] < 20, "misses {misses:?}");
}
