//! Integration tests for the parsing module.
//!
//! Fixtures (.md) live in `fixtures/`; each is parsed, checked against the
//! tree invariants and compared by compact structure.

mod incremental;

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use textmarkup_syntax::{SafeUnicodeBuffer, StringBuffer};

use crate::parsing::markdown::GrammarOptions;
use crate::parsing::{parse_document, snapshot};

// Fixture-based structure tests

#[test]
fn fixture_simple_paragraph() {
    assert_fixture(
        "simple_paragraph",
        "(document (paragraph text (strong text) text (emphasis text) text text))",
    );
}

#[test]
fn fixture_simple_code_fence() {
    assert_fixture("simple_code_fence", "(document (code_fence delimiter delimiter))");
}

#[test]
fn fixture_nested_quote() {
    assert_fixture(
        "nested_quote",
        "(document (block_quote delimiter (paragraph text) delimiter (block_quote delimiter (paragraph text (wikilink wikilink_target))) delimiter delimiter (list_item delimiter text)))",
    );
}

#[test]
fn fixture_wikilinks_raw_zones() {
    assert_fixture(
        "wikilinks_raw_zones",
        "(document (paragraph text (wikilink wikilink_target) text (wikilink wikilink_target wikilink_alias) text code text))",
    );
}

#[test]
fn fixture_mixed_document() {
    assert_fixture(
        "mixed_document",
        "(document (header delimiter text) blank_line (paragraph text) blank_line (header delimiter text) (list (list_item delimiter (wikilink wikilink_target)) (list_item delimiter text code)) blank_line (code_fence delimiter delimiter))",
    );
}

fn assert_fixture(name: &str, expected: &str) {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let md = std::fs::read_to_string(format!("{fixtures_dir}/{name}.md")).unwrap();

    let doc = parse_document(&md, &GrammarOptions::default()).unwrap();
    let root = doc
        .tree()
        .unwrap_or_else(|| panic!("{name}: parse incomplete: {:?}", doc.result().err()));
    snapshot::invariants(doc.buffer(), root);
    assert_eq!(root.compact_structure(), expected, "fixture {name}");
    assert_eq!(doc.text(), md, "fixture {name} must round-trip");
}

// Invariant tests

/// Slicing every leaf span reproduces the document exactly.
#[test]
fn lossless_span_invariant() {
    let md = "Hello [[world]]!\n> *quote* `x`\n";
    let doc = parse_document(md, &GrammarOptions::default()).unwrap();
    let root = doc.tree().unwrap();
    let rebuilt: String = root
        .leaves()
        .iter()
        .map(|leaf| doc.buffer().string(leaf.range()))
        .collect();
    assert_eq!(rebuilt, md);
}

/// Code spans don't produce wikilinks.
#[test]
fn raw_zones_suppress_inline_parsing() {
    let doc = parse_document("`[[not a link]]`", &GrammarOptions::default()).unwrap();
    let root = doc.tree().unwrap();
    assert!(root.find_first(crate::markdown::WIKILINK).is_none());
    assert!(root.find_first(crate::markdown::CODE).is_some());
}

#[test]
fn debug_tree_snapshot() {
    let doc = parse_document("# Hi\n- *a*\n", &GrammarOptions::default()).unwrap();
    assert_snapshot!(doc.tree().unwrap().debug_tree(doc.buffer()), @r##"
    document@0..11
      header@0..5
        delimiter@0..2 "# "
        text@2..4 "Hi"
        anonymous@4..5 "\n"
      list@5..11
        list_item@5..11
          delimiter@5..7 "- "
          emphasis@7..10
            anonymous@7..8 "*"
            text@8..9 "a"
            anonymous@9..10 "*"
          anonymous@10..11 "\n"
    "##);
}

#[test]
fn offsets_are_utf16_code_units() {
    let doc = parse_document("# 😀\nb\n", &GrammarOptions::default()).unwrap();
    let root = doc.tree().unwrap();
    assert_eq!(root.length(), 7);
    let paragraph = root.find_first(crate::markdown::PARAGRAPH).unwrap();
    assert_eq!(paragraph.range(), 5..7);
}

#[test]
fn snap_serializes_spans_and_previews() {
    let buffer = StringBuffer::from("text\n");
    let doc = parse_document("text\n", &GrammarOptions::default()).unwrap();
    let snap = snapshot::normalize(&buffer, doc.tree().unwrap());
    assert_eq!(snap.root.kind, "document");
    assert_eq!(snap.root.span, (0, 5));
    assert!(snap.root.text.is_empty());
    assert_eq!(snap.root.children[0].children[0].text, "text");
}
