// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **some** content and a [[link|alias]].\n\n- Bullet point\n  - Nested item\n- Another `item`\n\n> Quoted *text*\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

/// Offset of the middle paragraph's text, for single-keystroke edits.
#[allow(dead_code)]
pub fn middle_paragraph_offset(content: &str) -> usize {
    let needle = "Paragraph with";
    let middle = content.len() / 2;
    let byte = content[middle..]
        .find(needle)
        .map(|i| middle + i + 4)
        .unwrap_or(0);
    content[..byte].encode_utf16().count()
}
