use criterion::{Criterion, criterion_group, criterion_main};
use textmarkup_engine::{GrammarOptions, MarkdownGrammar, ParsedBuffer};
mod common;

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let markdown = MarkdownGrammar::build(&GrammarOptions::default()).unwrap();
    let content = common::generate_markdown_content(100);

    group.bench_function("full_parse", |b| {
        b.iter(|| {
            let doc = ParsedBuffer::new(std::hint::black_box(&content), markdown.grammar().clone());
            std::hint::black_box(doc.tree().is_some());
        });
    });

    group.bench_function("single_keystroke_reparse", |b| {
        let mut doc = ParsedBuffer::new(&content, markdown.grammar().clone());
        let at = common::middle_paragraph_offset(&content);
        b.iter(|| {
            doc.replace_characters(at..at, "x");
            doc.replace_characters(at..at + 1, "");
            std::hint::black_box(doc.tree().is_some());
        });
    });

    let unmemoized = MarkdownGrammar::build(&GrammarOptions {
        memoize_inline: false,
        ..GrammarOptions::default()
    })
    .unwrap();
    group.bench_function("single_keystroke_reparse_inline_unmemoized", |b| {
        let mut doc = ParsedBuffer::new(&content, unmemoized.grammar().clone());
        let at = common::middle_paragraph_offset(&content);
        b.iter(|| {
            doc.replace_characters(at..at, "x");
            doc.replace_characters(at..at + 1, "");
            std::hint::black_box(doc.tree().is_some());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parsing);
criterion_main!(benches);
