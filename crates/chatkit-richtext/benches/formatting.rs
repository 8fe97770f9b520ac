//! Benchmarks for message formatting throughput.
//!
//! The formatter must sustain thousands of calls per second on a typical
//! chat message (~300 characters of mixed Markdown and markup).

use criterion::{Criterion, criterion_group, criterion_main};

use chatkit_richtext::{PlainTextFormatter, RichTextFormatter};

/// A ~300-character message mixing Markdown constructs and inline markup.
fn mixed_message() -> String {
    "# Deploy status\n\
     The build for **release-1.4** finished. See [the logs](https://ci.example.com/run/1481?step=deploy&view=raw) for details.\n\
     - `cargo test` passed on *all* targets\n\
     - docs published\n\
     > rollback window closes at 18:00\n\
     Final summary: <b>ok</b> <span style=\"color: rgb(0, 128, 0)\">green</span> ~~delayed~~"
        .to_owned()
}

fn bench_format_mixed(c: &mut Criterion) {
    let formatter = RichTextFormatter::new([
        "b", "i", "s", "a", "ul", "li", "font", "size", "color", "blockquote",
    ]);
    let input = mixed_message();

    c.bench_function("format_mixed_message", |b| {
        b.iter(|| formatter.format(&input));
    });
}

fn bench_format_stripped(c: &mut Criterion) {
    let formatter = RichTextFormatter::new(Vec::<String>::new());
    let input = mixed_message();

    c.bench_function("format_mixed_message_empty_tag_set", |b| {
        b.iter(|| formatter.format(&input));
    });
}

fn bench_reduce_mixed(c: &mut Criterion) {
    let formatter = PlainTextFormatter::new();
    let input = mixed_message();

    c.bench_function("reduce_mixed_message", |b| {
        b.iter(|| formatter.reduce(&input));
    });
}

criterion_group!(
    benches,
    bench_format_mixed,
    bench_format_stripped,
    bench_reduce_mixed
);
criterion_main!(benches);
