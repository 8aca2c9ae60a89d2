//! Benchmarks for wordshard
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_tokenizer(c: &mut Criterion) {
    use wordshard::indexer::extract_words;

    let text = "From: sender@example.com\nTo: recipient@example.com\n\
                Subject: quarterly figures (draft)\n\n\
                Please find attached the quarterly figures, including the \
                revised revenue forecast and the updated headcount plan. \
                Let me know if anything looks off - the forecast numbers \
                were rebuilt from last week's export."
        .repeat(20);

    c.bench_function("tokenize_mail_body", |b| {
        b.iter(|| {
            let words = extract_words(black_box(&text));
            black_box(words);
        })
    });
}

fn benchmark_word_routing(c: &mut Criterion) {
    use wordshard::shard::word_shard;

    let words = [
        "cat",
        "forecast",
        "intermediateword",
        "anextraordinarilylongword",
    ];

    c.bench_function("word_shard_routing", |b| {
        b.iter(|| {
            for word in words {
                black_box(word_shard(black_box(word)));
            }
        })
    });
}

criterion_group!(benches, benchmark_tokenizer, benchmark_word_routing);
criterion_main!(benches);
