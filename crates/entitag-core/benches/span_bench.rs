use criterion::{black_box, criterion_group, criterion_main, Criterion};
use entitag_core::span::spans_from_bio;

fn bench_span_conversion(c: &mut Criterion) {
    let tokens: Vec<String> = (0..64)
        .map(|i| match i % 4 {
            0 => "Nishtha".to_string(),
            1 => "Sharma".to_string(),
            2 => "works".to_string(),
            _ => format!("token{i}"),
        })
        .collect();
    let labels: Vec<&str> = (0..64)
        .map(|i| match i % 4 {
            0 => "B-PER",
            1 => "I-PER",
            _ => "O",
        })
        .collect();

    c.bench_function("spans_from_bio_64_tokens", |b| {
        b.iter(|| spans_from_bio(black_box(&tokens), black_box(&labels)));
    });
}

criterion_group!(benches, bench_span_conversion);
criterion_main!(benches);
