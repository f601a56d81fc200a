use criterion::{black_box, criterion_group, criterion_main, Criterion};
use locator_core::{decode, encode, LineIndex};

fn bench_encode_decode(c: &mut Criterion) {
    c.bench_function("encode_decode_windows_path", |b| {
        b.iter(|| {
            let value = encode(black_box("C:\\work\\app\\src\\components\\Card.tsx"), 120, 16);
            black_box(decode(&value));
        });
    });
}

fn bench_line_index(c: &mut Criterion) {
    let source = "<div>\n  <span>hi</span>\n</div>\n".repeat(500);
    c.bench_function("line_index_build_and_lookup", |b| {
        b.iter(|| {
            let index = LineIndex::new(black_box(&source));
            black_box(index.location(&source, source.len() / 2));
        });
    });
}

criterion_group!(benches, bench_encode_decode, bench_line_index);
criterion_main!(benches);
