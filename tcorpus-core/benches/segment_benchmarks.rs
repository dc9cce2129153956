//! Performance benchmarks for segmentation and tagging
//!
//! Run with: cargo bench --bench segment_benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tcorpus_core::{init_tagger, ner, pos, segment, Frame, Level, NerOptions, PosOptions, SegmentOptions, Value};

/// Generate a frame of `rows` texts with about `size` bytes each
fn generate_frame(rows: usize, size: usize) -> Frame {
    let base = "Dr. Smith flew from London to Paris. The meeting went well! \
                Was the U.S. delegation there?\n\n";
    let repeat_count = size / base.len() + 1;
    let mut text = base.repeat(repeat_count);
    text.truncate(size);

    let texts = (0..rows).map(|_| Value::from(text.as_str())).collect();
    let ids = (0..rows).map(Value::from).collect();
    Frame::from_columns(vec![("text", texts), ("doc", ids)]).unwrap()
}

/// Benchmark each segmentation level
fn bench_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_levels");
    let frame = generate_frame(100, 4096);
    let options = SegmentOptions::builder().keep_cols(["doc"]).build().unwrap();

    group.throughput(Throughput::Bytes(100 * 4096));
    for level in Level::ALL {
        group.bench_with_input(BenchmarkId::new("segment", level), &frame, |b, frame| {
            b.iter(|| segment(black_box(frame), level, &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark row counts at sentence level
fn bench_row_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_counts");
    let options = SegmentOptions::default();

    for rows in [10, 100, 1000] {
        let frame = generate_frame(rows, 1024);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("sentence", rows), &frame, |b, frame| {
            b.iter(|| segment(black_box(frame), Level::Sentence, &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the embedded taggers on sentence rows
fn bench_taggers(c: &mut Criterion) {
    let mut group = c.benchmark_group("taggers");
    let sentences = segment(&generate_frame(20, 4096), Level::Sentence, &SegmentOptions::default()).unwrap();
    let ner_tagger = init_tagger("ner").unwrap();
    let pos_tagger = init_tagger("pos").unwrap();
    let ner_options = NerOptions::builder().text_col("sentence").build().unwrap();
    let pos_options = PosOptions::builder().text_col("sentence").build().unwrap();

    group.throughput(Throughput::Elements(sentences.len() as u64));
    group.bench_function("ner", |b| {
        b.iter(|| ner(black_box(&sentences), ner_tagger.as_ref(), &ner_options).unwrap());
    });
    group.bench_function("pos", |b| {
        b.iter(|| pos(black_box(&sentences), pos_tagger.as_ref(), &pos_options).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_levels, bench_row_counts, bench_taggers);
criterion_main!(benches);
