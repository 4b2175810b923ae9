//! Performance benchmarks for segmentation, splicing and enhancement
//!
//! Run with: cargo bench -p quietcut-audio --bench pipeline_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use quietcut_audio::analysis::{apply_padding, segment, splice};
use quietcut_audio::effects::enhance;
use quietcut_audio::test_utils::speech_with_gap;
use quietcut_core::{EnhanceOptions, NoHooks};

const SAMPLE_RATE: u32 = 44_100;

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");

    for gap_secs in [0.5, 5.0] {
        let input = speech_with_gap(SAMPLE_RATE, 5.0, gap_secs, 2);
        group.throughput(Throughput::Elements(input.frames() as u64));
        group.bench_with_input(
            BenchmarkId::new("stereo", format!("{gap_secs}s gap")),
            &input,
            |b, input| b.iter(|| black_box(segment(black_box(input), -35.0))),
        );
    }

    group.finish();
}

fn bench_splice(c: &mut Criterion) {
    let input = speech_with_gap(SAMPLE_RATE, 5.0, 5.0, 2);
    let mut regions = segment(&input, -35.0);
    apply_padding(&mut regions, 2_205);

    let mut group = c.benchmark_group("splice");
    group.throughput(Throughput::Elements(input.frames() as u64));
    group.bench_function("ratio 0.7", |b| {
        b.iter(|| black_box(splice(black_box(&input), &regions, 0.7, 13_230, &mut NoHooks)))
    });
    group.finish();
}

fn bench_enhancement(c: &mut Criterion) {
    let mut group = c.benchmark_group("enhancement");
    group.sample_size(20);

    let input = speech_with_gap(SAMPLE_RATE, 2.0, 1.0, 2);
    group.throughput(Throughput::Elements(input.frames() as u64));

    for aggressive in [false, true] {
        let options = EnhanceOptions {
            aggressive_gate: aggressive,
        };
        let label = if aggressive { "aggressive" } else { "normal" };
        group.bench_with_input(BenchmarkId::new("chain", label), &input, |b, input| {
            b.iter(|| black_box(enhance(black_box(input), &options)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_splice, bench_enhancement);
criterion_main!(benches);
