//! Criterion micro-benchmarks for the bit codec primitives.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use octane_bits::{BitReader, BitWriter};

/// Benchmark: write 10K bounded integers against a 1023 cap.
fn bench_write_bounded(c: &mut Criterion) {
    c.bench_function("bits_write_bounded_10k", |b| {
        b.iter(|| {
            let mut w = BitWriter::new();
            for i in 0..10_000u32 {
                w.write_bounded(i % 1024, 1023);
            }
            black_box(w.into_bytes());
        });
    });
}

/// Benchmark: read back 10K bounded integers.
fn bench_read_bounded(c: &mut Criterion) {
    let mut w = BitWriter::new();
    for i in 0..10_000u32 {
        w.write_bounded(i % 1024, 1023);
    }
    let bytes = w.into_bytes();

    c.bench_function("bits_read_bounded_10k", |b| {
        b.iter(|| {
            let mut r = BitReader::new(&bytes);
            for _ in 0..10_000 {
                black_box(r.read_bounded(1023).unwrap());
            }
        });
    });
}

/// Benchmark: unaligned 32-bit fixed reads.
fn bench_read_fixed_unaligned(c: &mut Criterion) {
    let mut w = BitWriter::new();
    w.write_bit(true); // force misalignment
    for i in 0..10_000u32 {
        w.write_fixed(i, 32);
    }
    let bytes = w.into_bytes();

    c.bench_function("bits_read_fixed32_unaligned_10k", |b| {
        b.iter(|| {
            let mut r = BitReader::new(&bytes);
            r.read_bit().unwrap();
            for _ in 0..10_000 {
                black_box(r.read_fixed(32).unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_write_bounded,
    bench_read_bounded,
    bench_read_fixed_unaligned
);
criterion_main!(benches);
