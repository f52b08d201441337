//! Benchmarks for chunking and in-memory chunk store round trips

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kv_chunk_sync::chunking::chunks;
use kv_chunk_sync::domain::{MaxChunkBytes, StorageKey};
use kv_chunk_sync::sync::{ChunkStore, MemoryBackend};
use std::hint::black_box;

fn document(bytes: usize) -> String {
    // Mixed widths so boundaries land mid-character regularly
    "{\"note\":\"naïve café ☕ 日本語 🦀\"},"
        .chars()
        .cycle()
        .scan(0, |len, c| {
            *len += c.len_utf8();
            (*len <= bytes).then_some(c)
        })
        .collect()
}

fn benchmark_chunking(c: &mut Criterion) {
    let max = MaxChunkBytes::default();
    let mut group = c.benchmark_group("chunking");

    for size in [64 * 1024, 1024 * 1024, 8 * 1024 * 1024] {
        let text = document(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| chunks(black_box(text), max).count())
        });
    }

    group.finish();
}

fn benchmark_memory_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime should start");
    let store = ChunkStore::new(
        MemoryBackend::new(),
        StorageKey::default(),
        MaxChunkBytes::try_new(16 * 1024).expect("valid chunk size"),
    );
    let text = document(1024 * 1024);
    let (store, text) = (&store, text.as_str());

    c.bench_function("memory_store_set_get_1mb", |b| {
        b.to_async(&runtime).iter(|| async move {
            store.set(black_box(text)).await.expect("set succeeds");
            black_box(store.get().await.expect("get succeeds"))
        })
    });
}

criterion_group!(benches, benchmark_chunking, benchmark_memory_round_trip);
criterion_main!(benches);
