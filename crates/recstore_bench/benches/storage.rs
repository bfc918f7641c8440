//! Storage backend benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use recstore_bench::generate_records;
use recstore_storage::{InMemoryBackend, JsonFileBackend, StorageBackend};
use tempfile::TempDir;

/// Benchmark InMemoryBackend write operations.
fn bench_inmemory_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("inmemory_write");

    for count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let mut backend = InMemoryBackend::new();
            let records = generate_records(count, 64);

            b.iter(|| {
                backend.write(black_box(&records)).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark JsonFileBackend write operations.
fn bench_file_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_write");
    group.sample_size(20);

    for count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let temp_dir = TempDir::new().unwrap();
            let mut backend = JsonFileBackend::new(temp_dir.path().join("bench.json"));
            let records = generate_records(count, 64);

            b.iter(|| {
                backend.write(black_box(&records)).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark JsonFileBackend read operations.
fn bench_file_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_read");
    group.sample_size(20);

    for count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let temp_dir = TempDir::new().unwrap();
            let mut backend = JsonFileBackend::new(temp_dir.path().join("bench.json"));
            backend.write(&generate_records(count, 64)).unwrap();

            b.iter(|| {
                let records = backend.read().unwrap();
                black_box(records);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_inmemory_write, bench_file_write, bench_file_read);

criterion_main!(benches);
