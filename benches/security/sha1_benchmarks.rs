use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dsasign::security::sha1_digest;

fn bench_sha1(c: &mut Criterion) {
    let mut group = c.benchmark_group("sha1");
    for size in [64usize, 4 * 1024, 1024 * 1024] {
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| sha1_digest(black_box(data)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sha1);
criterion_main!(benches);
