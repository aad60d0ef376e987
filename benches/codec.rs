extern crate criterion;
extern crate zwoelf;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn lcg_bytes(mut seed: u32, len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        data.push((seed >> 16) as u8);
    }
    data
}

fn inputs() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("repetitive", vec![b'x'; 1 << 20]),
        ("pseudorandom", lcg_bytes(42, 1 << 20)),
        ("text-like", lcg_bytes(7, 1 << 20).iter().map(|b| b'a' + b % 16).collect()),
    ]
}

pub fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress-msb-12");
    for (name, data) in inputs() {
        group.throughput(Throughput::Bytes(data.len() as u64));
        let id = BenchmarkId::new(name, data.len());
        group.bench_with_input(id, &data, |b, data| {
            b.iter(|| black_box(zwoelf::compress(data).expect("compression never fails")))
        });
    }
}

pub fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress-msb-12");
    for (name, data) in inputs() {
        let compressed = zwoelf::compress(&data).expect("compression never fails");
        group.throughput(Throughput::Bytes(data.len() as u64));
        let id = BenchmarkId::new(name, data.len());
        group.bench_with_input(id, &compressed, |b, compressed| {
            b.iter(|| black_box(zwoelf::decompress(compressed).expect("valid stream")))
        });
    }
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
