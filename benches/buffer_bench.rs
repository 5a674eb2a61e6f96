//! Benchmarks for membuff buffer operations

use std::io::{Read, Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use membuff::{archive_reader, archive_writer, Buff, Compression};

const REGION_SIZE: usize = 1024 * 1024;

fn buffer_benchmarks(c: &mut Criterion) {
    let payload: Vec<u8> = (0..REGION_SIZE).map(|i| (i % 251) as u8).collect();

    c.bench_function("write_at_4k_fixed", |b| {
        let mut buff = Buff::with_size(REGION_SIZE);
        let chunk = [0xABu8; 4096];
        b.iter(|| {
            for off in (0..REGION_SIZE).step_by(4096) {
                buff.write_at(black_box(&chunk), off as u64).unwrap();
            }
        })
    });

    c.bench_function("sequential_write_growing", |b| {
        let chunk = [0x5Au8; 4096];
        b.iter(|| {
            let mut buff = Buff::new();
            for _ in 0..(REGION_SIZE / 4096) {
                buff.write_all(black_box(&chunk)).unwrap();
            }
            buff
        })
    });

    c.bench_function("sequential_read_4k", |b| {
        let mut buff = Buff::from_bytes(&payload);
        let mut chunk = [0u8; 4096];
        b.iter(|| {
            buff.rewind();
            while buff.read(&mut chunk).unwrap() > 0 {}
        })
    });

    c.bench_function("range_view_read_4k", |b| {
        let shared = Buff::from_bytes(&payload).share();
        let mut chunk = [0u8; 4096];
        b.iter(|| {
            let mut view = shared.range(4096, 64 * 1024).unwrap();
            while view.read(&mut chunk).unwrap() > 0 {}
        })
    });

    for kind in [Compression::Gzip, Compression::Zlib] {
        c.bench_function(&format!("{}_round_trip_1m", kind), |b| {
            b.iter(|| {
                let mut writer = archive_writer(kind, Vec::new());
                writer.write_all(black_box(&payload)).unwrap();
                let packed = writer.finish().unwrap();

                let mut out = Vec::with_capacity(REGION_SIZE);
                archive_reader(kind, packed.as_slice())
                    .read_to_end(&mut out)
                    .unwrap();
                out
            })
        });
    }
}

criterion_group!(benches, buffer_benchmarks);
criterion_main!(benches);
