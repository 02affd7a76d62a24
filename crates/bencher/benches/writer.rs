use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use plaintext_http::buffer::{BufferWriter, OutputBuffer};

const VALUES: [u32; 6] = [7, 42, 999, 65_535, 1_000_000, u32::MAX];

fn benchmark_write_numeric(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("write_numeric");

    for value in VALUES {
        group.bench_with_input(BenchmarkId::new("fast", value), &value, |b, &value| {
            let mut sink = OutputBuffer::new();
            b.iter(|| {
                sink.clear();
                let mut writer = BufferWriter::new(&mut sink, 16);
                writer.write_numeric(black_box(value));
            });
        });

        group.bench_with_input(BenchmarkId::new("to_string", value), &value, |b, &value| {
            let mut sink = OutputBuffer::new();
            b.iter(|| {
                sink.clear();
                let mut writer = BufferWriter::new(&mut sink, 16);
                writer.write(black_box(value).to_string().as_bytes());
            });
        });
    }

    group.finish();
}

fn benchmark_segmented_write(criterion: &mut Criterion) {
    let payload = vec![b'x'; 64 * 1024];
    let mut group = criterion.benchmark_group("segmented_write");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for segment_size in [256, 4096, 65_536] {
        group.bench_with_input(BenchmarkId::from_parameter(segment_size), &segment_size, |b, &segment_size| {
            let mut sink = OutputBuffer::with_segment_size(segment_size);
            b.iter(|| {
                sink.clear();
                let mut writer = BufferWriter::new(&mut sink, 0);
                writer.write(black_box(&payload));
                drop(writer);
                black_box(sink.committed().len());
            });
        });
    }

    group.finish();
}

criterion_group!(writer, benchmark_write_numeric, benchmark_segmented_write);
criterion_main!(writer);
