use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fmf_processor::writer::write_to_string;
use fmf_processor::{FmfReader, WriterConfig};
use std::hint::black_box;

/// Generate a single-table file with the given number of rows
fn generate_content(rows: usize) -> String {
    let mut content = String::from(
        "; -*- fmf-version: 1.1; delimiter: \\t -*-\n\
         [*reference]\n\
         title: Benchmark sweep\n\
         creator: bench\n\
         [*data definitions]\n\
         time: t [s]\n\
         voltage: U [mV]\n\
         current: I [mA]\n\
         [*data]\n",
    );
    for i in 0..rows {
        let t = i as f64 * 1e-3;
        content.push_str(&format!("{}\t{}\t{}\n", t, (t * 50.0).sin(), (t * 50.0).cos()));
    }
    content
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    let reader = FmfReader::default();

    for rows in [1_000, 10_000, 100_000] {
        let content = generate_content(rows);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &content, |b, content| {
            b.iter(|| reader.read_str(black_box(content), None).unwrap());
        });
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    let reader = FmfReader::default();
    let config = WriterConfig::default();

    for rows in [1_000, 10_000, 100_000] {
        let document = reader.read_str(&generate_content(rows), None).unwrap();
        let metadata = document.metadata();
        let tables = document.into_tables().unwrap();

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &tables, |b, tables| {
            b.iter(|| write_to_string(black_box(&metadata), tables, &config).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_read, bench_write);
criterion_main!(benches);
