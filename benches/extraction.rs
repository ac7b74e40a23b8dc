use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use softmax_pda::cursor::ByteCursor;
use softmax_pda::pda::{self, ExperimentRecord, PdaWriter};
use softmax_pda::tokens::{read_until_byte_delimiter, NUL};

/// Build an export with `sections` experiments separated by `gap` opaque bytes
fn create_export(sections: usize, gap: usize) -> Vec<u8> {
    let mut writer = PdaWriter::new();
    for i in 0..sections {
        let mut record = ExperimentRecord::flexstation_demo();
        record.experiment_name = format!("Exp{:02}", i + 1);
        record.preamble_len = gap;
        writer.write_section(&record);
    }
    writer.finish()
}

/// Benchmark merged extraction over growing section counts
fn bench_extract_sections(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_sections");

    for sections in [1, 4, 16] {
        let bytes = create_export(sections, 160_000);
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}sections", sections)),
            &bytes,
            |b, bytes| {
                b.iter(|| {
                    let params = pda::extract(black_box(bytes));
                    black_box(params);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a long delimiter scan through opaque data
fn bench_delimiter_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("delimiter_scan");

    let mut bytes = vec![b'x'; 1 << 20];
    bytes.push(NUL);
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("1MiB_cstring", |b| {
        b.iter(|| {
            let mut cursor = ByteCursor::new(black_box(&bytes));
            black_box(read_until_byte_delimiter(&mut cursor, NUL));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_extract_sections, bench_delimiter_scan);
criterion_main!(benches);
