//! Credential message encoding/decoding benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use credential_protocol::{decode, encode, Field, Message};

fn create_test_message(value_size: usize) -> Message {
    Message::new()
        .with(Field::Protocol, "https")
        .with(Field::Host, "github.com")
        .with(Field::Path, "org/repo.git")
        .with(Field::Username, "ci-bot")
        .with(Field::Password, "x".repeat(value_size))
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_encode");

    for size in [16, 256, 4096] {
        let message = create_test_message(size);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &message, |b, message| {
            b.iter(|| black_box(encode(message)));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_decode");

    for size in [16, 256, 4096] {
        let encoded = encode(&create_test_message(size)).into_bytes();

        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &encoded, |b, encoded| {
            b.iter(|| black_box(decode(encoded).unwrap()));
        });
    }

    group.finish();
}

fn bench_decode_noisy(c: &mut Criterion) {
    // blank lines and repeated keys; the last value wins
    let mut input = String::new();
    for i in 0..32 {
        input.push_str(&format!("host=host{}.example.com\n\n", i));
    }
    input.push_str("protocol=https\nusername=ci-bot\n");
    let input = input.into_bytes();

    c.bench_function("message_decode_noisy", |b| {
        b.iter(|| black_box(decode(&input).unwrap()));
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_decode_noisy);
criterion_main!(benches);
