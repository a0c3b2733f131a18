//! Benchmarks for payload encryption throughput.
//!
//! Measures raw keystream application at typical telemetry sizes and the
//! full text path (session advance + XOR + header + hex encode).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use telemetry_cipher::{CipherConfig, PayloadCipher};

/// A realistic encrypted GPS record is on the order of 150 bytes of JSON.
const RECORD_LEN: usize = 150;

fn bench_cipher() -> PayloadCipher<SmallRng> {
    PayloadCipher::with_config_and_entropy(&CipherConfig::default(), SmallRng::seed_from_u64(0))
        .unwrap()
}

/// Benchmarks in-place encryption across payload sizes.
fn bench_encrypt_in_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_in_place");

    for size in [64usize, RECORD_LEN, 1024, 16 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut cipher = bench_cipher();
            let mut buf = vec![0xA5u8; size];
            b.iter(|| {
                cipher.encrypt_in_place(black_box(&mut buf));
            });
        });
    }

    group.finish();
}

/// Benchmarks the full text path, including hex encoding of the envelope.
fn bench_encrypt_text(c: &mut Criterion) {
    let payload = "x".repeat(RECORD_LEN);
    let mut cipher = bench_cipher();
    cipher.encrypt_text(&payload, true);

    let mut group = c.benchmark_group("encrypt_text");
    group.throughput(Throughput::Bytes(RECORD_LEN as u64));
    group.bench_function("record", |b| {
        b.iter(|| cipher.encrypt_text(black_box(&payload), false));
    });
    group.finish();
}

/// Benchmarks decryption straight from the hex wire form.
fn bench_decrypt_text(c: &mut Criterion) {
    let mut sender = bench_cipher();
    let sealed = sender.encrypt_text(&"x".repeat(RECORD_LEN), true);
    let receiver = bench_cipher();

    let mut group = c.benchmark_group("decrypt_text");
    group.throughput(Throughput::Bytes(RECORD_LEN as u64));
    group.bench_function("record", |b| {
        b.iter(|| receiver.decrypt_text(black_box(&sealed)).unwrap());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_encrypt_in_place,
    bench_encrypt_text,
    bench_decrypt_text
);
criterion_main!(benches);
