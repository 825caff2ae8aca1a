// Signing, verification and assembly benchmarks.
//
// Covers key derivation from a seed, signing and both verification modes,
// and assembling transactions of increasing input counts.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tangle_protocol::binary::UtxoInput;
use tangle_protocol::crypto::{key_pair_from_seed, sign, verify, verify_zip215, KeyPair};
use tangle_protocol::transaction::{build_transaction_payload, InputWithKey, OutputSpec};

const MESSAGE: &[u8] = b"essence hash stand-in: 32 bytes.";

fn bench_key_derivation(c: &mut Criterion) {
    c.bench_function("ed25519/key_pair_from_seed", |b| {
        b.iter(|| key_pair_from_seed(&[0xaa; 32]).unwrap());
    });
}

fn bench_sign(c: &mut Criterion) {
    let pair = KeyPair::from_seed(&[0xaa; 32]);
    c.bench_function("ed25519/sign", |b| {
        b.iter(|| sign(&pair.private_key, MESSAGE).unwrap());
    });
}

fn bench_verify(c: &mut Criterion) {
    let pair = KeyPair::from_seed(&[0xaa; 32]);
    let signature = pair.sign(MESSAGE);

    c.bench_function("ed25519/verify", |b| {
        b.iter(|| verify(&pair.public_key, MESSAGE, &signature));
    });
    c.bench_function("ed25519/verify_zip215", |b| {
        b.iter(|| verify_zip215(&pair.public_key, MESSAGE, &signature));
    });
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction/assemble");
    let recipient = OutputSpec::new(KeyPair::from_seed(&[1; 32]).address(), 1_000);

    for size in [1usize, 8, 32, 127] {
        // Half the inputs share a key so reference blocks are exercised too.
        let inputs: Vec<InputWithKey> = (0..size)
            .map(|i| InputWithKey {
                input: UtxoInput::new([i as u8; 32], i as u16),
                key_pair: KeyPair::from_seed(&[(i % (size / 2 + 1)) as u8; 32]),
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &inputs, |b, inputs| {
            b.iter(|| build_transaction_payload(inputs, &[recipient], None).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_sign,
    bench_verify,
    bench_assemble,
);
criterion_main!(benches);
