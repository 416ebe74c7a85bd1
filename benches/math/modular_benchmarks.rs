use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dsasign::math::{is_probable_prime, pow_mod};
use num_bigint_dig::BigUint;

const P: &[u8] = b"7449077331055714226225458194254616499397923796117677417805161557140418881877760558524665644606561108751225123241385344580050676299840701435003120438411647";

fn bench_pow_mod(c: &mut Criterion) {
    let p = BigUint::parse_bytes(P, 10).unwrap();
    let base = BigUint::from(2u32);
    let exp = &p - BigUint::from(2u32);

    c.bench_function("pow_mod 512-bit", |b| {
        b.iter(|| pow_mod(black_box(&base), black_box(&exp), black_box(&p)))
    });
    c.bench_function("library modpow 512-bit", |b| {
        b.iter(|| black_box(&base).modpow(black_box(&exp), black_box(&p)))
    });
}

fn bench_miller_rabin(c: &mut Criterion) {
    let p = BigUint::parse_bytes(P, 10).unwrap();
    c.bench_function("miller-rabin 512-bit, 10 rounds", |b| {
        b.iter(|| is_probable_prime(black_box(&p), 10, Some(1)))
    });
}

criterion_group!(benches, bench_pow_mod, bench_miller_rabin);
criterion_main!(benches);
