use std::fs;

use num_bigint_dig::BigUint;
use num_traits::One;
use proptest::prelude::*;

use crate::artifact::{sign_file, signed_path, verify_file};
use crate::config::DsaConfig;
use crate::error::{Error, Parameter, ParameterIssue};
use crate::security::{sign, verify, DomainParameters, KeyMaterial, Nonce, RawParameters};

// 160-bit q, 512-bit p with q | p - 1
const Q: &str = "978591188197454636685963073679446949249366733451";
const P: &str = "7449077331055714226225458194254616499397923796117677417805161557140418881877760558524665644606561108751225123241385344580050676299840701435003120438411647";

fn dec(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 10).unwrap()
}

fn large_params() -> DomainParameters {
    DomainParameters::new(dec(Q), dec(P), &DsaConfig::with_seed(2024)).unwrap()
}

/// Maps arbitrary bytes onto [1, q - 1].
fn scalar(params: &DomainParameters, bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes) % (params.q() - BigUint::one()) + BigUint::one()
}

#[test]
fn test_large_parameter_round_trip() {
    let params = large_params();
    let x = dec("123456789012345678901234567890");
    let key = KeyMaterial::new(&params, BigUint::from(2u32), x).unwrap();
    let nonce = Nonce::new(&params, dec("987654321098765432109876543210")).unwrap();

    let message = b"Pay to the order of Alice: 100 coins\n".repeat(40);
    let outcome = sign(&params, &key, &nonce, &message).unwrap();

    let mut artifact = message.clone();
    artifact.extend_from_slice(format!("\n{}", outcome.signature).as_bytes());
    let check = verify(&params, &key, &artifact).unwrap();
    assert!(check.is_valid());
    assert_eq!(check.digest, outcome.digest);

    // a different private key does not verify
    let other = KeyMaterial::new(&params, BigUint::from(2u32), dec("55555")).unwrap();
    assert!(!verify(&params, &other, &artifact).unwrap().is_valid());
}

#[test]
fn test_raw_parameters_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("contract.md");
    fs::write(&source, "line one\nline two\n\nlast line").unwrap();

    let raw = RawParameters {
        q: Q.to_string(),
        p: P.to_string(),
        h: "3".to_string(),
        x: "42424242".to_string(),
        k: Some("31337".to_string()),
    };
    let config = DsaConfig::with_seed(9);
    let inputs = raw.validate_for_signing(&config).unwrap();
    let signed = sign_file(&source, &inputs.params, &inputs.key, &inputs.nonce).unwrap();
    assert_eq!(signed.path, signed_path(&source));

    let check_inputs = raw.validate_for_verification(&config).unwrap();
    let check = verify_file(&signed.path, &check_inputs.params, &check_inputs.key).unwrap();
    assert!(check.is_valid());

    // edit the body, keep the signature line
    let mut bytes = fs::read(&signed.path).unwrap();
    bytes[0] = b'L';
    fs::write(&signed.path, &bytes).unwrap();
    let check = verify_file(&signed.path, &check_inputs.params, &check_inputs.key).unwrap();
    assert!(!check.is_valid());
}

#[test]
fn test_signing_an_already_signed_file_chains() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("memo.txt");
    fs::write(&source, b"memo").unwrap();

    let params = large_params();
    let key = KeyMaterial::new(&params, BigUint::from(5u32), dec("777")).unwrap();
    let nonce = Nonce::new(&params, dec("888")).unwrap();

    let first = sign_file(&source, &params, &key, &nonce).unwrap();
    let second = sign_file(&first.path, &params, &key, &nonce).unwrap();
    assert_eq!(second.path, dir.path().join("memo(signed)(signed).txt"));

    // only the outer line is checked; it covers the inner signature too
    assert!(verify_file(&second.path, &params, &key).unwrap().is_valid());
    assert!(verify_file(&first.path, &params, &key).unwrap().is_valid());
}

#[test]
fn test_composite_modulus_rejected_before_signing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("doc.txt");
    fs::write(&source, b"doc").unwrap();

    // 341 = 11 * 31 fools a base-2 Fermat test; q = 5 divides 340
    let raw = RawParameters {
        q: "5".to_string(),
        p: "341".to_string(),
        h: "2".to_string(),
        x: "1".to_string(),
        k: Some("2".to_string()),
    };
    let err = raw.validate_for_signing(&DsaConfig::with_seed(1)).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidParameter {
            parameter: Parameter::P,
            issue: ParameterIssue::NotPrime
        }
    ));
    assert!(!signed_path(&source).exists());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_sign_then_verify_matches(
        message in proptest::collection::vec(any::<u8>(), 0..512),
        x_bytes in proptest::collection::vec(any::<u8>(), 1..24),
        k_bytes in proptest::collection::vec(any::<u8>(), 1..24),
    ) {
        let params = large_params();
        let x = scalar(&params, &x_bytes);
        let key = KeyMaterial::new(&params, BigUint::from(2u32), x).unwrap();
        let nonce = Nonce::new(&params, scalar(&params, &k_bytes)).unwrap();

        let outcome = sign(&params, &key, &nonce, &message).unwrap();
        let mut artifact = message.clone();
        artifact.extend_from_slice(format!("\n{}", outcome.signature).as_bytes());

        let check = verify(&params, &key, &artifact).unwrap();
        prop_assert_eq!(&check.r, &check.v);
        prop_assert_eq!(check.digest, outcome.digest);
    }

    #[test]
    fn prop_single_byte_change_detected(
        message in proptest::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let params = large_params();
        let key = KeyMaterial::new(&params, BigUint::from(2u32), dec("31415926535")).unwrap();
        let nonce = Nonce::new(&params, dec("27182818284")).unwrap();

        let outcome = sign(&params, &key, &nonce, &message).unwrap();
        let mut artifact = message.clone();
        artifact.extend_from_slice(format!("\n{}", outcome.signature).as_bytes());

        let i = index.index(message.len());
        artifact[i] ^= flip;
        // the signature line holds no newline, so a flipped byte never moves the split
        let check = verify(&params, &key, &artifact).unwrap();
        prop_assert_ne!(&check.r, &check.v);
    }
}
