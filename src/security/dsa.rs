//! DISCLAIMER: This is a **toy** implementation of the Digital Signature Algorithm (DSA)
//! in pure Rust. It is *EXCLUSIVELY* for demonstration and educational purposes.
//! Absolutely DO NOT use it for real cryptographic or security-sensitive operations.
//! The nonce is caller-supplied and SHA-1 is the digest. If you need DSA or any
//! cryptographic operations in production, please use a vetted, well-reviewed library.

use std::fmt;

use log::{debug, warn};
use num_bigint_dig::BigUint;
use num_traits::{One, Zero};

use super::params::{DomainParameters, KeyMaterial, Nonce};
use super::sha1::Digest;
use crate::artifact;
use crate::error::{Error, Result};
use crate::math::modular::{mod_inverse, pow_mod};

/// A DSA signature: `(r, s)`, both in `[1, q-1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

/// Renders the artifact's signature line, `r,s`.
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.r, self.s)
    }
}

/// What `sign` hands back: the signature and the digest it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutcome {
    pub signature: Signature,
    pub digest: Digest,
}

/// The three numbers verification produces.
///
/// The verifier does not pass judgement; a caller accepts the signature when
/// `r == v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub r: BigUint,
    pub v: BigUint,
    pub digest: Digest,
}

impl Verification {
    /// `r == v`.
    pub fn is_valid(&self) -> bool {
        self.r == self.v
    }
}

/// Derives `g = h^((p-1)/q) mod p`.
///
/// Fails with [`Error::DegenerateGenerator`] if `g <= 1`.
pub fn derive_generator(params: &DomainParameters, key: &KeyMaterial) -> Result<BigUint> {
    let g = pow_mod(key.h(), &params.cofactor(), params.p());
    if g <= BigUint::one() {
        warn!("seed h={} yields degenerate generator g={}", key.h(), g);
        return Err(Error::DegenerateGenerator);
    }
    debug!("derived generator g={g}");
    Ok(g)
}

/// Public key `y = g^x mod p`, recomputed on demand and never stored.
pub fn public_key(params: &DomainParameters, key: &KeyMaterial) -> Result<BigUint> {
    let g = derive_generator(params, key)?;
    Ok(pow_mod(&g, key.x(), params.p()))
}

/// Signs `message` (the entire unsigned content).
///
/// `r = (g^k mod p) mod q` and `s = (H(m) + x*r) * k^-1 mod q`. A zero `r` or
/// `s` is reported as [`Error::DegenerateSignature`]; no fresh nonce is tried.
pub fn sign(
    params: &DomainParameters,
    key: &KeyMaterial,
    nonce: &Nonce,
    message: &[u8],
) -> Result<SignOutcome> {
    let p = params.p();
    let q = params.q();

    let g = derive_generator(params, key)?;
    let digest = Digest::of(message);
    let h_m = digest.to_biguint();

    let r = pow_mod(&g, nonce.value(), p) % q;

    let k_inv = mod_inverse(nonce.value(), q);
    let s = ((&h_m + key.x() * &r) * &k_inv) % q;

    if r.is_zero() || s.is_zero() {
        warn!("degenerate signature (r zero: {}, s zero: {})", r.is_zero(), s.is_zero());
        return Err(Error::DegenerateSignature {
            r_zero: r.is_zero(),
            s_zero: s.is_zero(),
        });
    }

    debug!("signed {} bytes: digest={}, r={}, s={}", message.len(), digest, r, s);
    Ok(SignOutcome {
        signature: Signature { r, s },
        digest,
    })
}

/// Computes `(r, v, digest)` for `signature` over `message`.
///
/// A signature outside `[1, q-1]` is not one this scheme could have produced
/// and is reported as [`Error::UnsignedArtifact`].
pub fn verify_signature(
    params: &DomainParameters,
    key: &KeyMaterial,
    message: &[u8],
    signature: &Signature,
) -> Result<Verification> {
    if !params.in_scalar_range(&signature.r) || !params.in_scalar_range(&signature.s) {
        return Err(Error::UnsignedArtifact);
    }

    let p = params.p();
    let q = params.q();

    let g = derive_generator(params, key)?;
    let y = pow_mod(&g, key.x(), p);
    let digest = Digest::of(message);

    // w = s^-1 mod q
    let w = mod_inverse(&signature.s, q);
    let u1 = (digest.to_biguint() * &w) % q;
    let u2 = (&signature.r * &w) % q;

    // v = ((g^u1 * y^u2) mod p) mod q
    let v = ((pow_mod(&g, &u1, p) * pow_mod(&y, &u2, p)) % p) % q;

    debug!("verified {} bytes: digest={}, r={}, v={}", message.len(), digest, signature.r, v);
    Ok(Verification {
        r: signature.r.clone(),
        v,
        digest,
    })
}

/// Verifies a signed artifact held in memory.
///
/// The trailing line must read `r,s`; anything else, including an empty
/// artifact, is [`Error::UnsignedArtifact`]. The digest covers every byte
/// before the final newline.
pub fn verify(params: &DomainParameters, key: &KeyMaterial, artifact: &[u8]) -> Result<Verification> {
    let (message, line) = artifact::split_signed(artifact);
    let signature = artifact::parse_signature_line(line.ok_or(Error::UnsignedArtifact)?)?;
    verify_signature(params, key, message, &signature)
}
