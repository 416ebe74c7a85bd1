//! Validated DSA inputs.
//!
//! Every constructor here re-checks its invariants, so any caller (the
//! command line, a test, a batch job) gets the same guarantees before a
//! single exponentiation runs.

use log::debug;
use num_bigint_dig::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::config::DsaConfig;
use crate::error::{Error, Parameter, ParameterIssue, Result};
use crate::math::modular::in_range;
use crate::math::primality::is_probable_prime_with_rng;

/// Domain parameters: primes `q` and `p` with `q | (p - 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParameters {
    q: BigUint,
    p: BigUint,
}

impl DomainParameters {
    /// Checks positivity, primality of `p` then `q`, and the subgroup relation.
    pub fn new(q: BigUint, p: BigUint, config: &DsaConfig) -> Result<Self> {
        require_positive(Parameter::Q, &q)?;
        require_positive(Parameter::P, &p)?;

        let rounds = config.effective_rounds();
        let mut rng = config.witness_rng();
        if !is_probable_prime_with_rng(&p, rounds, &mut rng) {
            return Err(Error::invalid(Parameter::P, ParameterIssue::NotPrime));
        }
        if !is_probable_prime_with_rng(&q, rounds, &mut rng) {
            return Err(Error::invalid(Parameter::Q, ParameterIssue::NotPrime));
        }
        if !((&p - BigUint::one()) % &q).is_zero() {
            return Err(Error::invalid(Parameter::P, ParameterIssue::SubgroupMismatch));
        }

        debug!(
            "domain parameters accepted: p {} bits, q {} bits, {} rounds",
            p.bits(),
            q.bits(),
            rounds
        );
        Ok(Self { q, p })
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// `(p - 1) / q`, the exponent that maps a seed into the order-`q` subgroup.
    pub fn cofactor(&self) -> BigUint {
        (&self.p - BigUint::one()) / &self.q
    }

    /// True when `value` lies in `[1, q - 1]`.
    pub fn in_scalar_range(&self, value: &BigUint) -> bool {
        in_range(value, &BigUint::one(), &(&self.q - BigUint::one()))
    }
}

/// Generator seed `h` in `[2, p - 2]` and private key `x` in `[1, q - 1]`.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    h: BigUint,
    x: BigUint,
}

impl KeyMaterial {
    pub fn new(params: &DomainParameters, h: BigUint, x: BigUint) -> Result<Self> {
        require_positive(Parameter::H, &h)?;
        require_positive(Parameter::X, &x)?;

        let two = BigUint::from(2u32);
        // p >= 2 here, but p = 2 or 3 leaves no room for h at all
        let h_max = if params.p() > &two {
            params.p() - &two
        } else {
            BigUint::zero()
        };
        if !in_range(&h, &two, &h_max) {
            return Err(Error::invalid(
                Parameter::H,
                ParameterIssue::OutOfRange { min: two, max: h_max },
            ));
        }
        if !params.in_scalar_range(&x) {
            return Err(scalar_out_of_range(Parameter::X, params));
        }

        Ok(Self { h, x })
    }

    pub fn h(&self) -> &BigUint {
        &self.h
    }

    pub fn x(&self) -> &BigUint {
        &self.x
    }
}

// x is secret; keep it out of Debug output and logs.
impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("h", &self.h)
            .field("x", &"<redacted>")
            .finish()
    }
}

/// Per-signature nonce `k` in `[1, q - 1]`, supplied by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce(BigUint);

impl Nonce {
    pub fn new(params: &DomainParameters, k: BigUint) -> Result<Self> {
        require_positive(Parameter::K, &k)?;
        if !params.in_scalar_range(&k) {
            return Err(scalar_out_of_range(Parameter::K, params));
        }
        Ok(Nonce(k))
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl std::fmt::Debug for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Nonce(<redacted>)")
    }
}

/// The five decimal strings a form or command line collects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    pub q: String,
    pub p: String,
    pub h: String,
    pub x: String,
    /// Only needed for signing.
    pub k: Option<String>,
}

/// Everything `sign` needs, already validated.
#[derive(Debug, Clone)]
pub struct SigningInputs {
    pub params: DomainParameters,
    pub key: KeyMaterial,
    pub nonce: Nonce,
}

/// Everything `verify` needs, already validated.
#[derive(Debug, Clone)]
pub struct VerificationInputs {
    pub params: DomainParameters,
    pub key: KeyMaterial,
}

impl RawParameters {
    /// Parses and validates all five values.
    ///
    /// Checks run in a fixed order and the first failure wins: parsing
    /// (Q, P, H, X, K), positivity of all five, primality, the subgroup
    /// relation, then the ranges of H, X and K.
    pub fn validate_for_signing(&self, config: &DsaConfig) -> Result<SigningInputs> {
        let k_text = self
            .k
            .as_deref()
            .ok_or_else(|| Error::invalid(Parameter::K, ParameterIssue::Missing));

        let q = parse_parameter(Parameter::Q, &self.q)?;
        let p = parse_parameter(Parameter::P, &self.p)?;
        let h = parse_parameter(Parameter::H, &self.h)?;
        let x = parse_parameter(Parameter::X, &self.x)?;
        let k = parse_parameter(Parameter::K, k_text?)?;

        let q = into_positive(Parameter::Q, q)?;
        let p = into_positive(Parameter::P, p)?;
        let h = into_positive(Parameter::H, h)?;
        let x = into_positive(Parameter::X, x)?;
        let k = into_positive(Parameter::K, k)?;

        let params = DomainParameters::new(q, p, config)?;
        let key = KeyMaterial::new(&params, h, x)?;
        let nonce = Nonce::new(&params, k)?;
        Ok(SigningInputs { params, key, nonce })
    }

    /// Like [`validate_for_signing`](Self::validate_for_signing) without `k`.
    pub fn validate_for_verification(&self, config: &DsaConfig) -> Result<VerificationInputs> {
        let q = parse_parameter(Parameter::Q, &self.q)?;
        let p = parse_parameter(Parameter::P, &self.p)?;
        let h = parse_parameter(Parameter::H, &self.h)?;
        let x = parse_parameter(Parameter::X, &self.x)?;

        let q = into_positive(Parameter::Q, q)?;
        let p = into_positive(Parameter::P, p)?;
        let h = into_positive(Parameter::H, h)?;
        let x = into_positive(Parameter::X, x)?;

        let params = DomainParameters::new(q, p, config)?;
        let key = KeyMaterial::new(&params, h, x)?;
        Ok(VerificationInputs { params, key })
    }
}

/// Parses a signed decimal integer: an optional `-`, then ASCII digits
/// only. Whitespace, `_` separators and anything else are
/// [`ParameterIssue::Malformed`]; an empty string is [`ParameterIssue::Missing`].
pub fn parse_parameter(parameter: Parameter, text: &str) -> Result<BigInt> {
    if text.is_empty() {
        return Err(Error::invalid(parameter, ParameterIssue::Missing));
    }
    let malformed = || Error::invalid(parameter, ParameterIssue::Malformed(text.to_string()));

    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    BigInt::parse_bytes(text.as_bytes(), 10).ok_or_else(malformed)
}

fn into_positive(parameter: Parameter, value: BigInt) -> Result<BigUint> {
    if value.sign() != Sign::Plus {
        return Err(Error::invalid(parameter, ParameterIssue::NotPositive));
    }
    value
        .to_biguint()
        .ok_or_else(|| Error::invalid(parameter, ParameterIssue::NotPositive))
}

fn require_positive(parameter: Parameter, value: &BigUint) -> Result<()> {
    if value.is_zero() {
        Err(Error::invalid(parameter, ParameterIssue::NotPositive))
    } else {
        Ok(())
    }
}

fn scalar_out_of_range(parameter: Parameter, params: &DomainParameters) -> Error {
    Error::invalid(
        parameter,
        ParameterIssue::OutOfRange {
            min: BigUint::one(),
            max: params.q() - BigUint::one(),
        },
    )
}
