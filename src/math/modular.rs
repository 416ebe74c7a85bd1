//! Modular arithmetic over arbitrary-precision unsigned integers.
//!
//! Everything in the signer and the primality test is built on these helpers.
//! They are written out by hand rather than delegating to `BigUint::modpow`.

use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Computes `base^exponent mod modulus` by binary exponentiation.
///
/// The base is reduced into `[0, modulus)` first. While the remaining exponent
/// is even the base is squared and the exponent halved; when it is odd one
/// factor of the base is multiplied into the accumulator.
///
/// # Panics
/// Panics if `modulus` is zero. Validated domain parameters never produce one.
pub fn pow_mod(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_zero() {
        panic!("pow_mod with modulus=0");
    }

    let mut base = base % modulus;
    let mut exponent = exponent.clone();
    // 1 mod 1 == 0, so pow_mod(a, 0, 1) comes out as 0.
    let mut result = BigUint::one() % modulus;

    while !exponent.is_zero() {
        while exponent.is_even() {
            exponent >>= 1usize;
            base = (&base * &base) % modulus;
        }
        exponent -= BigUint::one();
        result = (&result * &base) % modulus;
    }

    result
}

/// Modular inverse by Fermat's little theorem: `a^(p-2) mod p`.
///
/// `prime_modulus` must be prime and `a` must not be a multiple of it. This is
/// not a general inverse routine; every modulus this crate inverts under is a
/// validated prime (`q` for nonces and signatures).
///
/// # Panics
/// Panics if `prime_modulus` is below 2.
pub fn mod_inverse(a: &BigUint, prime_modulus: &BigUint) -> BigUint {
    let two = BigUint::from(2u32);
    if prime_modulus < &two {
        panic!("mod_inverse needs a prime modulus, got {prime_modulus}");
    }
    pow_mod(a, &(prime_modulus - &two), prime_modulus)
}

/// True when `min <= value <= max`.
pub fn in_range(value: &BigUint, min: &BigUint, max: &BigUint) -> bool {
    value >= min && value <= max
}
