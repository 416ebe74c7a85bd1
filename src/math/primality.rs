//! Miller-Rabin probabilistic primality test.
//!
//! DISCLAIMER: witnesses are drawn from a seeded or entropy-seeded ChaCha20
//! stream. That is statistically sound for rejecting composites but is not a
//! hardened source for anything secret.

use log::trace;
use num_bigint_dig::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::modular::pow_mod;

/// Default number of Miller-Rabin rounds; a composite survives with
/// probability at most `4^-10`.
pub const DEFAULT_ROUNDS: usize = 10;

/// Tests `n` for primality with `rounds` random witnesses.
///
/// `seed` makes the witness sequence reproducible; `None` seeds from entropy.
/// A `true` answer is probabilistic, a `false` answer is certain.
pub fn is_probable_prime(n: &BigUint, rounds: usize, seed: Option<u64>) -> bool {
    is_probable_prime_with_rng(n, rounds, &mut witness_rng(seed))
}

/// Witness stream: seeded from `seed` when given, from entropy otherwise.
pub fn witness_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(s) => ChaCha20Rng::seed_from_u64(s),
        None => ChaCha20Rng::from_entropy(),
    }
}

/// Same as [`is_probable_prime`] but draws witnesses from the caller's RNG.
pub fn is_probable_prime_with_rng<R: Rng>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n.is_zero() || n.is_one() {
        return false;
    }
    if *n == two || *n == three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let n_minus_one = n - BigUint::one();

    // n - 1 = d * 2^s with d odd
    let mut d = n_minus_one.clone();
    let mut s = 0usize;
    while d.is_even() {
        d >>= 1usize;
        s += 1;
    }

    'witness: for round in 0..rounds {
        let a = random_in_range(rng, &two, &n_minus_one);
        let mut x = pow_mod(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
            // Reached 1 without passing through n-1: a non-trivial square root of 1.
            if x.is_one() {
                break;
            }
        }

        trace!("miller-rabin: witness found in round {round}, {} bits", n.bits());
        return false;
    }

    true
}

/// Draws a uniformly random integer in `[low, high]` by sampling values with
/// the bit length of `high` and rejecting those outside the range.
///
/// `low` must not exceed `high`.
pub fn random_in_range<R: Rng>(rng: &mut R, low: &BigUint, high: &BigUint) -> BigUint {
    let bits = high.bits();
    loop {
        let candidate = rng.gen_biguint(bits);
        if &candidate >= low && &candidate <= high {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    fn dec(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 10).unwrap()
    }

    #[test]
    fn test_small_special_cases() {
        assert!(!is_probable_prime(&big(0), 10, Some(1)));
        assert!(!is_probable_prime(&big(1), 10, Some(1)));
        assert!(is_probable_prime(&big(2), 10, Some(1)));
        assert!(is_probable_prime(&big(3), 10, Some(1)));
        assert!(!is_probable_prime(&big(4), 10, Some(1)));
    }

    #[test]
    fn test_known_primes() {
        for p in [5u64, 7, 11, 13, 47, 283, 7919, 104_729, 2_147_483_647] {
            assert!(is_probable_prime(&big(p), 10, Some(7)), "{} is prime", p);
        }
    }

    #[test]
    fn test_large_primes() {
        // 256-bit safe prime
        let safe = dec("106352420957877734848486799357970589242594709812995146361654262241575271429559");
        assert!(is_probable_prime(&safe, 10, Some(3)));
        assert!(is_probable_prime(&((safe - BigUint::one()) >> 1usize), 10, Some(3)));

        let q = dec("978591188197454636685963073679446949249366733451");
        assert!(is_probable_prime(&q, 10, None));
    }

    #[test]
    fn test_known_composites() {
        for c in [9u64, 15, 91, 341, 561, 1105, 7917, 104_730] {
            assert!(!is_probable_prime(&big(c), 10, Some(11)), "{} is composite", c);
        }
        // product of two 128-bit primes
        let semiprime =
            dec("38379259215074643844889418694668647478884195703595579762868742996265075775603");
        assert!(!is_probable_prime(&semiprime, 10, Some(11)));
    }

    #[test]
    fn test_strong_liars_rejected() {
        // 2047 is a strong pseudoprime to base 2; 3215031751 to bases 2, 3, 5 and 7.
        for seed in 0..20u64 {
            assert!(!is_probable_prime(&big(2047), 10, Some(seed)));
            assert!(!is_probable_prime(&big(3_215_031_751), 10, Some(seed)));
        }
    }

    #[test]
    fn test_witnesses_cover_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let low = big(2);
        let high = big(12);
        let mut seen = [false; 13];
        for _ in 0..2000 {
            let a = random_in_range(&mut rng, &low, &high);
            assert!(a >= low && a <= high);
            let idx: usize = a.to_string().parse().unwrap();
            seen[idx] = true;
        }
        assert!(seen[2..=12].iter().all(|&hit| hit), "every value in [2, 12] drawn");
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let n = big(7919);
        let mut a = witness_rng(Some(99));
        let mut b = ChaCha20Rng::seed_from_u64(99);
        let high = &n - BigUint::one();
        for _ in 0..16 {
            assert_eq!(
                random_in_range(&mut a, &big(2), &high),
                random_in_range(&mut b, &big(2), &high)
            );
        }
    }
}
