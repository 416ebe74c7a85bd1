pub mod modular;
pub mod primality;

pub use modular::{in_range, mod_inverse, pow_mod};
pub use primality::{is_probable_prime, is_probable_prime_with_rng, DEFAULT_ROUNDS};
