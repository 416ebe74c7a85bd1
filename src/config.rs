use rand_chacha::ChaCha20Rng;

use crate::math::primality::{self, DEFAULT_ROUNDS};

/// Configuration for parameter validation.
///
/// `primality_rounds` is how many Miller-Rabin witnesses `p` and `q` must
/// survive. `seed` pins the witness sequence for reproducible runs; `None`
/// draws from entropy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsaConfig {
    pub primality_rounds: usize,
    pub seed: Option<u64>,
}

impl Default for DsaConfig {
    fn default() -> Self {
        Self {
            primality_rounds: DEFAULT_ROUNDS,
            seed: None,
        }
    }
}

impl DsaConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn rounds(mut self, rounds: usize) -> Self {
        self.primality_rounds = rounds;
        self
    }

    /// Rounds actually run; zero is bumped to one so a check always happens.
    pub fn effective_rounds(&self) -> usize {
        self.primality_rounds.max(1)
    }

    pub(crate) fn witness_rng(&self) -> ChaCha20Rng {
        primality::witness_rng(self.seed)
    }
}
