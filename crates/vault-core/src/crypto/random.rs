//! Random source abstraction
//!
//! Anything that is both an `RngCore` and a `CryptoRng` can feed the keystore
//! and the password generator. Production code uses `OsRng`; tests hand in a
//! seeded `StdRng`.

use rand::{CryptoRng, Rng, RngCore};

/// Cryptographically strong source of random bytes and bounded integers
pub trait RandomSource: RngCore + CryptoRng {
    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "empty range");
        self.gen_range(0..bound)
    }

    /// Fair coin flip
    fn coin(&mut self) -> bool {
        self.gen_bool(0.5)
    }
}

impl<R: RngCore + CryptoRng + ?Sized> RandomSource for R {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for bound in 1..64 {
            for _ in 0..32 {
                assert!(rng.below(bound) < bound);
            }
        }
    }

    #[test]
    fn test_below_one_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(rng.below(1), 0);
    }
}
