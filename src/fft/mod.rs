//! Mixed-radix (radix-2 plus radix-`q`) Cooley-Tukey FFTs.
//!
//! Two interchangeable strategies compute the same in-place transform:
//! - [`serial_fft`]: digit-reversal permutation, then radix-`q` merge passes, then
//!   radix-2 butterfly passes.
//! - [`parallel_fft`]: splits the domain into `2^k` cosets that are transformed
//!   independently on the rayon pool, then interleaves the results.
//!
//! [`FftStrategy`] picks one of them at dispatch time.

use p3_field::Field;
use tracing::debug;

use crate::field::PrimeFieldFactors;

pub mod parallel;
pub mod permute;
pub mod serial;

pub use parallel::parallel_fft;
pub use permute::mixed_radix_fft_permute;
pub use serial::serial_fft;

/// Number of threads in the current rayon pool, or 1 without the `parallel` feature.
#[must_use]
pub fn current_num_workers() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Execution strategy for an in-place FFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FftStrategy {
    /// Single-threaded [`serial_fft`].
    Serial,
    /// [`parallel_fft`] over `2^log_num_workers` cosets.
    Parallel {
        /// `log2` of the number of cosets (and workers).
        log_num_workers: u32,
    },
}

impl FftStrategy {
    /// Chooses a strategy for a domain with the given factors and `num_workers`
    /// available threads.
    ///
    /// The worker count is floored to a power of two. Parallel execution is only picked
    /// when there is more than one worker and `log2(workers)` does not exceed the
    /// domain's two-adicity.
    #[must_use]
    pub const fn for_workers(factors: PrimeFieldFactors, num_workers: usize) -> Self {
        if num_workers < 2 {
            return Self::Serial;
        }
        let log_num_workers = num_workers.ilog2();
        if log_num_workers <= factors.two_adicity {
            Self::Parallel { log_num_workers }
        } else {
            Self::Serial
        }
    }

    /// Chooses a strategy based on the size of the current rayon pool.
    ///
    /// Without the `parallel` feature this is always [`FftStrategy::Serial`].
    #[must_use]
    pub fn select(factors: PrimeFieldFactors) -> Self {
        let num_workers = current_num_workers();
        let strategy = Self::for_workers(factors, num_workers);
        debug!(?strategy, num_workers, ?factors, "selected fft strategy");
        strategy
    }

    /// Runs the transform of `a` with root `omega` using this strategy.
    pub fn apply<F: Field>(self, a: &mut [F], omega: F, q: u64, factors: PrimeFieldFactors) {
        match self {
            Self::Serial => serial_fft(a, omega, q, factors),
            Self::Parallel { log_num_workers } => {
                parallel_fft(a, omega, q, factors, log_num_workers);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use p3_baby_bear::BabyBear;
    use p3_field::{PrimeCharacteristicRing, PrimeField64};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_single_worker_is_serial() {
        let factors = PrimeFieldFactors::new(10, 1);
        assert_eq!(FftStrategy::for_workers(factors, 0), FftStrategy::Serial);
        assert_eq!(FftStrategy::for_workers(factors, 1), FftStrategy::Serial);
    }

    #[test]
    fn test_worker_count_is_floored_to_power_of_two() {
        let factors = PrimeFieldFactors::new(10, 1);
        assert_eq!(
            FftStrategy::for_workers(factors, 6),
            FftStrategy::Parallel { log_num_workers: 2 }
        );
        assert_eq!(
            FftStrategy::for_workers(factors, 8),
            FftStrategy::Parallel { log_num_workers: 3 }
        );
    }

    #[test]
    fn test_parallel_requires_enough_two_adicity() {
        // 8 workers but only 2^2 in the domain size.
        let factors = PrimeFieldFactors::new(2, 1);
        assert_eq!(FftStrategy::for_workers(factors, 8), FftStrategy::Serial);
        // Exactly at the bound.
        assert_eq!(
            FftStrategy::for_workers(factors, 4),
            FftStrategy::Parallel { log_num_workers: 2 }
        );
    }

    #[test]
    fn test_select_never_exceeds_two_adicity() {
        for s in 0..4 {
            let factors = PrimeFieldFactors::new(s, 1);
            match FftStrategy::select(factors) {
                FftStrategy::Serial => {}
                FftStrategy::Parallel { log_num_workers } => {
                    assert!(log_num_workers >= 1);
                    assert!(log_num_workers <= s);
                }
            }
        }
    }

    #[test]
    fn test_strategies_agree() {
        let factors = PrimeFieldFactors::new(4, 1);
        let n = 48;
        let omega = BabyBear::GENERATOR.exp_u64((BabyBear::ORDER_U64 - 1) / n);
        let mut rng = StdRng::seed_from_u64(3);
        let input: Vec<BabyBear> = (0..n).map(|_| rng.random()).collect();

        let mut serial = input.clone();
        FftStrategy::Serial.apply(&mut serial, omega, 3, factors);

        let mut parallel = input.clone();
        FftStrategy::Parallel { log_num_workers: 3 }.apply(&mut parallel, omega, 3, factors);

        let mut best = input;
        FftStrategy::select(factors).apply(&mut best, omega, 3, factors);

        assert_eq!(serial, parallel);
        assert_eq!(serial, best);
    }
}
