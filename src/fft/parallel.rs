use alloc::vec::Vec;

use p3_field::Field;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::instrument;

use super::serial::serial_fft;
use crate::field::PrimeFieldFactors;

/// FFT over a domain of size `q^t * 2^s`, split into `2^log_num_workers` independent
/// coset sub-transforms.
///
/// The evaluations are arranged in cosets of the subgroup generated by
/// `omega^num_cosets`: coset `k` is `(ω^k, ω^(k + num_cosets), ω^(k + 2·num_cosets), …)`.
/// For each coset we first build a polynomial of degree `< n / num_cosets` whose
/// evaluations over that coset agree with those of `a`, then run a serial FFT on it.
/// Building each coset polynomial costs `O(n)` multiplications, so the total work is
/// `O(n · num_cosets)` on top of the sub-FFTs.
///
/// Produces exactly the output of [`serial_fft`].
///
/// # Panics
///
/// Panics if `log_num_workers` exceeds the two-adicity in `factors`.
#[instrument(skip_all, fields(size = a.len(), log_num_workers = log_num_workers), level = "debug")]
pub fn parallel_fft<F: Field>(
    a: &mut [F],
    omega: F,
    q: u64,
    factors: PrimeFieldFactors,
    log_num_workers: u32,
) {
    assert!(
        log_num_workers <= factors.two_adicity,
        "2^{log_num_workers} workers need a two-adicity of at least {log_num_workers}, got {}",
        factors.two_adicity
    );

    let n = a.len();
    let num_cosets = 1 << log_num_workers;
    let coset_size = n / num_cosets;
    assert_eq!(coset_size * num_cosets, n);

    let coset_omega = omega.exp_u64(num_cosets as u64);
    let coset_factors =
        PrimeFieldFactors::new(factors.two_adicity - log_num_workers, factors.q_adicity);

    let evaluate_coset = |k: usize| {
        let mut coset_evals = coset_polynomial(a, omega, k, num_cosets);
        serial_fft(&mut coset_evals, coset_omega, q, coset_factors);
        coset_evals
    };

    #[cfg(feature = "parallel")]
    let cosets: Vec<Vec<F>> = (0..num_cosets)
        .into_par_iter()
        .map(evaluate_coset)
        .collect();
    #[cfg(not(feature = "parallel"))]
    let cosets: Vec<Vec<F>> = (0..num_cosets).map(evaluate_coset).collect();

    // The evaluations of `a` are ordered as (1, ω, ω², …).
    for (i, x) in a.iter_mut().enumerate() {
        *x = cosets[i % num_cosets][i / num_cosets];
    }
}

/// Coefficients of the polynomial whose evaluations over coset `k` match those of `a`:
///
/// ```text
/// out[i] = Σ_{c < num_cosets} ω^(k·(i + c·coset_size)) · a[i + c·coset_size]
/// ```
fn coset_polynomial<F: Field>(a: &[F], omega: F, k: usize, num_cosets: usize) -> Vec<F> {
    let coset_size = a.len() / num_cosets;
    let omega_k = omega.exp_u64(k as u64);
    let omega_step = omega.exp_u64((k * coset_size) as u64);

    let mut out = F::zero_vec(coset_size);
    // elt = ω^(k·idx)
    let mut elt = F::ONE;
    for (i, out_i) in out.iter_mut().enumerate() {
        for c in 0..num_cosets {
            *out_i += a[i + c * coset_size] * elt;
            elt *= omega_step;
        }
        // After `num_cosets` steps `elt` has wrapped around by ω^(k·n) = 1.
        elt *= omega_k;
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use p3_baby_bear::BabyBear;
    use p3_field::{PrimeCharacteristicRing, PrimeField64, TwoAdicField};
    use p3_goldilocks::Goldilocks;
    use p3_mersenne_31::Mersenne31;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    fn root_of_order<F: PrimeField64>(n: u64) -> F {
        F::GENERATOR.exp_u64((F::ORDER_U64 - 1) / n)
    }

    fn assert_matches_serial<F: Field>(input: &[F], omega: F, q: u64, factors: PrimeFieldFactors) {
        let mut expected = input.to_vec();
        serial_fft(&mut expected, omega, q, factors);

        for log_num_workers in 0..=factors.two_adicity {
            let mut actual = input.to_vec();
            parallel_fft(&mut actual, omega, q, factors, log_num_workers);
            assert_eq!(actual, expected, "log_num_workers = {log_num_workers}");
        }
    }

    #[test]
    fn test_parallel_matches_serial_mixed_babybear() {
        let factors = PrimeFieldFactors::new(5, 1);
        let mut rng = StdRng::seed_from_u64(0);
        let input: Vec<BabyBear> = (0..96).map(|_| rng.random()).collect();
        assert_matches_serial(&input, root_of_order(96), 3, factors);
    }

    #[test]
    fn test_parallel_matches_serial_radix2_goldilocks() {
        let factors = PrimeFieldFactors::radix2(6);
        let mut rng = StdRng::seed_from_u64(1);
        let input: Vec<Goldilocks> = (0..64).map(|_| rng.random()).collect();
        assert_matches_serial(&input, Goldilocks::two_adic_generator(6), 3, factors);
    }

    #[test]
    fn test_parallel_matches_serial_several_radix_q_passes() {
        let factors = PrimeFieldFactors::new(1, 2);
        let mut rng = StdRng::seed_from_u64(2);
        let input: Vec<Mersenne31> = (0..18).map(|_| rng.random()).collect();
        assert_matches_serial(&input, root_of_order(18), 3, factors);
    }

    #[test]
    fn test_coset_polynomial_for_first_coset_folds_strided_entries() {
        // For coset 0 every twist is 1, so entry i is the sum of the strided entries.
        let a: Vec<_> = (1..=12).map(BabyBear::from_u64).collect();
        let out = coset_polynomial(&a, root_of_order::<BabyBear>(12), 0, 4);
        let expected: Vec<_> = [1 + 4 + 7 + 10, 2 + 5 + 8 + 11, 3 + 6 + 9 + 12]
            .into_iter()
            .map(BabyBear::from_u64)
            .collect();
        assert_eq!(out, expected);
    }

    #[test]
    #[should_panic]
    fn test_parallel_rejects_too_many_workers() {
        let mut a = vec![BabyBear::ONE; 12];
        parallel_fft(&mut a, root_of_order(12), 3, PrimeFieldFactors::new(2, 1), 3);
    }

    proptest! {
        #[test]
        fn prop_parallel_matches_serial(
            s in 0u32..=5,
            t in 0u32..=1,
            seed in any::<u64>(),
        ) {
            let factors = PrimeFieldFactors::new(s, t);
            let n = factors.size(3).unwrap();
            let omega = root_of_order::<BabyBear>(n);
            let mut rng = StdRng::seed_from_u64(seed);
            let input: Vec<BabyBear> = (0..n).map(|_| rng.random()).collect();

            let mut expected = input.clone();
            serial_fft(&mut expected, omega, 3, factors);

            let log_num_workers = (seed % u64::from(s + 1)) as u32;
            let mut actual = input;
            parallel_fft(&mut actual, omega, 3, factors, log_num_workers);
            prop_assert_eq!(actual, expected);
        }
    }
}
