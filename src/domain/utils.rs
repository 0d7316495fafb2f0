//! Helpers shared by every evaluation domain: the radix-2 reordering, the two-term
//! butterfly, and the coset twists applied around a transform.

use alloc::vec::Vec;

use p3_field::Field;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{fft::FftStrategy, field::PrimeFieldFactors};

/// Computes the optimal workload size for `T` to fit in L1 cache (32 KB).
///
/// Ensures efficient memory access by dividing the cache size by `T`'s size.
/// The result represents how many elements of `T` can be processed per thread.
pub const fn workload_size<T: Sized>() -> usize {
    const L1_CACHE_SIZE: usize = 1 << 15; // 32 KB
    L1_CACHE_SIZE / size_of::<T>()
}

/// Reorders `a` by reversing the `log2(a.len())` bits of every index.
///
/// `a.len()` must be a power of two.
pub fn bit_reverse_in_place<F: Field>(a: &mut [F]) {
    if a.len() > 1 {
        p3_util::reverse_slice_index_bits(a);
    }
}

/// Decimation-in-time butterfly: `(lo, hi) <- (lo + w·hi, lo - w·hi)`.
#[inline]
pub fn butterfly<F: Field>(lo: &mut F, hi: &mut F, w: F) {
    *hi *= w;
    let t = *lo - *hi;
    *lo += *hi;
    *hi = t;
}

/// Multiplies `coeffs[i]` by `g^i`.
pub fn distribute_powers<F: Field>(coeffs: &mut [F], g: F) {
    distribute_powers_and_mul_by_const(coeffs, g, F::ONE);
}

/// Multiplies `coeffs[i]` by `c · g^i` in a single pass.
pub fn distribute_powers_and_mul_by_const<F: Field>(coeffs: &mut [F], g: F, c: F) {
    #[cfg(not(feature = "parallel"))]
    {
        let mut pow = c;
        for coeff in coeffs {
            *coeff *= pow;
            pow *= g;
        }
    }

    #[cfg(feature = "parallel")]
    {
        let chunk_size = workload_size::<F>().max(1);
        coeffs
            .par_chunks_mut(chunk_size)
            .enumerate()
            .for_each(|(chunk_idx, chunk)| {
                let mut pow = c * g.exp_u64((chunk_idx * chunk_size) as u64);
                for coeff in chunk {
                    *coeff *= pow;
                    pow *= g;
                }
            });
    }
}

/// Multiplies every entry of `values` by `c`.
pub fn scale_in_place<F: Field>(values: &mut [F], c: F) {
    #[cfg(not(feature = "parallel"))]
    values.iter_mut().for_each(|v| *v *= c);

    #[cfg(feature = "parallel")]
    values.par_iter_mut().for_each(|v| *v *= c);
}

/// Evaluates the coefficients in `coeffs` over `offset · <omega>`, where `omega`
/// generates a group of order `q^t * 2^s` given by `factors`.
///
/// The buffer is zero-padded to the full domain size before `strategy` runs the
/// transform.
///
/// # Panics
///
/// Panics if `coeffs` is longer than the domain.
pub(super) fn coset_fft_in_place<F: Field>(
    coeffs: &mut Vec<F>,
    offset: F,
    omega: F,
    q: u64,
    factors: PrimeFieldFactors,
    strategy: FftStrategy,
) {
    let size = domain_size(q, factors);
    assert!(
        coeffs.len() <= size,
        "{} coefficients do not fit in a domain of size {size}",
        coeffs.len()
    );

    if !offset.is_one() {
        distribute_powers(coeffs, offset);
    }
    coeffs.resize(size, F::ZERO);
    strategy.apply(coeffs, omega, q, factors);
}

/// Interpolates the evaluations in `evals` over `offset · <omega>`, given
/// `offset_inv`, `omega_inv` and `size_inv`.
///
/// The buffer is zero-padded to the full domain size and trailing zero coefficients
/// are kept.
///
/// # Panics
///
/// Panics if `evals` is longer than the domain.
pub(super) fn coset_ifft_in_place<F: Field>(
    evals: &mut Vec<F>,
    offset_inv: F,
    omega_inv: F,
    size_inv: F,
    q: u64,
    factors: PrimeFieldFactors,
    strategy: FftStrategy,
) {
    let size = domain_size(q, factors);
    assert!(
        evals.len() <= size,
        "{} evaluations do not fit in a domain of size {size}",
        evals.len()
    );

    evals.resize(size, F::ZERO);
    strategy.apply(evals, omega_inv, q, factors);
    if offset_inv.is_one() {
        scale_in_place(evals, size_inv);
    } else {
        distribute_powers_and_mul_by_const(evals, offset_inv, size_inv);
    }
}

fn domain_size(q: u64, factors: PrimeFieldFactors) -> usize {
    match factors.size(q).map(usize::try_from) {
        Some(Ok(size)) => size,
        _ => panic!("{factors:?} with base {q} does not describe an addressable domain"),
    }
}
