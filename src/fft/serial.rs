use alloc::{vec, vec::Vec};

use p3_field::Field;

use super::permute::mixed_radix_fft_permute;
use crate::{
    domain::utils::{bit_reverse_in_place, butterfly},
    field::PrimeFieldFactors,
};

/// In-place single-threaded FFT over a domain of size `q^t * 2^s`.
///
/// Conceptually, this first splits into 2 sub-arrays `s` times and then into `q`
/// sub-arrays `t` times, where `(s, t)` are the given `factors`. `omega` must have
/// multiplicative order `a.len()`; passing the inverse generator computes the
/// unscaled inverse transform.
///
/// On return, `a[i]` holds the evaluation at `omega^i` of the polynomial whose
/// coefficients were in `a`.
///
/// # Panics
///
/// Panics if `a.len() != q^t * 2^s`.
pub fn serial_fft<F: Field>(a: &mut [F], omega: F, q: u64, factors: PrimeFieldFactors) {
    let n = a.len();
    let PrimeFieldFactors {
        two_adicity,
        q_adicity,
    } = factors;
    assert_eq!(
        factors.size(q),
        Some(n as u64),
        "domain size {n} is not {q}^{q_adicity} * 2^{two_adicity}"
    );

    let mut m = 1;
    if q_adicity > 0 {
        // The mixed-radix permutation is not an involution, so cycles have to be
        // followed explicitly instead of swapping pairs.
        permute_in_place(a, two_adicity, q_adicity, q);
        m = radix_q_passes(a, omega, q as usize, q_adicity);
    } else {
        bit_reverse_in_place(a);
    }

    for _ in 0..two_adicity {
        // w_m is a primitive (2m)-th root of unity.
        let w_m = omega.exp_u64((n / (2 * m)) as u64);
        for k in (0..n).step_by(2 * m) {
            let (lo, hi) = a[k..k + 2 * m].split_at_mut(m);
            let mut w = F::ONE;
            for (lo, hi) in lo.iter_mut().zip(hi) {
                butterfly(lo, hi, w);
                w *= w_m;
            }
        }
        m *= 2;
    }
}

/// Moves the element at `i` to `mixed_radix_fft_permute(i)` for every `i`.
fn permute_in_place<F: Field>(a: &mut [F], two_adicity: u32, q_adicity: u32, q: u64) {
    let n = a.len();
    let mut seen = vec![false; n];
    for k in 0..n {
        // `a[k]` carries the element being moved along the cycle starting at `k`.
        let mut i = k;
        while !seen[i] {
            let dest = mixed_radix_fft_permute(two_adicity, q_adicity, q, n, i);
            a.swap(dest, k);
            seen[i] = true;
            i = dest;
        }
    }
}

/// Runs the `q_adicity` radix-`q` merge passes and returns the block size reached.
fn radix_q_passes<F: Field>(a: &mut [F], omega: F, q: usize, q_adicity: u32) -> usize {
    let n = a.len();

    let omega_q = omega.exp_u64((n / q) as u64);
    let qth_roots: Vec<F> = omega_q.powers().take(q).collect();

    let mut terms = F::zero_vec(q - 1);

    let mut m = 1;
    for _ in 0..q_adicity {
        let w_m = omega.exp_u64((n / (q * m)) as u64);
        for k in (0..n).step_by(q * m) {
            // w_j = w_m^j
            let mut w_j = F::ONE;
            for j in 0..m {
                let base_term = a[k + j];
                let mut w_j_i = w_j;
                for (i, term) in terms.iter_mut().enumerate() {
                    *term = a[k + j + (i + 1) * m] * w_j_i;
                    w_j_i *= w_j;
                }

                for i in 0..q {
                    let mut acc = base_term;
                    for (l, term) in terms.iter().enumerate() {
                        acc += *term * qth_roots[(i * (l + 1)) % q];
                    }
                    a[k + j + i * m] = acc;
                }

                w_j *= w_m;
            }
        }
        m *= q;
    }
    m
}
