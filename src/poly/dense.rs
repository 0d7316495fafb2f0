use alloc::vec::Vec;

use p3_field::Field;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Set some minimum number of field elements to be worked on per thread
// to avoid per-thread costs dominating parallel execution time.
#[cfg(feature = "parallel")]
const MIN_ELEMENTS_PER_THREAD: usize = 16;

/// Stores a univariate polynomial in coefficient form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DensePolynomial<F> {
    /// The coefficient of `x^i` is stored at location `i` in `self.coeffs`.
    coeffs: Vec<F>,
}

/// The zero polynomial.
impl<F> Default for DensePolynomial<F> {
    fn default() -> Self {
        Self { coeffs: Vec::new() }
    }
}

impl<F: Field> DensePolynomial<F> {
    /// Constructs a new polynomial from a list of coefficients.
    #[must_use]
    pub fn from_coefficients_slice(coeffs: &[F]) -> Self {
        Self::from_coefficients_vec(coeffs.to_vec())
    }

    /// Constructs a new polynomial from a list of coefficients.
    ///
    /// Trailing zero coefficients are dropped, so the zero polynomial has no
    /// coefficients at all.
    #[must_use]
    pub fn from_coefficients_vec(coeffs: Vec<F>) -> Self {
        let mut result = Self { coeffs };
        result.truncate_leading_zeros();
        debug_assert!(result.coeffs.last().is_none_or(|coeff| !coeff.is_zero()));
        result
    }

    fn truncate_leading_zeros(&mut self) {
        while self.coeffs.last().is_some_and(|c| c.is_zero()) {
            self.coeffs.pop();
        }
    }

    /// The coefficients, lowest degree first.
    #[must_use]
    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    #[must_use]
    pub fn into_coeffs(self) -> Vec<F> {
        self.coeffs
    }

    /// Degree of the polynomial. The zero polynomial has degree 0.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Checks if the given polynomial is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Evaluates `self` at `point`.
    #[must_use]
    pub fn evaluate(&self, point: &F) -> F {
        if self.is_zero() {
            return F::ZERO;
        } else if point.is_zero() {
            return self.coeffs[0];
        }
        self.internal_evaluate(point)
    }

    #[cfg(not(feature = "parallel"))]
    fn internal_evaluate(&self, point: &F) -> F {
        Self::horner_evaluate(&self.coeffs, point)
    }

    #[cfg(feature = "parallel")]
    fn internal_evaluate(&self, point: &F) -> F {
        let num_cpus_available = rayon::current_num_threads();
        let num_coeffs = self.coeffs.len();
        let num_elem_per_thread = (num_coeffs / num_cpus_available).max(MIN_ELEMENTS_PER_THREAD);

        // Each thread runs Horner on its own chunk, and the partial result is shifted
        // by point^(chunk start) before everything is summed.
        self.coeffs
            .par_chunks(num_elem_per_thread)
            .enumerate()
            .map(|(i, chunk)| {
                Self::horner_evaluate(chunk, point) * point.exp_u64((i * num_elem_per_thread) as u64)
            })
            .sum()
    }

    #[inline]
    fn horner_evaluate(poly_coeffs: &[F], point: &F) -> F {
        poly_coeffs
            .iter()
            .rfold(F::ZERO, move |result, &coeff| result * *point + coeff)
    }
}
