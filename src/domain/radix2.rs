use alloc::vec::Vec;

use p3_field::{Field, TwoAdicField};
use tracing::instrument;

use super::utils::{coset_fft_in_place, coset_ifft_in_place};
use crate::{
    fft::FftStrategy,
    field::PrimeFieldFactors,
    poly::{DensePolynomial, UnivariateEvaluations},
};

/// Defines a domain over which finite field (I)FFTs can be performed. Works
/// only for fields that have a large multiplicative subgroup of size that is
/// a power-of-2.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct Radix2EvaluationDomain<F> {
    /// The size of the domain.
    pub size: u64,
    /// `log_2(self.size)`.
    pub log_size_of_group: u32,
    /// Size of the domain as a field element.
    pub size_as_field_element: F,
    /// Inverse of the size in the field.
    pub size_inv: F,
    /// A generator of the subgroup.
    pub group_gen: F,
    /// Inverse of the generator of the subgroup.
    pub group_gen_inv: F,
    /// Offset that specifies the coset.
    pub offset: F,
    /// Inverse of the offset that specifies the coset.
    pub offset_inv: F,
    /// Constant coefficient for the vanishing polynomial.
    /// Equals `self.offset^self.size`.
    pub offset_pow_size: F,
}

impl<F: TwoAdicField> Radix2EvaluationDomain<F> {
    #[must_use]
    pub fn new(num_coeffs: usize) -> Option<Self> {
        let size = num_coeffs.checked_next_power_of_two()? as u64;
        let log_size_of_group = size.trailing_zeros();

        if log_size_of_group > F::TWO_ADICITY as u32 {
            return None;
        }

        // Compute the generator for the multiplicative subgroup.
        // It should be the 2^(log_size_of_group) root of unity.
        let group_gen = F::two_adic_generator(log_size_of_group as usize);

        // Check that it is indeed the 2^(log_size_of_group) root of unity.
        debug_assert_eq!(group_gen.exp_u64(size), F::ONE);
        let size_as_field_element = F::from_u64(size);
        let size_inv = size_as_field_element.inverse();

        Some(Self {
            size,
            log_size_of_group,
            size_as_field_element,
            size_inv,
            group_gen,
            group_gen_inv: group_gen.inverse(),
            offset: F::ONE,
            offset_inv: F::ONE,
            offset_pow_size: F::ONE,
        })
    }

    /// Size of the domain [`Self::new`] would build, without building it.
    #[must_use]
    pub fn compute_size_of_domain(num_coeffs: usize) -> Option<usize> {
        let size = num_coeffs.checked_next_power_of_two()?;
        (size.trailing_zeros() as usize <= F::TWO_ADICITY).then_some(size)
    }
}

impl<F: Field> Radix2EvaluationDomain<F> {
    /// The same subgroup shifted by `offset`, or `None` if `offset` is zero.
    #[must_use]
    pub fn get_coset(&self, offset: F) -> Option<Self> {
        let offset_inv = offset.try_inverse()?;
        Some(Self {
            offset,
            offset_inv,
            offset_pow_size: offset.exp_u64(self.size),
            ..*self
        })
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.size as usize
    }

    #[inline]
    pub const fn group_gen(&self) -> F {
        self.group_gen
    }

    #[inline]
    pub const fn group_gen_inv(&self) -> F {
        self.group_gen_inv
    }

    #[inline]
    pub const fn log_size_of_group(&self) -> u32 {
        self.log_size_of_group
    }

    #[inline]
    pub const fn size_as_field_element(&self) -> F {
        self.size_as_field_element
    }

    #[inline]
    pub const fn size_inv(&self) -> F {
        self.size_inv
    }

    #[inline]
    pub const fn coset_offset(&self) -> F {
        self.offset
    }

    #[inline]
    pub const fn coset_offset_inv(&self) -> F {
        self.offset_inv
    }

    #[inline]
    pub const fn coset_offset_pow_size(&self) -> F {
        self.offset_pow_size
    }

    #[inline]
    pub const fn factors(&self) -> PrimeFieldFactors {
        PrimeFieldFactors::radix2(self.log_size_of_group)
    }

    /// Returns the `i`-th element of the domain, `offset · g^i`.
    pub fn element(&self, i: usize) -> F {
        self.offset * self.group_gen.exp_u64(i as u64)
    }

    /// All elements of the domain in order.
    pub fn elements(&self) -> impl Iterator<Item = F> + '_ {
        self.group_gen
            .powers()
            .take(self.size())
            .map(move |g| self.offset * g)
    }

    /// Evaluates `Z(X) = X^size - offset^size` at `tau`.
    pub fn evaluate_vanishing_polynomial(&self, tau: F) -> F {
        tau.exp_u64(self.size) - self.offset_pow_size
    }

    /// Evaluates the coefficients in `coeffs` over the domain, in place.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` is longer than the domain.
    pub fn fft_in_place(&self, coeffs: &mut Vec<F>) {
        self.fft_in_place_with(coeffs, FftStrategy::select(self.factors()));
    }

    /// [`Self::fft_in_place`] with a caller-chosen strategy.
    #[instrument(skip_all, fields(size = self.size, num_coeffs = coeffs.len(), ?strategy))]
    pub fn fft_in_place_with(&self, coeffs: &mut Vec<F>, strategy: FftStrategy) {
        // The base is irrelevant without radix-q passes.
        coset_fft_in_place(
            coeffs,
            self.offset,
            self.group_gen,
            2,
            self.factors(),
            strategy,
        );
    }

    /// Interpolates the evaluations in `evals` over the domain, in place, keeping
    /// trailing zero coefficients.
    ///
    /// # Panics
    ///
    /// Panics if `evals` is longer than the domain.
    pub fn ifft_in_place(&self, evals: &mut Vec<F>) {
        self.ifft_in_place_with(evals, FftStrategy::select(self.factors()));
    }

    /// [`Self::ifft_in_place`] with a caller-chosen strategy.
    #[instrument(skip_all, fields(size = self.size, num_evals = evals.len(), ?strategy))]
    pub fn ifft_in_place_with(&self, evals: &mut Vec<F>, strategy: FftStrategy) {
        coset_ifft_in_place(
            evals,
            self.offset_inv,
            self.group_gen_inv,
            self.size_inv,
            2,
            self.factors(),
            strategy,
        );
    }

    /// Evaluates `poly` over the domain.
    #[must_use]
    pub fn fft(&self, poly: &DensePolynomial<F>) -> UnivariateEvaluations<F> {
        let mut evals = poly.coeffs().to_vec();
        self.fft_in_place(&mut evals);
        UnivariateEvaluations::new(evals)
    }

    /// Interpolates `evals` over the domain, dropping trailing zero coefficients.
    #[must_use]
    pub fn ifft(&self, evals: &UnivariateEvaluations<F>) -> DensePolynomial<F> {
        let mut coeffs = evals.evals().to_vec();
        self.ifft_in_place(&mut coeffs);
        DensePolynomial::from_coefficients_vec(coeffs)
    }
}
