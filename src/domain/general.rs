use alloc::vec::Vec;

use p3_field::Field;

use super::{mixed_radix::MixedRadixEvaluationDomain, radix2::Radix2EvaluationDomain};
use crate::{
    fft::FftStrategy,
    field::{MixedRadixField, PrimeFieldFactors},
    poly::{DensePolynomial, UnivariateEvaluations},
};

/// Defines a domain over which finite field (I)FFTs can be performed.
///
/// Generally tries to build a radix-2 domain and falls back to a mixed-radix
/// domain if the radix-2 multiplicative subgroup is too small.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub enum GeneralEvaluationDomain<F> {
    /// Radix-2 domain
    Radix2(Radix2EvaluationDomain<F>),
    /// Mixed-radix domain
    MixedRadix(MixedRadixEvaluationDomain<F>),
}

impl<F: MixedRadixField> GeneralEvaluationDomain<F> {
    /// Construct a domain that is large enough for evaluations of a polynomial
    /// having `num_coeffs` coefficients.
    ///
    /// If the field specifies a small subgroup for a mixed-radix FFT and
    /// the radix-2 FFT cannot be constructed, this method tries
    /// constructing a mixed-radix FFT instead.
    #[must_use]
    pub fn new(num_coeffs: usize) -> Option<Self> {
        if let Some(domain) = Radix2EvaluationDomain::new(num_coeffs) {
            return Some(Self::Radix2(domain));
        }
        if F::has_large_subgroup_root_of_unity() {
            return MixedRadixEvaluationDomain::new(num_coeffs).map(Self::MixedRadix);
        }
        None
    }

    /// Size of the domain [`Self::new`] would build, without building it.
    #[must_use]
    pub fn compute_size_of_domain(num_coeffs: usize) -> Option<usize> {
        Radix2EvaluationDomain::<F>::compute_size_of_domain(num_coeffs).or_else(|| {
            F::has_large_subgroup_root_of_unity()
                .then(|| MixedRadixEvaluationDomain::<F>::compute_size_of_domain(num_coeffs))
                .flatten()
        })
    }
}

impl<F: Field> GeneralEvaluationDomain<F> {
    /// The same subgroup shifted by `offset`, or `None` if `offset` is zero.
    #[must_use]
    pub fn get_coset(&self, offset: F) -> Option<Self> {
        match self {
            Self::Radix2(domain) => domain.get_coset(offset).map(Self::Radix2),
            Self::MixedRadix(domain) => domain.get_coset(offset).map(Self::MixedRadix),
        }
    }

    #[inline]
    pub const fn size(&self) -> usize {
        match self {
            Self::Radix2(domain) => domain.size(),
            Self::MixedRadix(domain) => domain.size(),
        }
    }

    #[inline]
    pub const fn group_gen(&self) -> F {
        match self {
            Self::Radix2(domain) => domain.group_gen(),
            Self::MixedRadix(domain) => domain.group_gen(),
        }
    }

    #[inline]
    pub const fn group_gen_inv(&self) -> F {
        match self {
            Self::Radix2(domain) => domain.group_gen_inv(),
            Self::MixedRadix(domain) => domain.group_gen_inv(),
        }
    }

    #[inline]
    pub const fn log_size_of_group(&self) -> u32 {
        match self {
            Self::Radix2(domain) => domain.log_size_of_group(),
            Self::MixedRadix(domain) => domain.log_size_of_group(),
        }
    }

    #[inline]
    pub const fn size_as_field_element(&self) -> F {
        match self {
            Self::Radix2(domain) => domain.size_as_field_element(),
            Self::MixedRadix(domain) => domain.size_as_field_element(),
        }
    }

    #[inline]
    pub const fn size_inv(&self) -> F {
        match self {
            Self::Radix2(domain) => domain.size_inv(),
            Self::MixedRadix(domain) => domain.size_inv(),
        }
    }

    #[inline]
    pub const fn coset_offset(&self) -> F {
        match self {
            Self::Radix2(domain) => domain.coset_offset(),
            Self::MixedRadix(domain) => domain.coset_offset(),
        }
    }

    #[inline]
    pub const fn coset_offset_inv(&self) -> F {
        match self {
            Self::Radix2(domain) => domain.coset_offset_inv(),
            Self::MixedRadix(domain) => domain.coset_offset_inv(),
        }
    }

    #[inline]
    pub const fn coset_offset_pow_size(&self) -> F {
        match self {
            Self::Radix2(domain) => domain.coset_offset_pow_size(),
            Self::MixedRadix(domain) => domain.coset_offset_pow_size(),
        }
    }

    /// Returns the `i`-th element of the domain.
    #[inline]
    pub fn element(&self, i: usize) -> F {
        let mut result = self.group_gen().exp_u64(i as u64);
        if !self.coset_offset().is_one() {
            result *= self.coset_offset();
        }
        result
    }

    /// All elements of the domain in order.
    pub fn elements(&self) -> impl Iterator<Item = F> + '_ {
        let offset = self.coset_offset();
        self.group_gen()
            .powers()
            .take(self.size())
            .map(move |g| offset * g)
    }

    /// Evaluates `Z(X) = X^size - offset^size` at `tau`.
    pub fn evaluate_vanishing_polynomial(&self, tau: F) -> F {
        match self {
            Self::Radix2(domain) => domain.evaluate_vanishing_polynomial(tau),
            Self::MixedRadix(domain) => domain.evaluate_vanishing_polynomial(tau),
        }
    }

    pub fn fft_in_place(&self, coeffs: &mut Vec<F>) {
        match self {
            Self::Radix2(domain) => domain.fft_in_place(coeffs),
            Self::MixedRadix(domain) => domain.fft_in_place(coeffs),
        }
    }

    pub fn fft_in_place_with(&self, coeffs: &mut Vec<F>, strategy: FftStrategy) {
        match self {
            Self::Radix2(domain) => domain.fft_in_place_with(coeffs, strategy),
            Self::MixedRadix(domain) => domain.fft_in_place_with(coeffs, strategy),
        }
    }

    pub fn ifft_in_place(&self, evals: &mut Vec<F>) {
        match self {
            Self::Radix2(domain) => domain.ifft_in_place(evals),
            Self::MixedRadix(domain) => domain.ifft_in_place(evals),
        }
    }

    pub fn ifft_in_place_with(&self, evals: &mut Vec<F>, strategy: FftStrategy) {
        match self {
            Self::Radix2(domain) => domain.ifft_in_place_with(evals, strategy),
            Self::MixedRadix(domain) => domain.ifft_in_place_with(evals, strategy),
        }
    }

    /// Two-adic and small-subgroup exponents of the size.
    #[inline]
    pub const fn factors(&self) -> PrimeFieldFactors {
        match self {
            Self::Radix2(domain) => domain.factors(),
            Self::MixedRadix(domain) => domain.factors(),
        }
    }

    #[must_use]
    pub fn fft(&self, poly: &DensePolynomial<F>) -> UnivariateEvaluations<F> {
        match self {
            Self::Radix2(domain) => domain.fft(poly),
            Self::MixedRadix(domain) => domain.fft(poly),
        }
    }

    #[must_use]
    pub fn ifft(&self, evals: &UnivariateEvaluations<F>) -> DensePolynomial<F> {
        match self {
            Self::Radix2(domain) => domain.ifft(evals),
            Self::MixedRadix(domain) => domain.ifft(evals),
        }
    }
}

impl<F> From<Radix2EvaluationDomain<F>> for GeneralEvaluationDomain<F> {
    fn from(domain: Radix2EvaluationDomain<F>) -> Self {
        Self::Radix2(domain)
    }
}

impl<F> From<MixedRadixEvaluationDomain<F>> for GeneralEvaluationDomain<F> {
    fn from(domain: MixedRadixEvaluationDomain<F>) -> Self {
        Self::MixedRadix(domain)
    }
}
