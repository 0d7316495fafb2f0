use alloc::vec::Vec;

use p3_field::Field;
use tracing::instrument;

use super::{
    sizer::DomainSizer,
    utils::{coset_fft_in_place, coset_ifft_in_place},
};
use crate::{
    errors::DomainError,
    fft::FftStrategy,
    field::{MixedRadixField, PrimeFieldFactors},
    poly::{DensePolynomial, UnivariateEvaluations},
};

/// Defines a domain over which finite field (I)FFTs can be performed.
///
/// The domain is a multiplicative subgroup of order `q^t * 2^s`, where `q` is the
/// field's small subgroup base. It is used when the field's two-adicity alone is too
/// small for the requested number of coefficients.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct MixedRadixEvaluationDomain<F> {
    /// The size of the domain.
    pub size: u64,
    /// Two-adic part of the size, `log_2(2^s)`.
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
    /// `(s, t)` such that `size == q^t * 2^s`.
    pub factors: PrimeFieldFactors,
    /// Small subgroup base.
    pub q: u64,
}

impl<F: MixedRadixField> MixedRadixEvaluationDomain<F> {
    /// Builds the smallest mixed-radix domain holding `num_coeffs` coefficients.
    pub fn try_new(num_coeffs: usize) -> Result<Self, DomainError> {
        let sizer = DomainSizer::for_field::<F>().ok_or(DomainError::NoLargeSubgroup)?;
        Self::with_sizer(num_coeffs, &sizer)
    }

    /// Like [`Self::try_new`], but refuses domains supporting degrees above
    /// `max_degree`.
    pub fn try_new_with_max_degree(num_coeffs: usize, max_degree: u64) -> Result<Self, DomainError> {
        let sizer = DomainSizer::for_field::<F>()
            .ok_or(DomainError::NoLargeSubgroup)?
            .with_max_degree(max_degree);
        Self::with_sizer(num_coeffs, &sizer)
    }

    #[must_use]
    pub fn new(num_coeffs: usize) -> Option<Self> {
        Self::try_new(num_coeffs).ok()
    }

    /// Builds the domain for `num_coeffs` coefficients.
    ///
    /// # Panics
    ///
    /// Panics if no mixed-radix domain can hold `num_coeffs` coefficients. Check with
    /// [`Self::is_valid_num_coeffs`] first.
    #[must_use]
    pub fn create(num_coeffs: usize) -> Self {
        match Self::try_new(num_coeffs) {
            Ok(domain) => domain,
            Err(err) => panic!("cannot build a mixed-radix domain for {num_coeffs} coefficients: {err}"),
        }
    }

    /// Whether a domain for `num_coeffs` coefficients can be built over `F`.
    #[must_use]
    pub fn is_valid_num_coeffs(num_coeffs: usize) -> bool {
        DomainSizer::for_field::<F>().is_some_and(|sizer| sizer.is_valid::<F>(num_coeffs))
    }

    /// Size of the domain [`Self::new`] would build, without building it.
    #[must_use]
    pub fn compute_size_of_domain(num_coeffs: usize) -> Option<usize> {
        let sizer = DomainSizer::for_field::<F>()?;
        sizer
            .size_and_factors::<F>(num_coeffs)
            .ok()
            .map(|(size, _)| size)
    }

    fn with_sizer(num_coeffs: usize, sizer: &DomainSizer) -> Result<Self, DomainError> {
        let (size, factors) = sizer.size_and_factors::<F>(num_coeffs)?;
        let size = size as u64;

        let group_gen =
            F::mixed_radix_root_of_unity(size).ok_or(DomainError::Decomposition { size })?;
        debug_assert_eq!(group_gen.exp_u64(size), F::ONE);

        let size_as_field_element = F::from_u64(size);
        let size_inv = size_as_field_element.inverse();

        Ok(Self {
            size,
            log_size_of_group: factors.two_adicity,
            size_as_field_element,
            size_inv,
            group_gen,
            group_gen_inv: group_gen.inverse(),
            offset: F::ONE,
            offset_inv: F::ONE,
            offset_pow_size: F::ONE,
            factors,
            q: sizer.base,
        })
    }
}

impl<F: Field> MixedRadixEvaluationDomain<F> {
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
    pub const fn log_size_of_group(&self) -> u32 {
        self.log_size_of_group
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
        self.factors
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
    /// The buffer ends up with exactly `self.size()` entries.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` is longer than the domain.
    pub fn fft_in_place(&self, coeffs: &mut Vec<F>) {
        self.fft_in_place_with(coeffs, FftStrategy::select(self.factors));
    }

    /// [`Self::fft_in_place`] with a caller-chosen strategy.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` is longer than the domain, or if a parallel `strategy` asks
    /// for more cosets than the two-adic part of the size allows.
    #[instrument(skip_all, fields(size = self.size, num_coeffs = coeffs.len(), ?strategy))]
    pub fn fft_in_place_with(&self, coeffs: &mut Vec<F>, strategy: FftStrategy) {
        self.assert_consistent();
        coset_fft_in_place(
            coeffs,
            self.offset,
            self.group_gen,
            self.q,
            self.factors,
            strategy,
        );
    }

    /// Interpolates the evaluations in `evals` over the domain, in place.
    ///
    /// The buffer ends up with exactly `self.size()` coefficients, trailing zeros
    /// included.
    ///
    /// # Panics
    ///
    /// Panics if `evals` is longer than the domain.
    pub fn ifft_in_place(&self, evals: &mut Vec<F>) {
        self.ifft_in_place_with(evals, FftStrategy::select(self.factors));
    }

    /// [`Self::ifft_in_place`] with a caller-chosen strategy.
    #[instrument(skip_all, fields(size = self.size, num_evals = evals.len(), ?strategy))]
    pub fn ifft_in_place_with(&self, evals: &mut Vec<F>, strategy: FftStrategy) {
        self.assert_consistent();
        coset_ifft_in_place(
            evals,
            self.offset_inv,
            self.group_gen_inv,
            self.size_inv,
            self.q,
            self.factors,
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

    fn assert_consistent(&self) {
        assert_eq!(
            self.factors.size(self.q),
            Some(self.size),
            "domain size {} is not {}^{} * 2^{}",
            self.size,
            self.q,
            self.factors.q_adicity,
            self.factors.two_adicity
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use p3_baby_bear::BabyBear;
    use p3_field::PrimeCharacteristicRing;
    use p3_goldilocks::Goldilocks;
    use p3_koala_bear::KoalaBear;
    use proptest::prelude::*;
    use rand::{
        Rng, SeedableRng,
        distr::{Distribution, StandardUniform},
        rngs::StdRng,
    };

    use super::*;

    type F = BabyBear;

    fn random_poly<F: Field>(rng: &mut StdRng, num_coeffs: usize) -> DensePolynomial<F>
    where
        StandardUniform: Distribution<F>,
    {
        DensePolynomial::from_coefficients_vec((0..num_coeffs).map(|_| rng.random()).collect())
    }

    fn assert_round_trip<F: MixedRadixField>(num_coeffs: usize, seed: u64)
    where
        StandardUniform: Distribution<F>,
    {
        let mut rng = StdRng::seed_from_u64(seed);
        let poly = random_poly::<F>(&mut rng, num_coeffs);
        let domain = MixedRadixEvaluationDomain::<F>::new(num_coeffs).unwrap();

        for offset in [F::ONE, F::GENERATOR, F::from_u64(seed + 2)] {
            let coset = domain.get_coset(offset).unwrap();
            let evals = coset.fft(&poly);
            assert_eq!(evals.len(), coset.size());
            assert_eq!(coset.ifft(&evals), poly, "num_coeffs = {num_coeffs}");
        }
    }

    #[test]
    fn test_new_picks_smallest_mixed_size() {
        let domain = MixedRadixEvaluationDomain::<F>::new(10).unwrap();
        assert_eq!(domain.size(), 12);
        assert_eq!(domain.factors(), PrimeFieldFactors::new(2, 1));
        assert_eq!(domain.log_size_of_group(), 2);
        assert_eq!(domain.q, 3);
        assert_eq!(domain.group_gen().exp_u64(12), F::ONE);
        assert_ne!(domain.group_gen().exp_u64(6), F::ONE);
        assert_ne!(domain.group_gen().exp_u64(4), F::ONE);
        assert_eq!(domain.group_gen() * domain.group_gen_inv(), F::ONE);
        assert_eq!(domain.size_as_field_element() * domain.size_inv(), F::ONE);
    }

    #[test]
    fn test_power_of_two_requests_stay_radix2() {
        let domain = MixedRadixEvaluationDomain::<F>::new(16).unwrap();
        assert_eq!(domain.size(), 16);
        assert_eq!(domain.factors(), PrimeFieldFactors::radix2(4));
    }

    #[test]
    fn test_compute_size_of_domain() {
        type D = MixedRadixEvaluationDomain<F>;
        assert_eq!(D::compute_size_of_domain(0), Some(1));
        assert_eq!(D::compute_size_of_domain(5), Some(6));
        assert_eq!(D::compute_size_of_domain(10), Some(12));
        assert_eq!(D::compute_size_of_domain(13), Some(16));
        assert_eq!(D::compute_size_of_domain(17), Some(24));
        assert_eq!(D::compute_size_of_domain((3 << 27) + 1), None);
    }

    #[test]
    fn test_all_ones_polynomial_sums_at_identity() {
        // Degree 9 polynomial with all coefficients one, over a domain of size 12.
        let domain = MixedRadixEvaluationDomain::<F>::new(10).unwrap();
        let poly = DensePolynomial::from_coefficients_vec(vec![F::ONE; 10]);
        let evals = domain.fft(&poly);
        assert_eq!(evals.len(), 12);
        assert_eq!(evals.evals()[0], F::from_u64(10));
        assert_eq!(domain.ifft(&evals), poly);
    }

    #[test]
    fn test_unrepresentable_count_is_rejected_without_building() {
        // max_degree + 2 coefficients, where max_degree + 1 = 3 · 2^27.
        let num_coeffs = (3 << 27) + 1;
        type D = MixedRadixEvaluationDomain<F>;
        assert!(!D::is_valid_num_coeffs(num_coeffs));
        assert!(D::new(num_coeffs).is_none());
        assert_eq!(
            D::try_new(num_coeffs),
            Err(DomainError::NotRepresentable { num_coeffs })
        );
        assert!(D::is_valid_num_coeffs(3 << 27));
    }

    #[test]
    #[should_panic]
    fn test_create_panics_on_unrepresentable_count() {
        let _ = MixedRadixEvaluationDomain::<F>::create((3 << 27) + 1);
    }

    #[test]
    fn test_create_matches_new() {
        assert_eq!(
            MixedRadixEvaluationDomain::<F>::create(100),
            MixedRadixEvaluationDomain::<F>::new(100).unwrap()
        );
    }

    #[test]
    fn test_max_degree_bound() {
        let domain = MixedRadixEvaluationDomain::<F>::try_new_with_max_degree(16, 23).unwrap();
        assert_eq!(domain.size(), 16);
        assert_eq!(
            MixedRadixEvaluationDomain::<F>::try_new_with_max_degree(25, 23),
            Err(DomainError::ExceedsMaxDegree {
                size: 32,
                max_degree: 23
            })
        );
    }

    #[test]
    fn test_round_trip_babybear() {
        for num_coeffs in [1, 2, 3, 5, 6, 10, 12, 17, 24, 48, 100, 200] {
            assert_round_trip::<BabyBear>(num_coeffs, num_coeffs as u64);
        }
    }

    #[test]
    fn test_round_trip_koalabear() {
        for num_coeffs in [3, 100, 127, 200, 300] {
            assert_round_trip::<KoalaBear>(num_coeffs, num_coeffs as u64);
        }
    }

    #[test]
    fn test_round_trip_goldilocks() {
        for num_coeffs in [3, 10, 33, 96] {
            assert_round_trip::<Goldilocks>(num_coeffs, num_coeffs as u64);
        }
    }

    #[test]
    fn test_coset_fft_evaluates_at_shifted_points() {
        let mut rng = StdRng::seed_from_u64(42);
        let poly = random_poly::<F>(&mut rng, 20);
        let domain = MixedRadixEvaluationDomain::<F>::new(20)
            .unwrap()
            .get_coset(F::GENERATOR)
            .unwrap();
        assert_eq!(domain.size(), 24);

        let evals = domain.fft(&poly);
        let g = domain.group_gen();
        for (i, eval) in evals.evals().iter().enumerate() {
            let x = F::GENERATOR * g.exp_u64(i as u64);
            assert_eq!(*eval, poly.evaluate(&x));
            assert_eq!(x, domain.element(i));
        }
    }

    #[test]
    fn test_get_coset() {
        let domain = MixedRadixEvaluationDomain::<F>::new(12).unwrap();
        assert!(domain.get_coset(F::ZERO).is_none());

        let offset = F::from_u64(7);
        let coset = domain.get_coset(offset).unwrap();
        assert_eq!(coset.coset_offset(), offset);
        assert_eq!(coset.coset_offset() * coset.coset_offset_inv(), F::ONE);
        assert_eq!(coset.coset_offset_pow_size(), offset.exp_u64(12));
        assert_eq!(coset.group_gen(), domain.group_gen());
        assert_eq!(coset.size(), domain.size());
    }

    #[test]
    fn test_elements_and_vanishing_polynomial() {
        let domain = MixedRadixEvaluationDomain::<F>::new(24)
            .unwrap()
            .get_coset(F::from_u64(5))
            .unwrap();

        let elements: Vec<_> = domain.elements().collect();
        assert_eq!(elements.len(), 24);
        for (i, x) in elements.iter().enumerate() {
            assert_eq!(*x, domain.element(i));
            assert_eq!(domain.evaluate_vanishing_polynomial(*x), F::ZERO);
        }

        let mut distinct = elements;
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 24);

        assert_ne!(domain.evaluate_vanishing_polynomial(F::ONE), F::ZERO);
    }

    #[test]
    fn test_ifft_in_place_keeps_trailing_zeros() {
        let domain = MixedRadixEvaluationDomain::<F>::new(6).unwrap();
        let mut buf = vec![F::ONE, F::TWO];
        domain.fft_in_place(&mut buf);
        domain.ifft_in_place(&mut buf);

        let mut expected = vec![F::ZERO; 6];
        expected[0] = F::ONE;
        expected[1] = F::TWO;
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_short_evaluation_buffer_is_zero_padded() {
        // Evaluations missing at the tail are treated as zeros.
        let domain = MixedRadixEvaluationDomain::<F>::new(6).unwrap();
        let evals = UnivariateEvaluations::new(vec![F::ONE; 3]);
        let mut padded = vec![F::ONE; 3];
        padded.resize(6, F::ZERO);
        assert_eq!(
            domain.ifft(&evals),
            domain.ifft(&UnivariateEvaluations::new(padded))
        );
    }

    #[test]
    fn test_explicit_strategies_agree() {
        let mut rng = StdRng::seed_from_u64(9);
        let coeffs: Vec<F> = (0..40).map(|_| rng.random()).collect();
        let domain = MixedRadixEvaluationDomain::<F>::new(40)
            .unwrap()
            .get_coset(F::from_u64(3))
            .unwrap();
        assert_eq!(domain.factors(), PrimeFieldFactors::new(4, 1));

        let mut expected = coeffs.clone();
        domain.fft_in_place(&mut expected);

        for log_num_workers in 0..=4 {
            let strategy = FftStrategy::Parallel { log_num_workers };
            let mut evals = coeffs.clone();
            domain.fft_in_place_with(&mut evals, strategy);
            assert_eq!(evals, expected);

            domain.ifft_in_place_with(&mut evals, strategy);
            evals.truncate(coeffs.len());
            assert_eq!(evals, coeffs);
        }

        let mut evals = coeffs;
        domain.fft_in_place_with(&mut evals, FftStrategy::Serial);
        assert_eq!(evals, expected);
    }

    #[test]
    #[should_panic]
    fn test_parallel_strategy_beyond_two_adicity_is_fatal() {
        let domain = MixedRadixEvaluationDomain::<F>::new(12).unwrap();
        let mut buf = vec![F::ONE; 12];
        domain.fft_in_place_with(&mut buf, FftStrategy::Parallel { log_num_workers: 3 });
    }

    #[test]
    #[should_panic]
    fn test_fft_rejects_oversized_input() {
        let domain = MixedRadixEvaluationDomain::<F>::new(6).unwrap();
        let mut buf = vec![F::ONE; 7];
        domain.fft_in_place(&mut buf);
    }

    #[test]
    #[should_panic]
    fn test_inconsistent_factors_are_fatal() {
        let mut domain = MixedRadixEvaluationDomain::<F>::new(12).unwrap();
        domain.factors = PrimeFieldFactors::new(3, 1);
        let mut buf = vec![F::ONE; 12];
        domain.fft_in_place(&mut buf);
    }

    #[test]
    fn test_zero_polynomial() {
        let domain = MixedRadixEvaluationDomain::<F>::new(12).unwrap();
        let evals = domain.fft(&DensePolynomial::default());
        assert_eq!(evals.evals(), &[F::ZERO; 12]);
        assert!(domain.ifft(&evals).is_zero());
    }

    proptest! {
        #[test]
        fn prop_round_trip(num_coeffs in 0usize..400, offset in 1u32..1000, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let poly = random_poly::<F>(&mut rng, num_coeffs);
            let domain = MixedRadixEvaluationDomain::<F>::new(num_coeffs)
                .unwrap()
                .get_coset(F::from_u32(offset))
                .unwrap();
            prop_assert_eq!(domain.ifft(&domain.fft(&poly)), poly);
        }
    }
}
