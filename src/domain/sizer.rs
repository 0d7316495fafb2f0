use crate::{
    errors::DomainError,
    field::{MixedRadixField, PrimeFieldFactors},
};

/// Picks the size of a mixed-radix domain for a requested number of coefficients.
///
/// Candidate sizes have the form `base^i * 2^j` with `i <= max_base_adicity` and
/// `j <= max_two_adicity`, and may not exceed `max_degree + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainSizer {
    /// Small subgroup base `q`.
    pub base: u64,
    /// Largest usable exponent of `base`.
    pub max_base_adicity: u32,
    /// Largest usable exponent of 2.
    pub max_two_adicity: u32,
    /// Largest polynomial degree a domain may be built for.
    pub max_degree: u64,
}

impl DomainSizer {
    /// A sizer whose degree bound is the full large subgroup `base^i_max * 2^j_max`.
    #[must_use]
    pub fn new(base: u64, max_base_adicity: u32, max_two_adicity: u32) -> Self {
        let max_degree = PrimeFieldFactors::new(max_two_adicity, max_base_adicity)
            .size(base)
            .map_or(u64::MAX, |order| order - 1);
        Self {
            base,
            max_base_adicity,
            max_two_adicity,
            max_degree,
        }
    }

    /// The sizer matching the capabilities of `F`, or `None` if `F` has no small
    /// subgroup.
    #[must_use]
    pub fn for_field<F: MixedRadixField>() -> Option<Self> {
        if !F::has_large_subgroup_root_of_unity() {
            return None;
        }
        Some(Self::new(
            F::SMALL_SUBGROUP_BASE?,
            F::SMALL_SUBGROUP_BASE_ADICITY?,
            F::TWO_ADICITY as u32,
        ))
    }

    /// Lowers the degree bound to `max_degree` if it is tighter than the current one.
    #[must_use]
    pub const fn with_max_degree(mut self, max_degree: u64) -> Self {
        if max_degree < self.max_degree {
            self.max_degree = max_degree;
        }
        self
    }

    /// Smallest `base^i * 2^j >= min_size` within the adicity bounds.
    ///
    /// Ignores the degree bound.
    #[must_use]
    pub fn best_size(&self, min_size: u64) -> Option<u64> {
        (0..=self.max_base_adicity)
            .filter_map(|i| {
                let mut r = self.base.checked_pow(i)?;
                let mut two_adicity = 0;
                while r < min_size {
                    r = r.checked_mul(2)?;
                    two_adicity += 1;
                }
                (two_adicity <= self.max_two_adicity).then_some(r)
            })
            .min()
    }

    /// Selects the domain size for `num_coeffs` coefficients and splits it into its
    /// radix factors using `F`.
    pub fn size_and_factors<F: MixedRadixField>(
        &self,
        num_coeffs: usize,
    ) -> Result<(usize, PrimeFieldFactors), DomainError> {
        let size = self
            .best_size(num_coeffs as u64)
            .ok_or(DomainError::NotRepresentable { num_coeffs })?;
        if size > self.max_degree.saturating_add(1) {
            return Err(DomainError::ExceedsMaxDegree {
                size,
                max_degree: self.max_degree,
            });
        }
        let factors = F::decompose(size).ok_or(DomainError::Decomposition { size })?;
        let size = usize::try_from(size).map_err(|_| DomainError::NotRepresentable { num_coeffs })?;
        Ok((size, factors))
    }

    /// Whether [`Self::size_and_factors`] succeeds for `num_coeffs`.
    #[must_use]
    pub fn is_valid<F: MixedRadixField>(&self, num_coeffs: usize) -> bool {
        self.size_and_factors::<F>(num_coeffs).is_ok()
    }
}
