use alloc::vec::Vec;

use p3_field::Field;

use super::dense::DensePolynomial;
use crate::domain::GeneralEvaluationDomain;

/// Evaluations of a univariate polynomial over the points of an evaluation domain,
/// in domain order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnivariateEvaluations<F> {
    evals: Vec<F>,
}

impl<F> Default for UnivariateEvaluations<F> {
    fn default() -> Self {
        Self { evals: Vec::new() }
    }
}

impl<F: Field> UnivariateEvaluations<F> {
    #[must_use]
    pub const fn new(evals: Vec<F>) -> Self {
        Self { evals }
    }

    #[must_use]
    pub fn evals(&self) -> &[F] {
        &self.evals
    }

    #[must_use]
    pub fn into_evals(self) -> Vec<F> {
        self.evals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.evals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evals.is_empty()
    }

    /// Recovers the polynomial of degree `< domain.size()` taking these values over
    /// `domain`.
    #[must_use]
    pub fn interpolate(&self, domain: &GeneralEvaluationDomain<F>) -> DensePolynomial<F> {
        domain.ifft(self)
    }
}
