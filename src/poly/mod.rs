//! Univariate polynomial containers in coefficient and evaluation form.

pub mod dense;
pub mod evals;

pub use dense::DensePolynomial;
pub use evals::UnivariateEvaluations;
