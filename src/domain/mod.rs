//! Evaluation domains: multiplicative subgroups (optionally shifted by a coset offset)
//! over which polynomials are evaluated and interpolated with FFTs.
//!
//! - [`Radix2EvaluationDomain`]: subgroups of order `2^s`.
//! - [`MixedRadixEvaluationDomain`]: subgroups of order `q^t * 2^s`, sized by
//!   [`DomainSizer`].
//! - [`GeneralEvaluationDomain`]: radix-2 when possible, mixed-radix otherwise.

pub mod general;
pub mod mixed_radix;
pub mod radix2;
pub mod sizer;
pub mod utils;

pub use general::GeneralEvaluationDomain;
pub use mixed_radix::MixedRadixEvaluationDomain;
pub use radix2::Radix2EvaluationDomain;
pub use sizer::DomainSizer;
