//! Error types for evaluation domain construction.

use thiserror::Error;

/// Reasons a domain cannot be built for a requested number of coefficients.
///
/// These are capability errors: the request is well-formed but the field cannot
/// host a domain that large. Internal invariant violations panic instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// The field does not define a small subgroup to combine with the two-adic one.
    #[error("field has no large subgroup root of unity")]
    NoLargeSubgroup,

    /// No `base^i * 2^j` within the field's adicity bounds covers the request.
    #[error("no mixed-radix domain can hold {num_coeffs} coefficients")]
    NotRepresentable {
        /// Requested number of coefficients.
        num_coeffs: usize,
    },

    /// The selected size is larger than the largest supported domain.
    #[error("domain size {size} exceeds the maximum degree {max_degree} plus one")]
    ExceedsMaxDegree {
        /// Selected domain size.
        size: u64,
        /// Largest representable polynomial degree.
        max_degree: u64,
    },

    /// The field rejected the selected size when splitting it into radix factors.
    #[error("domain size {size} does not decompose over the field's subgroups")]
    Decomposition {
        /// Selected domain size.
        size: u64,
    },
}
