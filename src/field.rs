//! Small-subgroup capabilities for FFT-friendly prime fields.
//!
//! Plonky3's [`TwoAdicField`] only exposes the power-of-two part of the multiplicative
//! group. Fields whose two-adicity is too small for a given polynomial degree can still
//! support FFTs if `p - 1` has another small prime factor `q`: combining the `2^s`
//! subgroup with a `q^t` subgroup yields a "large subgroup" of order `q^t * 2^s`.
//!
//! [`MixedRadixField`] describes that extra structure.

use p3_baby_bear::BabyBear;
use p3_field::{PrimeField64, TwoAdicField};
use p3_goldilocks::Goldilocks;
use p3_koala_bear::KoalaBear;

/// Decomposition of a domain size `n = q^q_adicity * 2^two_adicity`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PrimeFieldFactors {
    /// Exponent of the power-of-two factor.
    pub two_adicity: u32,
    /// Exponent of the small-subgroup base factor.
    pub q_adicity: u32,
}

impl PrimeFieldFactors {
    #[must_use]
    pub const fn new(two_adicity: u32, q_adicity: u32) -> Self {
        Self {
            two_adicity,
            q_adicity,
        }
    }

    /// Factors of the power-of-two size `2^two_adicity`.
    #[must_use]
    pub const fn radix2(two_adicity: u32) -> Self {
        Self::new(two_adicity, 0)
    }

    /// Returns `q^q_adicity * 2^two_adicity`, or `None` on overflow.
    #[must_use]
    pub const fn size(&self, q: u64) -> Option<u64> {
        let Some(q_part) = q.checked_pow(self.q_adicity) else {
            return None;
        };
        let Some(two_part) = 1u64.checked_shl(self.two_adicity) else {
            return None;
        };
        q_part.checked_mul(two_part)
    }
}

/// Returns the largest `r` such that `k^r` divides `n`.
///
/// By convention `k_adicity(k, 0) == 0`.
#[must_use]
pub const fn k_adicity(k: u64, mut n: u64) -> u32 {
    assert!(k >= 2, "adicity base must be at least 2");
    let mut r = 0;
    while n > 1 && n % k == 0 {
        n /= k;
        r += 1;
    }
    r
}

/// A two-adic field that may additionally expose a small multiplicative subgroup of
/// order `SMALL_SUBGROUP_BASE^SMALL_SUBGROUP_BASE_ADICITY`.
///
/// A field that leaves both constants as `None` only supports radix-2 domains.
pub trait MixedRadixField: TwoAdicField {
    /// Prime `q` such that the multiplicative group has a subgroup of order `q^k`.
    const SMALL_SUBGROUP_BASE: Option<u64> = None;

    /// The largest `k` for which a subgroup of order `SMALL_SUBGROUP_BASE^k` exists.
    const SMALL_SUBGROUP_BASE_ADICITY: Option<u32> = None;

    /// An element of multiplicative order exactly
    /// `SMALL_SUBGROUP_BASE^SMALL_SUBGROUP_BASE_ADICITY * 2^TWO_ADICITY`.
    fn large_subgroup_root_of_unity() -> Option<Self> {
        None
    }

    /// Whether mixed-radix domains can be built over this field at all.
    fn has_large_subgroup_root_of_unity() -> bool {
        Self::SMALL_SUBGROUP_BASE.is_some()
            && Self::SMALL_SUBGROUP_BASE_ADICITY.is_some()
            && Self::large_subgroup_root_of_unity().is_some()
    }

    /// Splits `n` into `q^t * 2^s`.
    ///
    /// Returns `None` if `n` has any other prime factor, or if `s` or `t` exceed the
    /// field's bounds.
    fn decompose(n: u64) -> Option<PrimeFieldFactors> {
        let q = Self::SMALL_SUBGROUP_BASE?;
        let max_q_adicity = Self::SMALL_SUBGROUP_BASE_ADICITY?;

        let factors = PrimeFieldFactors::new(k_adicity(2, n), k_adicity(q, n));
        if factors.size(q)? != n {
            return None;
        }
        if factors.two_adicity as usize > Self::TWO_ADICITY || factors.q_adicity > max_q_adicity {
            return None;
        }
        Some(factors)
    }

    /// Returns a primitive `n`-th root of unity inside the large subgroup.
    fn mixed_radix_root_of_unity(n: u64) -> Option<Self> {
        let factors = Self::decompose(n)?;
        let q = Self::SMALL_SUBGROUP_BASE?;
        let max_q_adicity = Self::SMALL_SUBGROUP_BASE_ADICITY?;

        let mut omega = Self::large_subgroup_root_of_unity()?;
        for _ in factors.q_adicity..max_q_adicity {
            omega = omega.exp_u64(q);
        }
        for _ in factors.two_adicity as usize..Self::TWO_ADICITY {
            omega = omega.square();
        }
        Some(omega)
    }
}

/// `GENERATOR^((p - 1) / order)`, an element of order exactly `order` when
/// `GENERATOR` generates the full multiplicative group.
fn root_of_unity_of_order<F: PrimeField64>(order: u64) -> F {
    debug_assert_eq!((F::ORDER_U64 - 1) % order, 0);
    F::GENERATOR.exp_u64((F::ORDER_U64 - 1) / order)
}

// p - 1 = 2^27 * 3 * 5
impl MixedRadixField for BabyBear {
    const SMALL_SUBGROUP_BASE: Option<u64> = Some(3);
    const SMALL_SUBGROUP_BASE_ADICITY: Option<u32> = Some(1);

    fn large_subgroup_root_of_unity() -> Option<Self> {
        Some(root_of_unity_of_order(3 << Self::TWO_ADICITY))
    }
}

// p - 1 = 2^24 * 127
impl MixedRadixField for KoalaBear {
    const SMALL_SUBGROUP_BASE: Option<u64> = Some(127);
    const SMALL_SUBGROUP_BASE_ADICITY: Option<u32> = Some(1);

    fn large_subgroup_root_of_unity() -> Option<Self> {
        Some(root_of_unity_of_order(127 << Self::TWO_ADICITY))
    }
}

// p - 1 = 2^32 * 3 * 5 * 17 * 257 * 65537
impl MixedRadixField for Goldilocks {
    const SMALL_SUBGROUP_BASE: Option<u64> = Some(3);
    const SMALL_SUBGROUP_BASE_ADICITY: Option<u32> = Some(1);

    fn large_subgroup_root_of_unity() -> Option<Self> {
        Some(root_of_unity_of_order(3 << Self::TWO_ADICITY))
    }
}
