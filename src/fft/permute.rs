/// Index permutation applied before a mixed-radix decimation-in-time FFT.
///
/// The permutation is the one obtained by splitting into 2 groups `two_adicity` times
/// and then into `q` groups `q_adicity` times. Writing
///
/// ```text
/// i = 2⁰·b₀ + 2¹·b₁ + … + 2ˢ⁻¹·bₛ₋₁ + 2ˢ·(q⁰·x₀ + q¹·x₁ + … + qᵗ⁻¹·xₜ₋₁)
/// ```
///
/// with `s = two_adicity` and `t = q_adicity`, the result is
///
/// ```text
/// j = b₀·(n/2) + b₁·(n/2²) + … + bₛ₋₁·(n/2ˢ) + x₀·(n/(2ˢ·q)) + … + xₜ₋₁·(n/(2ˢ·qᵗ))
/// ```
///
/// For `t = 0` this is the usual bit reversal. For `t > 0` it is a bijection on
/// `[0, n)` but not an involution.
#[must_use]
pub const fn mixed_radix_fft_permute(
    two_adicity: u32,
    q_adicity: u32,
    q: u64,
    n: usize,
    mut i: usize,
) -> usize {
    let q = q as usize;
    let mut res = 0;
    let mut shift = n;

    let mut j = 0;
    while j < two_adicity {
        shift /= 2;
        res += (i % 2) * shift;
        i /= 2;
        j += 1;
    }

    let mut j = 0;
    while j < q_adicity {
        shift /= q;
        res += (i % q) * shift;
        i /= q;
        j += 1;
    }

    res
}
