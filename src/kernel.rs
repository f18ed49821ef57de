//! Widening reduction kernels and the scalar remainder pass.
//!
//! Every tier runs the same algorithm: take `LANES` i32 values per step,
//! sign-extend each to i64, add lane-wise into an i64 accumulator, then sum
//! the accumulator lanes. Elements that do not fill a final step are added
//! one by one afterwards.
//!
//! # Exactness
//!
//! Each term is bounded by 2^31 in magnitude, so any sum of fewer than 2^32
//! terms fits in an i64. Lane order therefore cannot change the result and
//! every tier produces the same total bit for bit.
//!
//! # Dispatch
//!
//! A selected width runs its intrinsic kernel only if the *host* has the
//! instructions; otherwise (for example under an injected [`Capabilities`]
//! that claims more than the CPU offers) it runs [`widening_sum_lanes`] with
//! the same lane count.

// arch is only used on architectures with SIMD dispatch
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use crate::arch;
use crate::capability::{select_lane_width, Capabilities, LaneWidth};

/// Portable widening reduction over `LANES`-element steps.
///
/// Returns `(partial_sum, consumed)` where `consumed` is the largest multiple
/// of `LANES` not exceeding `values.len()`. LLVM usually vectorizes the inner
/// loop on its own.
///
/// # Panics
///
/// Panics if `LANES == 0`.
#[inline]
#[must_use]
pub fn widening_sum_lanes<const LANES: usize>(values: &[i32]) -> (i64, usize) {
    let chunks = values.chunks_exact(LANES);
    let consumed = values.len() - chunks.remainder().len();

    let mut acc = [0_i64; LANES];
    for chunk in chunks {
        for (lane, &x) in acc.iter_mut().zip(chunk) {
            *lane += i64::from(x);
        }
    }

    (acc.iter().sum(), consumed)
}

/// Run the reduction kernel for `width`.
///
/// Returns `(partial_sum, consumed)`; [`LaneWidth::None`] consumes nothing.
#[inline]
pub(crate) fn reduce(values: &[i32], width: LaneWidth) -> (i64, usize) {
    match width {
        LaneWidth::None => (0, 0),
        LaneWidth::W128 => reduce_w128(values),
        LaneWidth::W256 => reduce_w256(values),
        LaneWidth::W512 => reduce_w512(values),
    }
}

fn reduce_w128(values: &[i32]) -> (i64, usize) {
    #[cfg(target_arch = "x86_64")]
    {
        if Capabilities::host().w128 {
            // SAFETY: SSE4.1 verified via runtime detection.
            return unsafe { arch::x86_64::widening_sum_sse41(values) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        // SAFETY: NEON is always available on aarch64.
        return unsafe { arch::aarch64::widening_sum_neon(values) };
    }

    #[allow(unreachable_code)]
    widening_sum_lanes::<4>(values)
}

fn reduce_w256(values: &[i32]) -> (i64, usize) {
    #[cfg(target_arch = "x86_64")]
    {
        if Capabilities::host().w256 {
            // SAFETY: AVX2 verified via runtime detection.
            return unsafe { arch::x86_64::widening_sum_avx2(values) };
        }
    }

    widening_sum_lanes::<8>(values)
}

fn reduce_w512(values: &[i32]) -> (i64, usize) {
    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
    {
        if Capabilities::host().w512 {
            // SAFETY: AVX-512F verified via runtime detection.
            return unsafe { arch::x86_64::widening_sum_avx512(values) };
        }
    }

    widening_sum_lanes::<16>(values)
}

/// Scalar remainder pass: plain sequential i64 sum.
#[inline]
#[must_use]
pub fn scalar_sum(values: &[i32]) -> i64 {
    values.iter().map(|&x| i64::from(x)).sum()
}

/// Exact i64 sum of `values`, using the widest tier the host supports.
///
/// Returns 0 for an empty slice.
///
/// # Example
///
/// ```rust
/// use avgr::widening_sum;
///
/// let v = vec![i32::MAX; 1000];
/// assert_eq!(widening_sum(&v), i64::from(i32::MAX) * 1000);
/// ```
#[inline]
#[must_use]
pub fn widening_sum(values: &[i32]) -> i64 {
    let width = select_lane_width(Capabilities::host(), values.len());
    sum_with_width(values, width)
}

/// Exact i64 sum of `values` using the `width` tier.
///
/// The tier only runs when the input holds at least one full step; shorter
/// inputs go entirely through the scalar pass.
#[inline]
#[must_use]
pub fn widening_sum_at(values: &[i32], width: LaneWidth) -> i64 {
    let width = if values.len() >= width.lanes() {
        width
    } else {
        LaneWidth::None
    };
    sum_with_width(values, width)
}

/// Kernel for `width` followed by the scalar pass over what it left.
#[inline]
pub(crate) fn sum_with_width(values: &[i32], width: LaneWidth) -> i64 {
    let (partial, consumed) = reduce(values, width);
    partial + scalar_sum(&values[consumed..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(values: &[i32]) -> i128 {
        values.iter().map(|&x| i128::from(x)).sum()
    }

    #[test]
    fn test_lanes_consumed_boundary() {
        for len in [0, 3, 4, 5, 7, 8, 9] {
            let v: Vec<i32> = (1..=len).collect();
            let (sum, consumed) = widening_sum_lanes::<4>(&v);
            assert_eq!(consumed, (len as usize / 4) * 4, "len={}", len);
            assert_eq!(i128::from(sum), exact(&v[..consumed]));
        }
    }

    #[test]
    fn test_reduce_none_consumes_nothing() {
        let v = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(reduce(&v, LaneWidth::None), (0, 0));
        assert_eq!(widening_sum_at(&v, LaneWidth::None), 36);
    }

    #[test]
    fn test_reduce_matches_portable_every_width() {
        let v: Vec<i32> = (0..1037).map(|i| (i * 7919 - 400_000) as i32).collect();
        assert_eq!(reduce(&v, LaneWidth::W128), widening_sum_lanes::<4>(&v));
        assert_eq!(reduce(&v, LaneWidth::W256), widening_sum_lanes::<8>(&v));
        assert_eq!(reduce(&v, LaneWidth::W512), widening_sum_lanes::<16>(&v));
    }

    #[test]
    fn test_remainder_always_added() {
        // 17 elements at 16 lanes: one step plus a single tail element
        let mut v = vec![1_i32; 16];
        v.push(-100);
        assert_eq!(widening_sum_at(&v, LaneWidth::W512), 16 - 100);
    }

    #[test]
    fn test_short_input_degrades_to_scalar() {
        let v = [i32::MIN, i32::MIN, i32::MIN];
        for width in LaneWidth::ACCELERATED {
            assert_eq!(widening_sum_at(&v, width), 3 * i64::from(i32::MIN));
        }
    }

    #[test]
    fn test_widening_sum_empty() {
        assert_eq!(widening_sum(&[]), 0);
        assert_eq!(scalar_sum(&[]), 0);
    }

    #[test]
    fn test_widening_sum_extremes_exact() {
        let v: Vec<i32> = (0..100_000)
            .map(|i| if i % 2 == 0 { i32::MAX } else { i32::MIN })
            .collect();
        assert_eq!(i128::from(widening_sum(&v)), exact(&v));
        assert_eq!(widening_sum(&v), -50_000);
    }
}
