//! aarch64 widening-sum kernel using NEON.
//!
//! NEON is always available on aarch64, so no runtime detection needed.
//! However, we still use target_feature for consistency with x86_64.

/// NEON widening sum, 4 elements per step.
///
/// `saddw`/`saddw2` sign-extend the low and high i32 pairs straight into
/// two i64x2 accumulators. Returns `(partial_sum, consumed)`.
///
/// # Safety
///
/// NEON is always available on aarch64; the `unsafe` comes from the
/// `target_feature` annotation and raw loads.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn widening_sum_neon(values: &[i32]) -> (i64, usize) {
    use std::arch::aarch64::{
        int64x2_t, vaddq_s64, vaddvq_s64, vaddw_high_s32, vaddw_s32, vdupq_n_s64, vget_low_s32,
        vld1q_s32,
    };

    const LANES: usize = 4;

    let n = values.len();
    if n < LANES {
        return (0, 0);
    }

    let ptr = values.as_ptr();
    let last = n - LANES;
    let mut lo: int64x2_t = vdupq_n_s64(0);
    let mut hi: int64x2_t = vdupq_n_s64(0);

    let mut i = 0;
    while i <= last {
        let v = vld1q_s32(ptr.add(i));
        lo = vaddw_s32(lo, vget_low_s32(v));
        hi = vaddw_high_s32(hi, v);
        i += LANES;
    }

    (vaddvq_s64(vaddq_s64(lo, hi)), i)
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(target_arch = "aarch64")]
    fn test_widening_sum_neon_correctness() {
        use super::*;

        for size in [0, 1, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 32, 33, 64, 1000] {
            let v: Vec<i32> = (0..size)
                .map(|i| if i % 2 == 0 { i32::MAX - i } else { i32::MIN + i })
                .collect();

            let (sum, consumed) = unsafe { widening_sum_neon(&v) };
            let expected: i64 = v[..consumed].iter().map(|&x| i64::from(x)).sum();

            assert_eq!(consumed, size as usize - size as usize % 4, "size={}", size);
            assert_eq!(sum, expected, "size={}", size);
        }
    }
}
