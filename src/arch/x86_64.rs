//! x86_64 widening-sum kernels using SSE4.1, AVX2 and AVX-512F.
//!
//! These functions are unsafe and require runtime feature detection
//! before calling. The safe dispatch in [`crate::kernel`] handles this.
//!
//! Every kernel has the same shape: sign-extend each i32 lane to i64
//! (`vpmovsxdq`), add into two i64 accumulators (low and high half of the
//! loaded register), then reduce horizontally. Each returns
//! `(partial_sum, consumed)`; the caller sums `values[consumed..]`.
//!
//! | ISA | i32 per step | i64 accumulators |
//! |-----|--------------|------------------|
//! | AVX-512F | 16 | 2 x `__m512i` |
//! | AVX2 | 8 | 2 x `__m256i` |
//! | SSE4.1 | 4 | 2 x `__m128i` |

/// SSE4.1 widening sum, 4 elements per step.
///
/// # Safety
///
/// Caller must verify `is_x86_feature_detected!("sse4.1")` before calling.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.1")]
pub unsafe fn widening_sum_sse41(values: &[i32]) -> (i64, usize) {
    use std::arch::x86_64::{
        __m128i, _mm_add_epi64, _mm_cvtepi32_epi64, _mm_cvtsi128_si64, _mm_loadu_si128,
        _mm_setzero_si128, _mm_srli_si128, _mm_unpackhi_epi64,
    };

    const LANES: usize = 4;

    let n = values.len();
    if n < LANES {
        return (0, 0);
    }

    let ptr = values.as_ptr();
    let last = n - LANES;
    let mut lo: __m128i = _mm_setzero_si128();
    let mut hi: __m128i = _mm_setzero_si128();

    let mut i = 0;
    while i <= last {
        let v = _mm_loadu_si128(ptr.add(i) as *const __m128i);
        lo = _mm_add_epi64(lo, _mm_cvtepi32_epi64(v));
        hi = _mm_add_epi64(hi, _mm_cvtepi32_epi64(_mm_srli_si128(v, 8)));
        i += LANES;
    }

    let s = _mm_add_epi64(lo, hi);
    let sum = _mm_cvtsi128_si64(s) + _mm_cvtsi128_si64(_mm_unpackhi_epi64(s, s));

    (sum, i)
}

/// AVX2 widening sum, 8 elements per step.
///
/// # Safety
///
/// Caller must verify `is_x86_feature_detected!("avx2")` before calling.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn widening_sum_avx2(values: &[i32]) -> (i64, usize) {
    use std::arch::x86_64::{
        __m256i, _mm256_add_epi64, _mm256_castsi256_si128, _mm256_cvtepi32_epi64,
        _mm256_extracti128_si256, _mm256_loadu_si256, _mm256_setzero_si256, _mm_add_epi64,
        _mm_cvtsi128_si64, _mm_unpackhi_epi64,
    };

    const LANES: usize = 8;

    let n = values.len();
    if n < LANES {
        return (0, 0);
    }

    let ptr = values.as_ptr();
    let last = n - LANES;
    let mut lo: __m256i = _mm256_setzero_si256();
    let mut hi: __m256i = _mm256_setzero_si256();

    let mut i = 0;
    while i <= last {
        let v = _mm256_loadu_si256(ptr.add(i) as *const __m256i);
        lo = _mm256_add_epi64(lo, _mm256_cvtepi32_epi64(_mm256_castsi256_si128(v)));
        hi = _mm256_add_epi64(hi, _mm256_cvtepi32_epi64(_mm256_extracti128_si256(v, 1)));
        i += LANES;
    }

    // Horizontal reduction: 4 lanes -> 2 -> 1
    let s = _mm256_add_epi64(lo, hi);
    let s128 = _mm_add_epi64(_mm256_castsi256_si128(s), _mm256_extracti128_si256(s, 1));
    let sum = _mm_cvtsi128_si64(s128) + _mm_cvtsi128_si64(_mm_unpackhi_epi64(s128, s128));

    (sum, i)
}

/// AVX-512F widening sum, 16 elements per step.
///
/// # Safety
///
/// Caller must verify `is_x86_feature_detected!("avx512f")` before calling.
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
#[target_feature(enable = "avx512f")]
pub unsafe fn widening_sum_avx512(values: &[i32]) -> (i64, usize) {
    use std::arch::x86_64::{
        __m256i, __m512i, _mm256_loadu_si256, _mm512_add_epi64, _mm512_cvtepi32_epi64,
        _mm512_reduce_add_epi64, _mm512_setzero_si512,
    };

    const LANES: usize = 16;

    let n = values.len();
    if n < LANES {
        return (0, 0);
    }

    let ptr = values.as_ptr();
    let last = n - LANES;
    let mut lo: __m512i = _mm512_setzero_si512();
    let mut hi: __m512i = _mm512_setzero_si512();

    let mut i = 0;
    while i <= last {
        let p = ptr.add(i) as *const __m256i;
        lo = _mm512_add_epi64(lo, _mm512_cvtepi32_epi64(_mm256_loadu_si256(p)));
        hi = _mm512_add_epi64(hi, _mm512_cvtepi32_epi64(_mm256_loadu_si256(p.add(1))));
        i += LANES;
    }

    (_mm512_reduce_add_epi64(_mm512_add_epi64(lo, hi)), i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(values: &[i32], consumed: usize) -> i64 {
        values[..consumed].iter().map(|&x| i64::from(x)).sum()
    }

    fn pattern(size: usize) -> Vec<i32> {
        (0..size)
            .map(|i| {
                let x = (i as i64 * 2_654_435_761) % (i32::MAX as i64);
                if i % 3 == 0 {
                    -(x as i32)
                } else {
                    x as i32
                }
            })
            .collect()
    }

    #[test]
    fn test_widening_sum_sse41_correctness() {
        if !is_x86_feature_detected!("sse4.1") {
            eprintln!("SSE4.1 not available, skipping test");
            return;
        }

        for size in [0, 1, 3, 4, 5, 7, 8, 9, 15, 16, 17, 100, 1023] {
            let v = pattern(size);
            let (sum, consumed) = unsafe { widening_sum_sse41(&v) };
            assert_eq!(consumed, size - size % 4, "size={}", size);
            assert_eq!(sum, reference(&v, consumed), "size={}", size);
        }
    }

    #[test]
    fn test_widening_sum_avx2_correctness() {
        if !is_x86_feature_detected!("avx2") {
            eprintln!("AVX2 not available, skipping test");
            return;
        }

        for size in [0, 1, 7, 8, 9, 15, 16, 17, 31, 32, 33, 1000] {
            let v = pattern(size);
            let (sum, consumed) = unsafe { widening_sum_avx2(&v) };
            assert_eq!(consumed, size - size % 8, "size={}", size);
            assert_eq!(sum, reference(&v, consumed), "size={}", size);
        }
    }

    #[test]
    #[cfg(feature = "avx512")]
    fn test_widening_sum_avx512_correctness() {
        if !is_x86_feature_detected!("avx512f") {
            eprintln!("AVX-512F not available, skipping test");
            return;
        }

        for size in [0, 1, 15, 16, 17, 31, 32, 33, 63, 64, 65, 1000] {
            let v = pattern(size);
            let (sum, consumed) = unsafe { widening_sum_avx512(&v) };
            assert_eq!(consumed, size - size % 16, "size={}", size);
            assert_eq!(sum, reference(&v, consumed), "size={}", size);
        }
    }

    #[test]
    fn test_max_magnitude_no_overflow() {
        if !is_x86_feature_detected!("avx2") {
            eprintln!("AVX2 not available, skipping test");
            return;
        }

        let v = vec![i32::MIN; 4096];
        let (sum, consumed) = unsafe { widening_sum_avx2(&v) };
        assert_eq!(consumed, 4096);
        assert_eq!(sum, i64::from(i32::MIN) * 4096);
    }
}
