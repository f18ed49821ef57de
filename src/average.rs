//! Arithmetic mean of i32 sequences.
//!
//! The total is computed exactly in i64 (see the kernel module) and divided
//! once at the end, so every entry point here returns the same `f64` for the
//! same input regardless of which lane width ran.
//!
//! | Entry point | Lane width |
//! |-------------|------------|
//! | [`average`] | widest the host supports |
//! | [`average_with`] | widest an injected [`Capabilities`] allows |
//! | [`average_at`] | forced tier |
//! | [`average_portable`] | scalar only |

use crate::capability::{select_lane_width, Capabilities, LaneWidth};
use crate::error::{AverageError, Result};
use crate::kernel::{scalar_sum, sum_with_width};

/// Arithmetic mean of `values`.
///
/// Returns [`AverageError::EmptyInput`] for an empty slice.
///
/// # SIMD Acceleration
///
/// Automatically dispatches to (in order of preference):
/// - AVX-512F on x86_64 (runtime detection, n >= 16)
/// - AVX2 on x86_64 (runtime detection, n >= 8)
/// - SSE4.1 on x86_64 (runtime detection, n >= 4) or NEON on aarch64 (n >= 4)
/// - Scalar otherwise
///
/// # Precision
///
/// The sum is exact. Only the final `sum as f64 / len as f64` rounds, so
/// sums beyond 2^53 in magnitude lose low bits in the quotient.
///
/// # Example
///
/// ```rust
/// use avgr::{average, AverageError};
///
/// assert_eq!(average(&[1, 2, 3, 4, 5]), Ok(3.0));
/// assert_eq!(average(&[-10, 10]), Ok(0.0));
/// assert_eq!(average(&[]), Err(AverageError::EmptyInput));
/// ```
#[inline]
pub fn average(values: &[i32]) -> Result<f64> {
    average_with(values, Capabilities::host())
}

/// Arithmetic mean of `values` with an injected capability descriptor.
///
/// The width is picked once by [`select_lane_width`] and never changes
/// during the pass.
///
/// # Example
///
/// ```rust
/// use avgr::{average_with, Capabilities};
///
/// let v: Vec<i32> = (1..=100).collect();
/// let scalar = average_with(&v, &Capabilities::none()).unwrap();
/// let wide = average_with(&v, &Capabilities::new(true, true, true)).unwrap();
/// assert_eq!(scalar, 50.5);
/// assert_eq!(scalar.to_bits(), wide.to_bits());
/// ```
#[inline]
pub fn average_with(values: &[i32], caps: &Capabilities) -> Result<f64> {
    check_non_empty(values)?;
    let width = select_lane_width(caps, values.len());
    log::trace!("avgr: average of {} elements, {} lanes", values.len(), width);
    Ok(finalize(sum_with_width(values, width), values.len()))
}

/// Arithmetic mean of `values` using the `width` tier.
///
/// Inputs shorter than one step of `width` fall back to the scalar pass.
///
/// # Example
///
/// ```rust
/// use avgr::{average_at, LaneWidth};
///
/// let v = [7; 33];
/// assert_eq!(average_at(&v, LaneWidth::W512), Ok(7.0));
/// ```
#[inline]
pub fn average_at(values: &[i32], width: LaneWidth) -> Result<f64> {
    let caps = Capabilities::new(
        width == LaneWidth::W128,
        width == LaneWidth::W256,
        width == LaneWidth::W512,
    );
    average_with(values, &caps)
}

/// Scalar-only arithmetic mean.
#[inline]
pub fn average_portable(values: &[i32]) -> Result<f64> {
    check_non_empty(values)?;
    Ok(finalize(scalar_sum(values), values.len()))
}

#[inline]
fn check_non_empty(values: &[i32]) -> Result<()> {
    if values.is_empty() {
        return Err(AverageError::EmptyInput);
    }
    Ok(())
}

/// Divide the exact total by the element count.
#[inline]
fn finalize(sum: i64, len: usize) -> f64 {
    sum as f64 / len as f64
}
