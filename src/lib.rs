//! Exact, SIMD-accelerated arithmetic mean of 32-bit integers.
//!
//! `avgr` (from "average") sums an `&[i32]` in 64-bit integer lanes, using the
//! widest vector unit the CPU offers, and divides once at the end:
//!
//! - **Mean**: [`average`], [`average_with`], [`average_at`], [`average_portable`]
//! - **Exact sum**: [`widening_sum`], [`widening_sum_at`], [`widening_sum_lanes`]
//! - **Dispatch**: [`LaneWidth`], [`Capabilities`], [`select_lane_width`]
//!
//! # SIMD Dispatch
//!
//! The lane width is chosen once per call from a capability descriptor and
//! the input length:
//!
//! | Architecture | Instructions | Detection |
//! |--------------|--------------|-----------|
//! | x86_64 | AVX-512F / AVX2 / SSE4.1 | Runtime, cached per process |
//! | aarch64 | NEON | Always available |
//! | Other | Scalar | - |
//!
//! A tier is only used when the input holds at least one full step
//! ([`LaneWidth::lanes`] elements). Leftover elements go through a scalar
//! pass into the same i64 total.
//!
//! # Exactness
//!
//! Each i32 is sign-extended to i64 before it is added, so no partial sum
//! can overflow for inputs shorter than 2^32 elements. All tiers therefore
//! return bit-identical results; only the final division rounds.
//!
//! # Example
//!
//! ```rust
//! use avgr::{average, average_at, AverageError, LaneWidth};
//!
//! assert_eq!(average(&[1, 2, 3, 4, 5]), Ok(3.0));
//! assert_eq!(average(&[i32::MAX, i32::MAX]), Ok(2147483647.0));
//! assert_eq!(average(&[]), Err(AverageError::EmptyInput));
//!
//! // Force a tier; the answer does not change.
//! let v: Vec<i32> = (0..1000).collect();
//! assert_eq!(average_at(&v, LaneWidth::W256), average_at(&v, LaneWidth::None));
//! ```
//!
//! # Logging
//!
//! Host detection is reported at `debug` level and each call's chosen width at
//! `trace` level through the [`log`] facade. Nothing is printed unless the
//! application installs a logger.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arch;
mod average;
mod capability;
mod error;
mod kernel;

pub use average::{average, average_at, average_portable, average_with};
pub use capability::{select_lane_width, Capabilities, LaneWidth};
pub use error::{AverageError, Result};
pub use kernel::{scalar_sum, widening_sum, widening_sum_at, widening_sum_lanes};
