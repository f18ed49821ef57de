//! Lane-width capability detection and selection.
//!
//! A [`Capabilities`] descriptor says which vector widths can be used for
//! 32-bit integer lanes. The host descriptor is detected once per process and
//! cached; callers may also inject their own (for testing or to pin a tier).
//!
//! | Width | x86_64 | aarch64 | i32 lanes |
//! |-------|--------|---------|-----------|
//! | W512 | AVX-512F (feature `avx512`) | - | 16 |
//! | W256 | AVX2 | - | 8 |
//! | W128 | SSE4.1 | NEON | 4 |

use std::fmt;
use std::sync::OnceLock;

static HOST: OnceLock<Capabilities> = OnceLock::new();

/// Vector width used for one accumulation pass.
///
/// Ordered so that a wider tier compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LaneWidth {
    /// No acceleration: every element goes through the scalar pass.
    #[default]
    None,
    /// 128-bit vectors (4 x i32).
    W128,
    /// 256-bit vectors (8 x i32).
    W256,
    /// 512-bit vectors (16 x i32).
    W512,
}

impl LaneWidth {
    /// Accelerated tiers, widest first.
    pub const ACCELERATED: [LaneWidth; 3] = [LaneWidth::W512, LaneWidth::W256, LaneWidth::W128];

    /// Number of 32-bit elements consumed per step (0 for [`LaneWidth::None`]).
    #[inline]
    #[must_use]
    pub const fn lanes(self) -> usize {
        self.bits() / 32
    }

    /// Register width in bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            LaneWidth::None => 0,
            LaneWidth::W128 => 128,
            LaneWidth::W256 => 256,
            LaneWidth::W512 => 512,
        }
    }
}

impl fmt::Display for LaneWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneWidth::None => f.write_str("scalar"),
            w => write!(f, "{}-bit", w.bits()),
        }
    }
}

/// Which lane widths are usable for widening 32-bit integer accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities {
    /// 128-bit lanes available.
    pub w128: bool,
    /// 256-bit lanes available.
    pub w256: bool,
    /// 512-bit lanes available.
    pub w512: bool,
}

impl Capabilities {
    /// Descriptor with explicit flags.
    #[must_use]
    pub const fn new(w128: bool, w256: bool, w512: bool) -> Self {
        Self { w128, w256, w512 }
    }

    /// Descriptor reporting no acceleration.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(false, false, false)
    }

    /// Host capabilities, detected on first use and cached for the process.
    #[must_use]
    pub fn host() -> &'static Capabilities {
        HOST.get_or_init(|| {
            let caps = Self::detect();
            log::debug!(
                "avgr: host lane widths w128={} w256={} w512={} (widest: {})",
                caps.w128,
                caps.w256,
                caps.w512,
                caps.widest()
            );
            caps
        })
    }

    /// Query the CPU directly, bypassing the cache.
    #[must_use]
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Self {
                w128: is_x86_feature_detected!("sse4.1"),
                w256: is_x86_feature_detected!("avx2"),
                w512: cfg!(feature = "avx512") && is_x86_feature_detected!("avx512f"),
            }
        }

        // NEON is mandatory on aarch64.
        #[cfg(target_arch = "aarch64")]
        {
            Self::new(true, false, false)
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::none()
        }
    }

    /// Whether `width` is usable. [`LaneWidth::None`] always is.
    #[inline]
    #[must_use]
    pub const fn supports(&self, width: LaneWidth) -> bool {
        match width {
            LaneWidth::None => true,
            LaneWidth::W128 => self.w128,
            LaneWidth::W256 => self.w256,
            LaneWidth::W512 => self.w512,
        }
    }

    /// Widest supported tier, regardless of input length.
    #[must_use]
    pub fn widest(&self) -> LaneWidth {
        LaneWidth::ACCELERATED
            .into_iter()
            .find(|&w| self.supports(w))
            .unwrap_or(LaneWidth::None)
    }
}

/// Pick the widest tier that `caps` supports and that fits at least one full
/// step of a `len`-element input.
///
/// Returns [`LaneWidth::None`] when nothing qualifies; the caller then sums
/// everything in the scalar pass.
///
/// # Example
///
/// ```rust
/// use avgr::{select_lane_width, Capabilities, LaneWidth};
///
/// let caps = Capabilities::new(true, true, true);
/// assert_eq!(select_lane_width(&caps, 100), LaneWidth::W512);
/// assert_eq!(select_lane_width(&caps, 10), LaneWidth::W256);
/// assert_eq!(select_lane_width(&caps, 3), LaneWidth::None);
/// ```
#[inline]
#[must_use]
pub fn select_lane_width(caps: &Capabilities, len: usize) -> LaneWidth {
    LaneWidth::ACCELERATED
        .into_iter()
        .find(|&w| caps.supports(w) && len >= w.lanes())
        .unwrap_or(LaneWidth::None)
}
