//! Architecture-specific widening-sum kernels.
//!
//! This module contains the unsafe intrinsic code for each CPU architecture.
//! [`crate::kernel`] decides which one may run and falls back to the
//! portable lane-generic kernel otherwise.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;
