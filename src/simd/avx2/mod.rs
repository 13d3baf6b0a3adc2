//! 256-bit AVX + FMA kernels.
//!
//! Two tiers live here:
//!
//! - **Single-lane FMA** ([`multiply_fma`]): one problem. The matrix row block is loaded
//!   as two 256-bit registers (rows 0–1, rows 2–3) and accumulated with fused
//!   multiply-add from a zero accumulator.
//! - **Dual-lane FMA** ([`multiply_dual`]): two independent problems. Lanes 0–3 of every
//!   register belong to the first problem and lanes 4–7 to the second; no instruction
//!   moves data between the halves.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: AVX and FMA (Intel Haswell / AMD Piledriver and later)
//! - **Detection**: checked at runtime by [`Tier::is_supported`](crate::simd::Tier::is_supported)
//! - **Memory Alignment**: 32-byte for the matrix row block, 16-byte for each `Vec4`
//!
//! The FMA tiers round once per step instead of twice, so their results may differ from
//! the 128-bit tier in the low-order bits.

pub(crate) mod f32x8;

mod kernel;

pub use kernel::*;
