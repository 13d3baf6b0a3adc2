//! 128-bit SSE4.1 kernels.
//!
//! One [`Vec4`](crate::types::Vec4) fills exactly one `__m128`, so every operation here
//! is a handful of register instructions with no loop. All kernels are
//! `#[target_feature(enable = "sse4.1")]` and therefore `unsafe` to call; the safe
//! wrappers in [`crate::kernel`] check the CPU first.
//!
//! # Memory Alignment
//!
//! Loads and stores use the aligned forms (`_mm_load_ps` / `_mm_store_ps`), which fault
//! on addresses that are not 16-byte aligned. The `Vec4` and `Mat4` types guarantee
//! that alignment.

pub(crate) mod f32x4;

mod kernel;

pub use kernel::*;
