//! # quadlane
//!
//! 4-element vector × 4×4 matrix multiplication and quaternion rotation at four levels
//! of hardware parallelism:
//!
//! | Tier | Kernel | Requires |
//! |------|--------|----------|
//! | scalar | serial index-order accumulation | nothing |
//! | sse | 128-bit broadcast + tree sum | SSE4.1 |
//! | fma | 256-bit row block + fused multiply-add | AVX + FMA |
//! | dual | two independent problems per 256-bit register | AVX + FMA |
//!
//! All tiers agree up to floating-point reassociation (relative 1e-5). The
//! [`harness`] module drives every tier over the same input sequence and checks that.
//!
//! ## Conventions
//!
//! The vector is a row vector premultiplying a row-major matrix:
//! `result = Σ_i vec[i] · mat.rows[i]`. Quaternions are (x, y, z, w) with w the scalar
//! part.
//!
//! ## Example
//!
//! ```rust
//! use quadlane::{multiply, Mat4, Tier, Vec4};
//!
//! let vec = Vec4::new(1.0, 2.0, 3.0, 4.0);
//! let mat = Mat4::from_rows([
//!     [1.0, 5.0, 9.0, 13.0],
//!     [2.0, 6.0, 10.0, 14.0],
//!     [3.0, 7.0, 11.0, 15.0],
//!     [4.0, 8.0, 12.0, 16.0],
//! ]);
//!
//! let result = multiply(Tier::best(), &vec, &mat);
//! assert_eq!(result, Vec4::new(30.0, 70.0, 110.0, 150.0));
//! ```

pub mod error;
pub mod harness;
pub mod kernel;
pub mod quat;
pub mod rng;
pub mod simd;
pub mod types;
pub mod utils;

pub use error::{KernelError, Result};
pub use harness::{HarnessConfig, HarnessReport};
pub use kernel::{
    add, cross, cross_scalar, distance, dot, dot_scalar, multiply, multiply_128, multiply_256_fma,
    multiply_batch, multiply_dual_256, multiply_scalar, quat_lerp, quat_multiply, rotate_point,
    rotate_point_fused, rotate_points, BatchStats,
};
pub use quat::Quat;
pub use rng::SeedGen;
pub use simd::{DotLanes, Tier};
pub use types::{DualPair, Mat4, Vec4};
