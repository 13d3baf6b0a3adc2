//! Safe kernel entry points.
//!
//! Each SIMD entry point first checks that the running CPU has the features its tier
//! is compiled for. Running a tier without them is a precondition violation and
//! panics with a diagnostic naming the tier and the missing features; it is never
//! retried or silently downgraded. Use [`Tier::ensure_supported`] or
//! [`Tier::available`] to choose a tier up front.

use crate::error::{KernelError, Result};
use crate::quat::Quat;
use crate::simd::{scalar, DotLanes, Tier};
use crate::types::{Mat4, Vec4};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::simd::{avx2, sse};

pub use crate::quat::{lerp as quat_lerp, rotate_point, rotate_points};

#[inline(always)]
#[track_caller]
fn require(tier: Tier) {
    if let Err(err) = tier.ensure_supported() {
        panic!("kernel precondition violated: {err}");
    }
}

/// Checks the tier, then runs an `unsafe` `#[target_feature]` kernel call.
macro_rules! simd_call {
    ($tier:expr, $call:expr) => {{
        require($tier);

        // SAFETY: `require` verified the CPU features the kernel is compiled for, and
        // every pointer the kernel loads from comes from an aligned `Vec4`/`Mat4`.
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        let out = unsafe { $call };

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        let out = unreachable!("{} tier has no kernel on this architecture", $tier);

        out
    }};
}

/// Reference row-vector × matrix product.
#[inline]
pub fn multiply_scalar(vec: &Vec4, mat: &Mat4) -> Vec4 {
    scalar::multiply(vec, mat)
}

/// Row-vector × matrix product on 128-bit registers.
///
/// # Panics
///
/// Panics if the CPU lacks SSE4.1.
#[inline]
pub fn multiply_128(vec: &Vec4, mat: &Mat4) -> Vec4 {
    simd_call!(Tier::Sse, sse::multiply(vec, mat))
}

/// Row-vector × matrix product with a 256-bit row block and fused multiply-add.
///
/// # Panics
///
/// Panics if the CPU lacks AVX or FMA.
#[inline]
pub fn multiply_256_fma(vec: &Vec4, mat: &Mat4) -> Vec4 {
    simd_call!(Tier::Fma, avx2::multiply_fma(vec, mat))
}

/// Two independent products in one dual-lane kernel call.
///
/// # Panics
///
/// Panics if the CPU lacks AVX or FMA.
#[inline]
pub fn multiply_dual_256(first: (&Vec4, &Mat4), second: (&Vec4, &Mat4)) -> (Vec4, Vec4) {
    simd_call!(Tier::DualFma, avx2::multiply_dual(first, second))
}

/// Runs the single-problem kernel of `tier`. [`Tier::DualFma`] maps to the
/// single-lane FMA kernel, which is its odd-input fallback.
#[inline]
pub fn multiply(tier: Tier, vec: &Vec4, mat: &Mat4) -> Vec4 {
    match tier {
        Tier::Scalar => multiply_scalar(vec, mat),
        Tier::Sse => multiply_128(vec, mat),
        Tier::Fma | Tier::DualFma => multiply_256_fma(vec, mat),
    }
}

/// Kernel calls made by [`multiply_batch`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Dual-lane calls; each covers two problems.
    pub dual_calls: usize,
    /// Single-lane FMA calls for a trailing unpaired problem.
    pub single_calls: usize,
}

/// Multiplies every `(vec, mat)` problem into `out` on the dual-lane tier.
///
/// Problems are taken two at a time through [`multiply_dual_256`]. A trailing unpaired
/// problem falls back to [`multiply_256_fma`].
pub fn multiply_batch(problems: &[(Vec4, Mat4)], out: &mut [Vec4]) -> Result<BatchStats> {
    if problems.len() != out.len() {
        return Err(KernelError::LengthMismatch {
            expected: problems.len(),
            actual: out.len(),
        });
    }
    Tier::DualFma.ensure_supported()?;

    let mut stats = BatchStats::default();
    let mut pairs = problems.chunks_exact(2);
    let mut slots = out.chunks_exact_mut(2);

    for (pair, slot) in pairs.by_ref().zip(slots.by_ref()) {
        let (a, b) = multiply_dual_256((&pair[0].0, &pair[0].1), (&pair[1].0, &pair[1].1));
        slot[0] = a;
        slot[1] = b;
        stats.dual_calls += 1;
    }

    if let ([(vec, mat)], [slot]) = (pairs.remainder(), slots.into_remainder()) {
        *slot = multiply_256_fma(vec, mat);
        stats.single_calls += 1;
    }

    tracing::trace!(
        problems = problems.len(),
        dual_calls = stats.dual_calls,
        single_calls = stats.single_calls,
        "batch multiply"
    );

    Ok(stats)
}

/// Dot product on the 128-bit tier; see [`DotLanes`] for the mask each variant uses.
///
/// # Panics
///
/// Panics if the CPU lacks SSE4.1.
#[inline]
pub fn dot(a: &Vec4, b: &Vec4, lanes: DotLanes) -> f32 {
    simd_call!(Tier::Sse, sse::dot(a, b, lanes))
}

#[inline]
pub fn dot_scalar(a: &Vec4, b: &Vec4, lanes: DotLanes) -> f32 {
    scalar::dot_lanes(a, b, lanes)
}

/// Cross product of the x, y, z lanes on the 128-bit tier.
///
/// # Panics
///
/// Panics if the CPU lacks SSE4.1.
#[inline]
pub fn cross(a: &Vec4, b: &Vec4) -> Vec4 {
    simd_call!(Tier::Sse, sse::cross(a, b))
}

#[inline]
pub fn cross_scalar(a: &Vec4, b: &Vec4) -> Vec4 {
    scalar::cross(a, b)
}

/// Elementwise sum on the 128-bit tier.
///
/// # Panics
///
/// Panics if the CPU lacks SSE4.1.
#[inline]
pub fn add(a: &Vec4, b: &Vec4) -> Vec4 {
    simd_call!(Tier::Sse, sse::add(a, b))
}

/// Euclidean distance between the x, y, z parts of two points (scalar only).
#[inline]
pub fn distance(a: &Vec4, b: &Vec4) -> f32 {
    scalar::distance(a, b)
}

/// Hamilton product `a ⊗ b` on the 128-bit tier.
///
/// # Panics
///
/// Panics if the CPU lacks SSE4.1.
#[inline]
pub fn quat_multiply(a: &Quat, b: &Quat) -> Quat {
    Quat(simd_call!(Tier::Sse, sse::quat_multiply(&a.0, &b.0)))
}

/// Rotates `point` by the unit quaternion `q` without forming the conjugate.
///
/// Equivalent to [`rotate_point`] with `q_inv = q.conjugate()`, in a single kernel call
/// that keeps the intermediate product in registers. Lane 3 of the result is `point`'s
/// own w.
///
/// # Panics
///
/// Panics if the CPU lacks SSE4.1.
#[inline]
pub fn rotate_point_fused(q: &Quat, point: &Vec4) -> Vec4 {
    simd_call!(Tier::Sse, sse::quat_rotate(&q.0, point))
}
