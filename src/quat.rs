//! Quaternion algebra over [`Vec4`] storage.
//!
//! Quaternions are stored as (x, y, z, w) with w the scalar part, so a [`Quat`] is
//! exactly one 128-bit register. The Hamilton product runs on the 128-bit tier through
//! [`kernel::quat_multiply`](crate::kernel::quat_multiply); [`scalar::multiply`] is the
//! component-wise reference.
//!
//! Nothing here checks unit length. Rotating with a non-unit quaternion scales the
//! point, and a zero-length input yields NaN/Inf.

use std::fmt;

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use crate::kernel;
use crate::types::Vec4;

/// A quaternion (x, y, z, w) with w the scalar part.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(transparent)]
pub struct Quat(pub Vec4);

impl Quat {
    pub const IDENTITY: Self = Self(Vec4::new(0.0, 0.0, 0.0, 1.0));

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self(Vec4::new(x, y, z, w))
    }

    /// Rotation of `angle` radians about `axis` (x, y, z; w is ignored). The axis is
    /// normalized here; a zero axis yields NaN.
    pub fn from_axis_angle(axis: &Vec4, angle: f32) -> Self {
        let axis = axis.with_w(0.0);
        let (sin, cos) = (angle * 0.5).sin_cos();
        let v = axis * (sin / axis.length());
        Self(v.with_w(cos))
    }

    /// Embeds the x, y, z part of a point as a pure quaternion (w = 0).
    #[inline]
    pub fn pure(point: &Vec4) -> Self {
        Self(point.with_w(0.0))
    }

    #[inline]
    pub fn vector(&self) -> Vec4 {
        self.0.with_w(0.0)
    }

    #[inline]
    pub fn scalar(&self) -> f32 {
        self.0.w()
    }

    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.0.x(), -self.0.y(), -self.0.z(), self.0.w())
    }

    /// `conjugate / |q|²`; equal to the conjugate for a unit quaternion.
    #[inline]
    pub fn inverse(&self) -> Self {
        let norm_sq = self.0.as_slice().iter().map(|c| c * c).sum::<f32>();
        Self(self.conjugate().0 * norm_sq.recip())
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.0.length()
    }

    #[inline]
    pub fn normalize(&self) -> Self {
        Self(self.0 * self.length().recip())
    }
}

impl From<Vec4> for Quat {
    #[inline]
    fn from(v: Vec4) -> Self {
        Self(v)
    }
}

impl From<Quat> for Vec4 {
    #[inline]
    fn from(q: Quat) -> Self {
        q.0
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl AbsDiffEq for Quat {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        Vec4::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for Quat {
    fn default_max_relative() -> f32 {
        Vec4::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}

impl UlpsEq for Quat {
    fn default_max_ulps() -> u32 {
        Vec4::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
        self.0.ulps_eq(&other.0, epsilon, max_ulps)
    }
}

/// Component-wise Hamilton product, used to validate the SIMD version.
pub mod scalar {
    use super::Quat;

    pub fn multiply(a: &Quat, b: &Quat) -> Quat {
        let [ax, ay, az, aw] = a.0.to_array();
        let [bx, by, bz, bw] = b.0.to_array();

        Quat::new(
            aw * bx + bw * ax + (ay * bz - az * by),
            aw * by + bw * ay + (az * bx - ax * bz),
            aw * bz + bw * az + (ax * by - ay * bx),
            aw * bw - (ax * bx + ay * by + az * bz),
        )
    }
}

/// Linear blend `(1 − β)·a + β·b`, renormalized by its own length.
pub fn lerp(a: &Quat, b: &Quat, beta: f32) -> Quat {
    let blended = a.0 * (1.0 - beta) + b.0 * beta;
    Quat(blended).normalize()
}

/// Rotates `point` by the sandwich product `(q ⊗ p) ⊗ q_inv`.
///
/// The x, y, z part of `point` is embedded as a pure quaternion. Lane 3 of the result
/// is `point`'s own w, so homogeneous points keep their w through a rotation.
///
/// # Panics
///
/// Panics if the CPU lacks SSE4.1.
pub fn rotate_point(q: &Quat, q_inv: &Quat, point: &Vec4) -> Vec4 {
    let p = Quat::pure(point);
    let r = kernel::quat_multiply(q, &p);
    let rotated = kernel::quat_multiply(&r, q_inv);

    rotated.0.with_w(point.w())
}

/// Rotates every point in place.
///
/// # Panics
///
/// Panics if the CPU lacks SSE4.1.
pub fn rotate_points(q: &Quat, q_inv: &Quat, points: &mut [Vec4]) {
    for point in points.iter_mut() {
        *point = rotate_point(q, q_inv, point);
    }
}
