//! Portable scalar reference kernel.
//!
//! Sums accumulate serially in index order 0 → 3. That order fixes the reference
//! rounding that the SIMD tiers are compared against.

use crate::simd::DotLanes;
use crate::types::{Mat4, Vec4};

/// Row-vector × matrix product: `result[j] = Σ_i vec[i] * mat[i][j]`.
#[inline]
pub fn multiply(vec: &Vec4, mat: &Mat4) -> Vec4 {
    let mut result = Vec4::ZERO;

    for i in 0..4 {
        let vec_el = vec[i];
        let row = &mat.rows[i];

        result[0] += vec_el * row[0];
        result[1] += vec_el * row[1];
        result[2] += vec_el * row[2];
        result[3] += vec_el * row[3];
    }

    result
}

/// Four-lane dot product, including the w lane.
#[inline]
pub fn dot(a: &Vec4, b: &Vec4) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Three-lane dot product; w is ignored.
#[inline]
pub fn dot3(a: &Vec4, b: &Vec4) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn dot_lanes(a: &Vec4, b: &Vec4, lanes: DotLanes) -> f32 {
    match lanes {
        DotLanes::Three => dot3(a, b),
        DotLanes::Four => dot(a, b),
    }
}

#[inline]
pub fn add(a: &Vec4, b: &Vec4) -> Vec4 {
    *a + *b
}

/// 3D cross product of the x, y, z lanes. Lane 3 of the result is 0.
#[inline]
pub fn cross(a: &Vec4, b: &Vec4) -> Vec4 {
    Vec4::new(
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
        0.0,
    )
}

/// Euclidean distance between the x, y, z parts of two points.
#[inline]
pub fn distance(a: &Vec4, b: &Vec4) -> f32 {
    let d = *a - *b;
    dot3(&d, &d).sqrt()
}
