use super::f32x4::{F32x4, DOT3_MASK, DOT4_MASK};
use crate::simd::traits::{SimdShuffle, BROADCAST_0, BROADCAST_1, BROADCAST_2, BROADCAST_3};
use crate::simd::DotLanes;
use crate::types::{Mat4, Vec4};

/// Row-vector × matrix product on 128-bit registers.
///
/// Each vector lane is broadcast across a register and multiplied by its row; the four
/// partial rows are then summed as `((r0 + r1) + r2) + r3`.
///
/// # Safety
///
/// The CPU must support SSE4.1.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn multiply(vec: &Vec4, mat: &Mat4) -> Vec4 {
    let mvec = F32x4::from_vec4(vec);
    let row0 = F32x4::from_vec4(&mat.rows[0]);
    let row1 = F32x4::from_vec4(&mat.rows[1]);
    let row2 = F32x4::from_vec4(&mat.rows[2]);
    let row3 = F32x4::from_vec4(&mat.rows[3]);

    let irow0 = mvec.permute::<BROADCAST_0>().mul(row0);
    let irow1 = mvec.permute::<BROADCAST_1>().mul(row1);
    let irow2 = mvec.permute::<BROADCAST_2>().mul(row2);
    let irow3 = mvec.permute::<BROADCAST_3>().mul(row3);

    let ires = irow0.add(irow1);
    let ires = ires.add(irow2);
    let ires = ires.add(irow3);

    ires.to_vec4()
}

/// Dot product through `_mm_dp_ps`.
///
/// [`DotLanes::Three`] uses mask `0x77` (x, y, z contribute; w is ignored) and
/// [`DotLanes::Four`] uses `0xFF` (w contributes). The scalar is read from lane 0.
///
/// # Safety
///
/// The CPU must support SSE4.1.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn dot(a: &Vec4, b: &Vec4, lanes: DotLanes) -> f32 {
    let va = F32x4::from_vec4(a);
    let vb = F32x4::from_vec4(b);

    match lanes {
        DotLanes::Three => va.dot::<DOT3_MASK>(vb).first(),
        DotLanes::Four => va.dot::<DOT4_MASK>(vb).first(),
    }
}

/// Cross product of the x, y, z lanes; lane 3 of the result carries no meaning.
///
/// # Safety
///
/// The CPU must support SSE4.1.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn cross(a: &Vec4, b: &Vec4) -> Vec4 {
    F32x4::from_vec4(a).cross(F32x4::from_vec4(b)).to_vec4()
}

/// # Safety
///
/// The CPU must support SSE4.1.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn add(a: &Vec4, b: &Vec4) -> Vec4 {
    F32x4::from_vec4(a).add(F32x4::from_vec4(b)).to_vec4()
}

/// Hamilton product `a ⊗ b` of two (x, y, z, w) quaternions.
///
/// vector part: `cross(v_a, v_b) + w_a·v_b + w_b·v_a`
/// scalar part: `w_a·w_b − dot3(v_a, v_b)`
///
/// # Safety
///
/// The CPU must support SSE4.1.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn quat_multiply(a: &Vec4, b: &Vec4) -> Vec4 {
    let vec_a = F32x4::from_vec4(a);
    let vec_b = F32x4::from_vec4(b);
    let w_a = vec_a.permute::<BROADCAST_3>();
    let w_b = vec_b.permute::<BROADCAST_3>();

    let proda = vec_b.mul(w_a);
    let prodb = vec_a.mul(w_b);
    let xprod = vec_a.cross(vec_b);
    let mut out = proda.add(prodb).add(xprod).to_vec4();

    let dp = vec_a.dot::<DOT3_MASK>(vec_b).first();
    out[3] = vec_a.extract::<3>() * vec_b.extract::<3>() - dp;

    out
}

/// Rotates `point` by the unit quaternion `q` in one pass: `(q ⊗ p) ⊗ conj(q)`.
///
/// The intermediate `q ⊗ p` stays in registers and the conjugate is never formed: with
/// `p` pure, the second product reduces to
///
/// vector part: `w_q·v_qp + v_q × v_qp − w_qp·v_q`
///
/// Lane 3 of the result is `point`'s own w. For a non-unit `q` the result is scaled by
/// `|q|²`, exactly as the two-product path with `q.conjugate()` would be.
///
/// # Safety
///
/// The CPU must support SSE4.1.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn quat_rotate(q: &Vec4, point: &Vec4) -> Vec4 {
    let vec_q = F32x4::from_vec4(q);
    let vec_p = F32x4::from_vec4(&point.with_w(0.0));
    let w_q = vec_q.permute::<BROADCAST_3>();

    // q ⊗ p with w_p = 0; its scalar part −dot3(v_q, v_p) sits in lanes 0-2
    let vec_qp = vec_p.mul(w_q).add(vec_q.cross(vec_p));
    let w_qp = F32x4::zero().sub(vec_q.dot::<DOT3_MASK>(vec_p));

    let rotated = vec_qp.mul(w_q).add(vec_q.cross(vec_qp));
    let rotated = rotated.sub(vec_q.mul(w_qp));

    rotated.to_vec4().with_w(point.w())
}
