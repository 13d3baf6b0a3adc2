use super::f32x8::F32x8;
use crate::simd::sse::f32x4::F32x4;
use crate::simd::traits::{
    SimdLoad, SimdShuffle, BROADCAST_0, BROADCAST_1, BROADCAST_2, BROADCAST_3,
};
use crate::types::{Mat4, Vec4};

/// Row-vector × matrix product with fused multiply-add.
///
/// The row block is loaded as two 256-bit registers and split into its four rows. The
/// accumulation is sequential from zero: `acc = fma(broadcast_i, row_i, acc)` for
/// `i = 0..3`.
///
/// # Safety
///
/// The CPU must support AVX and FMA.
#[inline]
#[target_feature(enable = "avx,fma")]
pub unsafe fn multiply_fma(vec: &Vec4, mat: &Mat4) -> Vec4 {
    let mvec = F32x4::from_vec4(vec);

    // `Mat4` is 32-byte aligned, so rows 0 and 2 start on 256-bit boundaries
    let rows01 = F32x8::load_aligned(mat.rows[0].as_ptr());
    let rows23 = F32x8::load_aligned(mat.rows[2].as_ptr());

    let mut ires = F32x4::zero();
    ires = mvec.permute::<BROADCAST_0>().mul_add(rows01.low(), ires);
    ires = mvec.permute::<BROADCAST_1>().mul_add(rows01.high(), ires);
    ires = mvec.permute::<BROADCAST_2>().mul_add(rows23.low(), ires);
    ires = mvec.permute::<BROADCAST_3>().mul_add(rows23.high(), ires);

    ires.to_vec4()
}

/// Two independent row-vector × matrix products in one instruction sequence.
///
/// `first` occupies lanes 0–3 and `second` lanes 4–7 of every register. The result is
/// split back into its halves, one per problem.
///
/// # Safety
///
/// The CPU must support AVX and FMA.
#[inline]
#[target_feature(enable = "avx,fma")]
pub unsafe fn multiply_dual(first: (&Vec4, &Mat4), second: (&Vec4, &Mat4)) -> (Vec4, Vec4) {
    let (vec_a, mat_a) = first;
    let (vec_b, mat_b) = second;

    let mvec = F32x8::from_halves(vec_a, vec_b);
    let row0 = F32x8::from_halves(&mat_a.rows[0], &mat_b.rows[0]);
    let row1 = F32x8::from_halves(&mat_a.rows[1], &mat_b.rows[1]);
    let row2 = F32x8::from_halves(&mat_a.rows[2], &mat_b.rows[2]);
    let row3 = F32x8::from_halves(&mat_a.rows[3], &mat_b.rows[3]);

    let mut ires = F32x8::zero();
    ires = mvec.permute::<BROADCAST_0>().mul_add(row0, ires);
    ires = mvec.permute::<BROADCAST_1>().mul_add(row1, ires);
    ires = mvec.permute::<BROADCAST_2>().mul_add(row2, ires);
    ires = mvec.permute::<BROADCAST_3>().mul_add(row3, ires);

    (ires.low().to_vec4(), ires.high().to_vec4())
}
