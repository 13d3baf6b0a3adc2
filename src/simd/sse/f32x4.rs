//! SSE 4-lane f32 register wrapper.
//!
//! `F32x4` wraps `__m128`. Lanes are read through [`F32x4::extract`] and
//! [`F32x4::first`] instead of reinterpreting the register as a float array.
//!
//! Every method is an `unsafe` `#[inline(always)]` wrapper around one or two
//! intrinsics. Callers must have checked the CPU features named in each `# Safety`
//! section; in this crate that means the `#[target_feature]` kernels, and tests that
//! check the CPU first.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::{Alignment, SimdLoad, SimdShuffle, SimdStore, YZXW};
use crate::types::Vec4;
use crate::utils::SSE_ALIGNMENT;

/// `_mm_dp_ps` mask: multiply lanes 0–2, write the sum to lanes 0–2.
pub(crate) const DOT3_MASK: i32 = 0x77;

/// `_mm_dp_ps` mask: multiply all four lanes, write the sum to all four lanes.
pub(crate) const DOT4_MASK: i32 = 0xFF;

#[derive(Copy, Clone, Debug)]
pub(crate) struct F32x4 {
    pub(crate) elements: __m128,
}

impl Alignment for F32x4 {
    const ALIGNMENT: usize = SSE_ALIGNMENT;
}

impl SimdLoad for F32x4 {
    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        debug_assert!(Self::is_aligned(ptr), "pointer must be 16-byte aligned");

        Self {
            elements: _mm_load_ps(ptr),
        }
    }
}

impl SimdStore for F32x4 {
    #[inline(always)]
    unsafe fn store_aligned_at(&self, ptr: *mut f32) {
        debug_assert!(Self::is_aligned(ptr), "pointer must be 16-byte aligned");

        _mm_store_ps(ptr, self.elements)
    }
}

impl SimdShuffle for F32x4 {
    /// `_mm_shuffle_ps(a, a, MASK)`.
    #[inline(always)]
    unsafe fn permute<const MASK: i32>(&self) -> Self {
        Self {
            elements: _mm_shuffle_ps::<MASK>(self.elements, self.elements),
        }
    }
}

impl F32x4 {
    /// # Safety
    ///
    /// The CPU must support SSE.
    #[inline(always)]
    pub(crate) unsafe fn zero() -> Self {
        Self {
            elements: _mm_setzero_ps(),
        }
    }

    /// Loads a `Vec4`; its type guarantees the 16-byte alignment.
    ///
    /// # Safety
    ///
    /// The CPU must support SSE.
    #[inline(always)]
    pub(crate) unsafe fn from_vec4(v: &Vec4) -> Self {
        Self::load_aligned(v.as_ptr())
    }

    /// # Safety
    ///
    /// The CPU must support SSE.
    #[inline(always)]
    pub(crate) unsafe fn to_vec4(self) -> Vec4 {
        let mut out = Vec4::ZERO;
        // `out` is `align(16)` with room for four floats
        self.store_aligned_at(out.as_mut_ptr());
        out
    }

    /// Reads lane `LANE` (0..=3).
    ///
    /// # Safety
    ///
    /// The CPU must support SSE4.1.
    #[inline(always)]
    pub(crate) unsafe fn extract<const LANE: i32>(self) -> f32 {
        f32::from_bits(_mm_extract_ps::<LANE>(self.elements) as u32)
    }

    /// Reads lane 0.
    ///
    /// # Safety
    ///
    /// The CPU must support SSE.
    #[inline(always)]
    pub(crate) unsafe fn first(self) -> f32 {
        _mm_cvtss_f32(self.elements)
    }

    /// Masked horizontal multiply-and-sum (`_mm_dp_ps`).
    ///
    /// # Safety
    ///
    /// The CPU must support SSE4.1.
    #[inline(always)]
    pub(crate) unsafe fn dot<const MASK: i32>(self, rhs: Self) -> Self {
        Self {
            elements: _mm_dp_ps::<MASK>(self.elements, rhs.elements),
        }
    }

    /// Cross product of the x, y, z lanes.
    ///
    /// Two fixed (y, z, x, w) permutations, one multiply pair and one subtract; lane 3
    /// ends up as `w_a*w_b - w_b*w_a`, which is 0 for finite input.
    ///
    /// # Safety
    ///
    /// The CPU must support SSE.
    #[inline(always)]
    pub(crate) unsafe fn cross(self, rhs: Self) -> Self {
        let sh_a = self.permute::<YZXW>();
        let sh_b = rhs.permute::<YZXW>();
        let result = self.mul(sh_b).sub(rhs.mul(sh_a));
        result.permute::<YZXW>()
    }

    /// # Safety
    ///
    /// The CPU must support SSE.
    #[inline(always)]
    pub(crate) unsafe fn add(self, rhs: Self) -> Self {
        Self {
            elements: _mm_add_ps(self.elements, rhs.elements),
        }
    }

    /// # Safety
    ///
    /// The CPU must support SSE.
    #[inline(always)]
    pub(crate) unsafe fn sub(self, rhs: Self) -> Self {
        Self {
            elements: _mm_sub_ps(self.elements, rhs.elements),
        }
    }

    /// # Safety
    ///
    /// The CPU must support SSE.
    #[inline(always)]
    pub(crate) unsafe fn mul(self, rhs: Self) -> Self {
        Self {
            elements: _mm_mul_ps(self.elements, rhs.elements),
        }
    }

    /// `self * b + acc` with a single rounding (`_mm_fmadd_ps`).
    ///
    /// # Safety
    ///
    /// The CPU must support FMA. Only the 256-bit kernels call it.
    #[inline(always)]
    pub(crate) unsafe fn mul_add(self, b: Self, acc: Self) -> Self {
        Self {
            elements: _mm_fmadd_ps(self.elements, b.elements, acc.elements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::{BROADCAST_0, BROADCAST_2, BROADCAST_3};

    fn sse41() -> bool {
        is_x86_feature_detected!("sse4.1")
    }

    mod lane_tests {
        use super::*;

        #[test]
        fn test_round_trip_through_register() {
            if !sse41() {
                return;
            }
            let v = Vec4::new(1.0, -2.0, 3.5, f32::MAX);
            assert_eq!(unsafe { F32x4::from_vec4(&v).to_vec4() }, v);
        }

        #[test]
        fn test_extract_each_lane() {
            if !sse41() {
                return;
            }
            unsafe {
                let r = F32x4::from_vec4(&Vec4::new(1.0, 2.0, 3.0, 4.0));
                assert_eq!(r.first(), 1.0);
                assert_eq!(r.extract::<0>(), 1.0);
                assert_eq!(r.extract::<1>(), 2.0);
                assert_eq!(r.extract::<2>(), 3.0);
                assert_eq!(r.extract::<3>(), 4.0);
            }
        }

        #[test]
        fn test_broadcast() {
            if !sse41() {
                return;
            }
            unsafe {
                let r = F32x4::from_vec4(&Vec4::new(1.0, 2.0, 3.0, 4.0));
                assert_eq!(r.permute::<BROADCAST_0>().to_vec4(), Vec4::splat(1.0));
                assert_eq!(r.permute::<BROADCAST_2>().to_vec4(), Vec4::splat(3.0));
                assert_eq!(r.permute::<BROADCAST_3>().to_vec4(), Vec4::splat(4.0));
            }
        }

        #[test]
        fn test_yzxw_permutation() {
            if !sse41() {
                return;
            }
            unsafe {
                let r = F32x4::from_vec4(&Vec4::new(1.0, 2.0, 3.0, 4.0));
                assert_eq!(r.permute::<YZXW>().to_vec4(), Vec4::new(2.0, 3.0, 1.0, 4.0));
            }
        }

        #[test]
        fn test_zero() {
            if !sse41() {
                return;
            }
            assert_eq!(unsafe { F32x4::zero().to_vec4() }, Vec4::ZERO);
        }
    }

    mod arithmetic_tests {
        use super::*;

        #[test]
        fn test_dot_masks() {
            if !sse41() {
                return;
            }
            unsafe {
                let a = F32x4::from_vec4(&Vec4::new(1.0, 2.0, 3.0, 4.0));
                let b = F32x4::from_vec4(&Vec4::new(5.0, 6.0, 7.0, 8.0));

                let d3 = a.dot::<DOT3_MASK>(b).to_vec4();
                assert_eq!(d3, Vec4::new(38.0, 38.0, 38.0, 0.0));

                let d4 = a.dot::<DOT4_MASK>(b).to_vec4();
                assert_eq!(d4, Vec4::splat(70.0));
            }
        }

        #[test]
        fn test_cross_matches_definition() {
            if !sse41() {
                return;
            }
            let a = Vec4::new(1.0, 2.0, 3.0, 0.0);
            let b = Vec4::new(4.0, 5.0, 6.0, 0.0);
            let r = unsafe { F32x4::from_vec4(&a).cross(F32x4::from_vec4(&b)).to_vec4() };
            assert_eq!(r, Vec4::new(-3.0, 6.0, -3.0, 0.0));
        }

        #[test]
        fn test_elementwise_ops() {
            if !sse41() {
                return;
            }
            unsafe {
                let a = F32x4::from_vec4(&Vec4::new(1.0, 2.0, 3.0, 4.0));
                let b = F32x4::from_vec4(&Vec4::splat(2.0));
                assert_eq!(a.add(b).to_vec4(), Vec4::new(3.0, 4.0, 5.0, 6.0));
                assert_eq!(a.sub(b).to_vec4(), Vec4::new(-1.0, 0.0, 1.0, 2.0));
                assert_eq!(a.mul(b).to_vec4(), Vec4::new(2.0, 4.0, 6.0, 8.0));
            }
        }

        #[test]
        fn test_mul_add() {
            if !(sse41() && is_x86_feature_detected!("fma")) {
                return;
            }
            unsafe {
                let a = F32x4::from_vec4(&Vec4::new(1.0, 2.0, 3.0, 4.0));
                let b = F32x4::from_vec4(&Vec4::splat(3.0));
                let acc = F32x4::from_vec4(&Vec4::splat(1.0));
                assert_eq!(a.mul_add(b, acc).to_vec4(), Vec4::new(4.0, 7.0, 10.0, 13.0));
            }
        }
    }
}
