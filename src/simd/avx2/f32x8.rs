//! AVX 8-lane f32 register wrapper.
//!
//! `F32x8` wraps `__m256`. The kernels in this crate treat it as two 128-bit halves:
//! either two adjacent matrix rows (single-lane tier) or the same row of two independent
//! problems (dual-lane tier).

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::sse::f32x4::F32x4;
use crate::simd::traits::{Alignment, SimdLoad, SimdShuffle, SimdStore};
use crate::types::Vec4;
use crate::utils::AVX_ALIGNMENT;

#[derive(Copy, Clone, Debug)]
pub(crate) struct F32x8 {
    pub(crate) elements: __m256,
}

impl Alignment for F32x8 {
    const ALIGNMENT: usize = AVX_ALIGNMENT;
}

impl SimdLoad for F32x8 {
    /// Loads 8 floats with `_mm256_load_ps`.
    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        debug_assert!(Self::is_aligned(ptr), "pointer must be 32-byte aligned");

        Self {
            elements: _mm256_load_ps(ptr),
        }
    }
}

impl SimdStore for F32x8 {
    #[inline(always)]
    unsafe fn store_aligned_at(&self, ptr: *mut f32) {
        debug_assert!(Self::is_aligned(ptr), "pointer must be 32-byte aligned");

        _mm256_store_ps(ptr, self.elements)
    }
}

impl SimdShuffle for F32x8 {
    /// Permutes within each 128-bit half independently (`_mm256_permute_ps`), so a
    /// broadcast never mixes the two halves.
    #[inline(always)]
    unsafe fn permute<const MASK: i32>(&self) -> Self {
        Self {
            elements: _mm256_permute_ps::<MASK>(self.elements),
        }
    }
}

impl F32x8 {
    /// # Safety
    ///
    /// The CPU must support AVX.
    #[inline(always)]
    pub(crate) unsafe fn zero() -> Self {
        Self {
            elements: _mm256_setzero_ps(),
        }
    }

    /// Two-source gather: `lo` fills lanes 0–3 and `hi` fills lanes 4–7.
    ///
    /// # Safety
    ///
    /// The CPU must support AVX.
    #[inline(always)]
    pub(crate) unsafe fn from_halves(lo: &Vec4, hi: &Vec4) -> Self {
        let lo = F32x4::from_vec4(lo);
        let hi = F32x4::from_vec4(hi);

        Self {
            elements: _mm256_set_m128(hi.elements, lo.elements),
        }
    }

    /// Lanes 0–3.
    ///
    /// # Safety
    ///
    /// The CPU must support AVX.
    #[inline(always)]
    pub(crate) unsafe fn low(self) -> F32x4 {
        F32x4 {
            elements: _mm256_castps256_ps128(self.elements),
        }
    }

    /// Lanes 4–7.
    ///
    /// # Safety
    ///
    /// The CPU must support AVX.
    #[inline(always)]
    pub(crate) unsafe fn high(self) -> F32x4 {
        F32x4 {
            elements: _mm256_extractf128_ps::<1>(self.elements),
        }
    }

    /// `self * b + acc` with a single rounding (`_mm256_fmadd_ps`).
    ///
    /// # Safety
    ///
    /// The CPU must support AVX and FMA.
    #[inline(always)]
    pub(crate) unsafe fn mul_add(self, b: Self, acc: Self) -> Self {
        Self {
            elements: _mm256_fmadd_ps(self.elements, b.elements, acc.elements),
        }
    }
}
