//! Alignment predicates and precondition checks.
//!
//! The aligned SIMD loads used by the 128-bit and 256-bit tiers fault on misaligned
//! addresses. Typed inputs (`Vec4`, `Mat4`) carry their alignment, so these helpers are
//! only needed where raw `f32` memory enters the crate.

use crate::error::{KernelError, Result};

/// Alignment required by 128-bit loads and stores (`_mm_load_ps`).
pub const SSE_ALIGNMENT: usize = 16;

/// Alignment required by 256-bit loads and stores (`_mm256_load_ps`).
pub const AVX_ALIGNMENT: usize = 32;

/// Returns `true` if `ptr` is aligned to `align` bytes.
///
/// `align` must be a power of two.
#[inline(always)]
pub fn is_aligned(ptr: *const f32, align: usize) -> bool {
    debug_assert!(align.is_power_of_two(), "alignment must be a power of two");
    (ptr as usize) & (align - 1) == 0
}

/// Checks that `slice` starts on an `align`-byte boundary and holds at least `len` floats.
pub fn check_slice(slice: &[f32], len: usize, align: usize) -> Result<()> {
    if slice.len() < len {
        return Err(KernelError::LengthMismatch {
            expected: len,
            actual: slice.len(),
        });
    }

    if !is_aligned(slice.as_ptr(), align) {
        return Err(KernelError::Misaligned {
            address: slice.as_ptr() as usize,
            required: align,
        });
    }

    Ok(())
}

/// Aborts with a diagnostic if `ptr` is not aligned to `align` bytes.
///
/// Use this at the edge of code that hands raw pointers to aligned SIMD loads. A
/// misaligned address there is a caller bug, not something to recover from.
#[inline(always)]
#[track_caller]
pub fn assert_aligned(ptr: *const f32, align: usize) {
    assert!(
        is_aligned(ptr, align),
        "alignment precondition violated: address {:#x} is not {align}-byte aligned",
        ptr as usize
    );
}
