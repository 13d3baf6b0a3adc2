//! Shared surface of the register wrappers (`F32x4`, `F32x8`).

/// Alignment requirement of a register type's aligned loads and stores.
pub(crate) trait Alignment {
    const ALIGNMENT: usize;

    #[inline(always)]
    fn is_aligned(ptr: *const f32) -> bool {
        crate::utils::is_aligned(ptr, Self::ALIGNMENT)
    }
}

pub(crate) trait SimdLoad: Alignment + Sized {
    /// Loads a full register from `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be aligned to `Self::ALIGNMENT` and point to a full register's worth
    /// of readable floats.
    unsafe fn load_aligned(ptr: *const f32) -> Self;
}

pub(crate) trait SimdStore: Alignment {
    /// Stores the full register at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be aligned to `Self::ALIGNMENT` and point to a full register's worth
    /// of writable floats.
    unsafe fn store_aligned_at(&self, ptr: *mut f32);
}

/// Lane permutation within each 128-bit group.
///
/// `MASK` uses the `_MM_SHUFFLE` encoding: two bits per destination lane, lane 0 in the
/// low bits.
pub(crate) trait SimdShuffle {
    /// # Safety
    ///
    /// The CPU must support the instruction set of the implementing register type.
    unsafe fn permute<const MASK: i32>(&self) -> Self;
}

/// Shuffle masks that duplicate one lane into all four lanes of a 128-bit group.
pub(crate) const BROADCAST_0: i32 = 0b00_00_00_00;
pub(crate) const BROADCAST_1: i32 = 0b01_01_01_01;
pub(crate) const BROADCAST_2: i32 = 0b10_10_10_10;
pub(crate) const BROADCAST_3: i32 = 0b11_11_11_11;

/// (x, y, z, w) -> (y, z, x, w), i.e. `_MM_SHUFFLE(3, 0, 2, 1)`.
pub(crate) const YZXW: i32 = 0b11_00_10_01;
