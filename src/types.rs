//! Fixed-size value types consumed by every kernel tier.
//!
//! A [`Vec4`] fills exactly one 128-bit register and a [`Mat4`] row pair fills exactly
//! one 256-bit register. Alignment is part of the type (`align(16)` / `align(32)`), so
//! the aligned SIMD loads in the kernels are always valid for a `&Vec4` or `&Mat4`.
//! Raw `f32` buffers enter through the checked `try_ref_from_slice` views.

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use crate::error::Result;
use crate::utils::{check_slice, AVX_ALIGNMENT, SSE_ALIGNMENT};

/// Four packed `f32` lanes, 16-byte aligned.
///
/// The lanes are stored in (x, y, z, w) order. Nothing is normalized implicitly; the
/// caller decides whether a value is a point, a direction or a quaternion.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C, align(16))]
pub struct Vec4(pub [f32; 4]);

impl Vec4 {
    pub const ZERO: Self = Self([0.0; 4]);

    #[inline(always)]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self([x, y, z, w])
    }

    #[inline(always)]
    pub const fn splat(value: f32) -> Self {
        Self([value; 4])
    }

    #[inline(always)]
    pub const fn to_array(self) -> [f32; 4] {
        self.0
    }

    #[inline(always)]
    pub fn x(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn y(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn z(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn w(&self) -> f32 {
        self.0[3]
    }

    /// Returns a copy with lane 3 replaced.
    #[inline(always)]
    pub fn with_w(mut self, w: f32) -> Self {
        self.0[3] = w;
        self
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const f32 {
        self.0.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut f32 {
        self.0.as_mut_ptr()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Euclidean length over all four lanes.
    #[inline]
    pub fn length(&self) -> f32 {
        self.0.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Adds `val` to every lane in place.
    ///
    /// This is the "alter" step the harness applies between iterations. Elementwise
    /// addition rounds identically on every tier, so it is shared by all of them.
    #[inline(always)]
    pub fn offset(&mut self, val: f32) {
        for lane in self.0.iter_mut() {
            *lane += val;
        }
    }

    /// Returns a copy with `val` added to every lane.
    #[inline(always)]
    pub fn offset_by(&self, val: f32) -> Self {
        let mut out = *self;
        out.offset(val);
        out
    }

    /// Copies four lanes out of `slice`. Only the length is checked.
    pub fn try_from_slice(slice: &[f32]) -> Result<Self> {
        check_slice(slice, 4, 1)?;
        Ok(Self([slice[0], slice[1], slice[2], slice[3]]))
    }

    /// Views the first four floats of `slice` as a `Vec4` without copying.
    ///
    /// Fails if the slice is shorter than four floats or does not start on a 16-byte
    /// boundary.
    pub fn try_ref_from_slice(slice: &[f32]) -> Result<&Self> {
        check_slice(slice, 4, SSE_ALIGNMENT)?;
        // SAFETY: `Vec4` is `repr(C)` over `[f32; 4]`; the slice holds at least four
        // floats and starts on a 16-byte boundary (both checked above).
        Ok(unsafe { &*(slice.as_ptr() as *const Self) })
    }
}

impl From<[f32; 4]> for Vec4 {
    #[inline(always)]
    fn from(lanes: [f32; 4]) -> Self {
        Self(lanes)
    }
}

impl From<Vec4> for [f32; 4] {
    #[inline(always)]
    fn from(v: Vec4) -> Self {
        v.0
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;

    #[inline(always)]
    fn index(&self, lane: usize) -> &f32 {
        &self.0[lane]
    }
}

impl IndexMut<usize> for Vec4 {
    #[inline(always)]
    fn index_mut(&mut self, lane: usize) -> &mut f32 {
        &mut self.0[lane]
    }
}

impl Add for Vec4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

/// Running-total accumulation used by the harness.
impl AddAssign for Vec4 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        for (lane, r) in self.0.iter_mut().zip(rhs.0) {
            *lane += r;
        }
    }
}

impl Sub for Vec4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl Neg for Vec4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.map(|v| -v))
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: f32) -> Self {
        Self(self.0.map(|v| v * rhs))
    }
}

impl fmt::Display for Vec4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lane) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(lane, f)?;
        }
        Ok(())
    }
}

impl AbsDiffEq for Vec4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Vec4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl UlpsEq for Vec4 {
    fn default_max_ulps() -> u32 {
        f32::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.ulps_eq(b, epsilon, max_ulps))
    }
}

/// Row-major 4×4 matrix, 32-byte aligned.
///
/// Kernels treat the input vector as a row vector premultiplying the matrix:
/// `result = Σ_i vec[i] · rows[i]`. A consumer that expects the column-vector
/// convention (`M · v`) must pass [`Mat4::transpose`] instead.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C, align(32))]
pub struct Mat4 {
    pub rows: [Vec4; 4],
}

impl Mat4 {
    pub const ZERO: Self = Self {
        rows: [Vec4::ZERO; 4],
    };

    pub const IDENTITY: Self = Self {
        rows: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    #[inline(always)]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self {
            rows: [Vec4(rows[0]), Vec4(rows[1]), Vec4(rows[2]), Vec4(rows[3])],
        }
    }

    #[inline(always)]
    pub fn row(&self, i: usize) -> &Vec4 {
        &self.rows[i]
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const f32 {
        self.rows[0].as_ptr()
    }

    /// The sixteen elements in row-major order.
    #[inline(always)]
    pub fn as_slice(&self) -> &[f32] {
        // SAFETY: `Mat4` is `repr(C)` over four padding-free `Vec4`s, so the rows are
        // sixteen contiguous, initialized floats.
        unsafe { std::slice::from_raw_parts(self.as_ptr(), 16) }
    }

    pub fn transpose(&self) -> Self {
        let r = &self.rows;
        Self {
            rows: std::array::from_fn(|j| Vec4::new(r[0][j], r[1][j], r[2][j], r[3][j])),
        }
    }

    /// Adds `val` to every element in place.
    #[inline(always)]
    pub fn offset(&mut self, val: f32) {
        for row in self.rows.iter_mut() {
            row.offset(val);
        }
    }

    /// Returns a copy with `val` added to every element.
    #[inline(always)]
    pub fn offset_by(&self, val: f32) -> Self {
        let mut out = *self;
        out.offset(val);
        out
    }

    /// Views sixteen row-major floats as a `Mat4` without copying.
    ///
    /// The slice must start on a 32-byte boundary so that the row pairs can be loaded
    /// as single 256-bit registers.
    pub fn try_ref_from_slice(slice: &[f32]) -> Result<&Self> {
        check_slice(slice, 16, AVX_ALIGNMENT)?;
        // SAFETY: sixteen floats are available and the start is 32-byte aligned, which
        // is exactly the layout and alignment of `Mat4`.
        Ok(unsafe { &*(slice.as_ptr() as *const Self) })
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;

    #[inline(always)]
    fn index(&self, row: usize) -> &Vec4 {
        &self.rows[row]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline(always)]
    fn index_mut(&mut self, row: usize) -> &mut Vec4 {
        &mut self.rows[row]
    }
}

/// Two independent (vector, matrix) problems for the dual-lane tier.
///
/// `first` lands in lanes 0–3 of every 256-bit register and `second` in lanes 4–7. The
/// halves never exchange data; packing them is purely a throughput device.
#[derive(Copy, Clone, Debug)]
pub struct DualPair<'a> {
    pub first: (&'a Vec4, &'a Mat4),
    pub second: (&'a Vec4, &'a Mat4),
}

impl<'a> DualPair<'a> {
    pub fn new(first: (&'a Vec4, &'a Mat4), second: (&'a Vec4, &'a Mat4)) -> Self {
        Self { first, second }
    }

    /// Multiplies both problems in one dual-lane kernel call.
    ///
    /// # Panics
    ///
    /// Panics if the CPU lacks AVX or FMA.
    pub fn multiply(&self) -> (Vec4, Vec4) {
        crate::kernel::multiply_dual_256(self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<Vec4>(), 16);
        assert_eq!(std::mem::align_of::<Vec4>(), 16);
        assert_eq!(std::mem::size_of::<Mat4>(), 64);
        assert_eq!(std::mem::align_of::<Mat4>(), 32);
    }

    #[test]
    fn test_offset_in_place_and_by_value() {
        let mut v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let copy = v.offset_by(2.0);
        v.offset(1.0);
        assert_eq!(v, Vec4::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(copy, Vec4::new(3.0, 4.0, 5.0, 6.0));

        let mut m = Mat4::IDENTITY;
        let shifted = m.offset_by(1.0);
        assert_eq!(m, Mat4::IDENTITY);
        m.offset(1.0);
        assert_eq!(m, shifted);
        assert_eq!(m.rows[0], Vec4::new(2.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_accumulate() {
        let mut total = Vec4::ZERO;
        total += Vec4::new(1.0, 2.0, 3.0, 4.0);
        total += Vec4::splat(1.0);
        assert_eq!(total, Vec4::new(2.0, 3.0, 4.0, 5.0));
    }

    #[test]
    fn test_transpose() {
        let m = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        let t = m.transpose();
        assert_eq!(t.rows[0], Vec4::new(1.0, 5.0, 9.0, 13.0));
        assert_eq!(t.rows[3], Vec4::new(4.0, 8.0, 12.0, 16.0));
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_as_slice_is_row_major() {
        let m = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        let expected: Vec<f32> = (1..=16).map(|v| v as f32).collect();
        assert_eq!(m.as_slice(), expected.as_slice());
    }

    mod slice_view_tests {
        use super::*;

        #[test]
        fn test_vec4_view_of_aligned_storage() {
            let m = Mat4::IDENTITY;
            let row = Vec4::try_ref_from_slice(&m.as_slice()[4..8]).unwrap();
            assert_eq!(*row, Vec4::new(0.0, 1.0, 0.0, 0.0));
        }

        #[test]
        fn test_vec4_view_rejects_misaligned() {
            let m = Mat4::IDENTITY;
            let err = Vec4::try_ref_from_slice(&m.as_slice()[2..6]).unwrap_err();
            assert!(matches!(err, KernelError::Misaligned { required: 16, .. }));
        }

        #[test]
        fn test_mat4_view_requires_32_byte_alignment() {
            let storage = [Mat4::IDENTITY; 2];
            // SAFETY: two adjacent matrices are 32 contiguous floats.
            let flat = unsafe { std::slice::from_raw_parts(storage.as_ptr() as *const f32, 32) };
            assert!(Mat4::try_ref_from_slice(&flat[16..]).is_ok());
            let err = Mat4::try_ref_from_slice(&flat[4..20]).unwrap_err();
            assert!(matches!(err, KernelError::Misaligned { required: 32, .. }));
        }

        #[test]
        fn test_copy_from_short_slice() {
            let err = Vec4::try_from_slice(&[1.0, 2.0]).unwrap_err();
            assert_eq!(
                err,
                KernelError::LengthMismatch {
                    expected: 4,
                    actual: 2
                }
            );
            assert_eq!(
                Vec4::try_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(),
                Vec4::new(1.0, 2.0, 3.0, 4.0)
            );
        }
    }
}
