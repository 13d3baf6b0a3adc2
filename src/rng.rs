//! Seeded input generation for benchmarks and randomized tests.
//!
//! There is no global generator. A [`SeedGen`] is built explicitly and handed to
//! whoever needs inputs, so a run is reproducible from its seed.

use std::f32::consts::PI;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::quat::Quat;
use crate::types::{Mat4, Vec4};

#[derive(Clone, Debug)]
pub struct SeedGen {
    rng: StdRng,
}

impl SeedGen {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Uniform sample from `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty.
    pub fn next_f32(&mut self, range: Range<f32>) -> f32 {
        self.rng.random_range(range)
    }

    pub fn vec4(&mut self, range: Range<f32>) -> Vec4 {
        Vec4(std::array::from_fn(|_| self.next_f32(range.clone())))
    }

    pub fn mat4(&mut self, range: Range<f32>) -> Mat4 {
        Mat4 {
            rows: std::array::from_fn(|_| self.vec4(range.clone())),
        }
    }

    /// A unit quaternion with a random axis and an angle in `[-π, π)`.
    pub fn unit_quat(&mut self) -> Quat {
        let axis = loop {
            let candidate = self.vec4(-1.0..1.0).with_w(0.0);
            if candidate.length() > 1e-3 {
                break candidate;
            }
        };
        let angle = self.next_f32(-PI..PI);
        Quat::from_axis_angle(&axis, angle)
    }
}
