//! Iterative benchmark and cross-tier equivalence driver.
//!
//! Every run starts from the same vector and matrix. Each iteration multiplies, adds
//! the product into a running total, then offsets both inputs by the configured
//! increment. Because every tier walks the same input sequence, their totals must agree
//! up to reassociation error; [`verify_equivalence`] checks that.
//!
//! The dual-lane tier walks the sequence two iterations per kernel call: the second
//! problem is the first offset by one increment, and both are then advanced by two. An
//! odd trailing iteration runs on the single-lane FMA kernel.

use std::time::{Duration, Instant};

use approx::relative_eq;
use tracing::{debug, info, warn};

use crate::error::{KernelError, Result};
use crate::kernel;
use crate::simd::{DotLanes, Tier};
use crate::types::{Mat4, Vec4};

/// Relative tolerance used when comparing tier totals.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// Starting point and step of a harness run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HarnessConfig {
    pub iterations: usize,
    /// Added to every vector and matrix element after each iteration.
    pub increment: f32,
    pub vec: Vec4,
    pub mat: Mat4,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            increment: 1.0,
            vec: Vec4::new(1.0, 2.0, 3.0, 4.0),
            mat: Mat4::from_rows([
                [1.0, 5.0, 9.0, 13.0],
                [2.0, 6.0, 10.0, 14.0],
                [3.0, 7.0, 11.0, 15.0],
                [4.0, 8.0, 12.0, 16.0],
            ]),
        }
    }
}

impl HarnessConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_increment(mut self, increment: f32) -> Self {
        self.increment = increment;
        self
    }

    pub fn with_vec(mut self, vec: Vec4) -> Self {
        self.vec = vec;
        self
    }

    pub fn with_mat(mut self, mat: Mat4) -> Self {
        self.mat = mat;
        self
    }
}

/// Outcome of one harness run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HarnessReport {
    pub tier: Tier,
    /// Sum of every product the run computed.
    pub total: Vec4,
    pub iterations: usize,
    /// Dual-lane kernel calls (dual tier only).
    pub dual_calls: usize,
    /// Single-problem kernel calls.
    pub single_calls: usize,
    pub elapsed: Duration,
}

/// Runs the harness on one tier.
///
/// Fails with [`KernelError::UnsupportedTier`] if the CPU cannot execute `tier`.
pub fn run(tier: Tier, config: &HarnessConfig) -> Result<HarnessReport> {
    tier.ensure_supported()?;
    debug!(
        %tier,
        iterations = config.iterations,
        increment = config.increment,
        "starting harness run"
    );

    let start = Instant::now();
    let (total, dual_calls, single_calls) = match tier {
        Tier::DualFma => run_paired(config),
        single => (run_single(single, config), 0, config.iterations),
    };
    let elapsed = start.elapsed();

    info!(%tier, %total, ?elapsed, "harness total");

    Ok(HarnessReport {
        tier,
        total,
        iterations: config.iterations,
        dual_calls,
        single_calls,
        elapsed,
    })
}

fn run_single(tier: Tier, config: &HarnessConfig) -> Vec4 {
    let mut vec = config.vec;
    let mut mat = config.mat;
    let mut total = Vec4::ZERO;

    for _ in 0..config.iterations {
        total += kernel::multiply(tier, &vec, &mat);
        mat.offset(config.increment);
        vec.offset(config.increment);
    }

    total
}

fn run_paired(config: &HarnessConfig) -> (Vec4, usize, usize) {
    let mut vec = config.vec;
    let mut mat = config.mat;
    let mut total = Vec4::ZERO;
    let step = 2.0 * config.increment;

    let pairs = config.iterations / 2;
    for _ in 0..pairs {
        let vec2 = vec.offset_by(config.increment);
        let mat2 = mat.offset_by(config.increment);

        let (result, result2) = kernel::multiply_dual_256((&vec, &mat), (&vec2, &mat2));
        total += result;
        total += result2;

        mat.offset(step);
        vec.offset(step);
    }

    let mut single_calls = 0;
    if config.iterations % 2 == 1 {
        total += kernel::multiply_256_fma(&vec, &mat);
        single_calls = 1;
    }

    (total, pairs, single_calls)
}

/// Sums `dot(a, b)` over `iterations`, starting from a = b = (1, 2, 3, 0) and offsetting
/// both by 1.0 after each step.
///
/// The dot product only exists on the scalar and 128-bit tiers; the 256-bit tiers use
/// the 128-bit kernel.
///
/// # Panics
///
/// Panics if a SIMD tier is requested on a CPU without SSE4.1.
pub fn run_dot(tier: Tier, iterations: usize, lanes: DotLanes) -> f32 {
    let mut a = Vec4::new(1.0, 2.0, 3.0, 0.0);
    let mut b = a;
    let mut sum = 0.0;

    for _ in 0..iterations {
        sum += match tier {
            Tier::Scalar => kernel::dot_scalar(&a, &b, lanes),
            Tier::Sse | Tier::Fma | Tier::DualFma => kernel::dot(&a, &b, lanes),
        };
        a.offset(1.0);
        b.offset(1.0);
    }

    debug!(%tier, lanes = lanes.count(), iterations, sum, "dot harness");
    sum
}

/// Runs every tier this CPU supports, in escalating order.
pub fn run_all(config: &HarnessConfig) -> Result<Vec<HarnessReport>> {
    let mut reports = Vec::with_capacity(Tier::ALL.len());

    for tier in Tier::ALL {
        if !tier.is_supported() {
            warn!(%tier, features = tier.features(), "skipping unsupported tier");
            continue;
        }
        reports.push(run(tier, config)?);
    }

    Ok(reports)
}

/// Checks every report's total against the first one, lane by lane.
///
/// Lanes match when their relative difference is within `tolerance`.
pub fn verify_equivalence(reports: &[HarnessReport], tolerance: f32) -> Result<()> {
    let Some((reference, rest)) = reports.split_first() else {
        return Ok(());
    };

    for report in rest {
        let lanes = reference.total.0.iter().zip(report.total.0.iter());
        for (lane, (&expected, &actual)) in lanes.enumerate() {
            if !relative_eq!(actual, expected, max_relative = tolerance) {
                return Err(KernelError::Divergence {
                    tier: report.tier,
                    lane,
                    expected,
                    actual,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_STEP_TOTAL: Vec4 = Vec4::new(170.0, 338.0, 506.0, 674.0);

    fn report(tier: Tier, total: Vec4) -> HarnessReport {
        HarnessReport {
            tier,
            total,
            iterations: 0,
            dual_calls: 0,
            single_calls: 0,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.increment, 1.0);
        assert_eq!(config.vec, Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(config.mat.rows[0], Vec4::new(1.0, 5.0, 9.0, 13.0));
    }

    #[test]
    fn test_builders() {
        let config = HarnessConfig::default()
            .with_iterations(7)
            .with_increment(0.5)
            .with_vec(Vec4::ZERO)
            .with_mat(Mat4::IDENTITY);
        assert_eq!(config.iterations, 7);
        assert_eq!(config.increment, 0.5);
        assert_eq!(config.vec, Vec4::ZERO);
        assert_eq!(config.mat, Mat4::IDENTITY);
    }

    #[test]
    fn test_three_iterations_every_tier() {
        let config = HarnessConfig::default().with_iterations(3);
        for tier in Tier::available() {
            let report = run(tier, &config).unwrap();
            assert_eq!(report.total, THREE_STEP_TOTAL, "tier {tier}");
            assert_eq!(report.iterations, 3);
        }
    }

    #[test]
    fn test_dual_call_counts() {
        if !Tier::DualFma.is_supported() {
            return;
        }
        let odd = run(Tier::DualFma, &HarnessConfig::default().with_iterations(3)).unwrap();
        assert_eq!((odd.dual_calls, odd.single_calls), (1, 1));

        let even = run(Tier::DualFma, &HarnessConfig::default().with_iterations(4)).unwrap();
        assert_eq!((even.dual_calls, even.single_calls), (2, 0));

        let one = run(Tier::DualFma, &HarnessConfig::default().with_iterations(1)).unwrap();
        assert_eq!((one.dual_calls, one.single_calls), (0, 1));
        assert_eq!(one.total, Vec4::new(30.0, 70.0, 110.0, 150.0));
    }

    #[test]
    fn test_zero_iterations() {
        let report = run(Tier::Scalar, &HarnessConfig::default().with_iterations(0)).unwrap();
        assert_eq!(report.total, Vec4::ZERO);
        assert_eq!(report.single_calls, 0);
    }

    #[test]
    fn test_run_dot_scalar() {
        assert_eq!(run_dot(Tier::Scalar, 3, DotLanes::Four), 98.0);
        assert_eq!(run_dot(Tier::Scalar, 3, DotLanes::Three), 93.0);
    }

    #[test]
    fn test_run_dot_sse() {
        if !Tier::Sse.is_supported() {
            return;
        }
        assert_eq!(run_dot(Tier::Sse, 3, DotLanes::Four), 98.0);
        assert_eq!(run_dot(Tier::Sse, 3, DotLanes::Three), 93.0);
    }

    #[test]
    fn test_run_all_agrees() {
        let reports = run_all(&HarnessConfig::default()).unwrap();
        assert_eq!(reports.len(), Tier::available().len());
        assert_eq!(reports[0].tier, Tier::Scalar);
        verify_equivalence(&reports, DEFAULT_TOLERANCE).unwrap();
    }

    #[test]
    fn test_verify_equivalence_reports_divergence() {
        let reports = [
            report(Tier::Scalar, THREE_STEP_TOTAL),
            report(Tier::Sse, Vec4::new(170.0, 338.0, 507.0, 674.0)),
        ];
        let err = verify_equivalence(&reports, DEFAULT_TOLERANCE).unwrap_err();
        assert_eq!(
            err,
            KernelError::Divergence {
                tier: Tier::Sse,
                lane: 2,
                expected: 506.0,
                actual: 507.0,
            }
        );
    }

    #[test]
    fn test_verify_equivalence_empty_and_single() {
        assert!(verify_equivalence(&[], DEFAULT_TOLERANCE).is_ok());
        assert!(verify_equivalence(&[report(Tier::Fma, THREE_STEP_TOTAL)], 0.0).is_ok());
    }
}
