//! Error types for quadlane.
//!
//! Kernels themselves never fail: their preconditions (CPU features, alignment) are
//! enforced by the types or by fatal assertions. `KernelError` only appears where raw
//! data or user input crosses into the crate, and where the harness compares tiers.

use thiserror::Error;

use crate::simd::Tier;

/// Errors reported at validation boundaries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// A raw buffer does not satisfy the alignment the target type needs.
    #[error("misaligned buffer at {address:#x}: {required}-byte alignment required")]
    Misaligned {
        /// Address of the first element.
        address: usize,
        /// Required alignment in bytes.
        required: usize,
    },

    /// Two inputs that must pair up element-for-element have different lengths.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The running CPU lacks the features a tier needs.
    #[error("{tier} tier is not supported on this CPU (requires {features})")]
    UnsupportedTier { tier: Tier, features: &'static str },

    /// A tier name could not be parsed.
    #[error("unknown tier: {0:?} (expected one of scalar, sse, fma, dual)")]
    UnknownTier(String),

    /// Two tiers produced running totals that disagree beyond tolerance.
    #[error("{tier} tier diverged at lane {lane}: expected {expected}, got {actual}")]
    Divergence {
        tier: Tier,
        lane: usize,
        expected: f32,
        actual: f32,
    },
}

/// Result type alias for quadlane operations.
pub type Result<T> = std::result::Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misaligned_display() {
        let error = KernelError::Misaligned {
            address: 0x1004,
            required: 16,
        };
        let display = error.to_string();
        assert!(display.contains("0x1004"));
        assert!(display.contains("16-byte alignment"));
    }

    #[test]
    fn test_unsupported_tier_display() {
        let error = KernelError::UnsupportedTier {
            tier: Tier::DualFma,
            features: "avx+fma",
        };
        let display = error.to_string();
        assert!(display.contains("dual"));
        assert!(display.contains("avx+fma"));
    }

    #[test]
    fn test_divergence_display() {
        let error = KernelError::Divergence {
            tier: Tier::Sse,
            lane: 2,
            expected: 1.0,
            actual: 2.0,
        };
        assert_eq!(
            error.to_string(),
            "sse tier diverged at lane 2: expected 1, got 2"
        );
    }

    #[test]
    fn test_error_equality() {
        let a = KernelError::LengthMismatch {
            expected: 4,
            actual: 3,
        };
        let b = KernelError::LengthMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(a, b);
        assert_ne!(a, KernelError::UnknownTier("avx512".into()));
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = KernelError::UnknownTier("neon".into());
        let _: &dyn std::error::Error = &error;
        assert!(std::error::Error::source(&error).is_none());
    }
}
