//! Kernel tiers and CPU feature detection.
//!
//! Every operation exists at up to four tiers:
//!
//! | Tier | Registers | Requires |
//! |------|-----------|----------|
//! | [`Tier::Scalar`] | none (portable) | nothing |
//! | [`Tier::Sse`] | 128-bit `__m128` | SSE4.1 |
//! | [`Tier::Fma`] | 256-bit row block, fused multiply-add | AVX + FMA |
//! | [`Tier::DualFma`] | 256-bit, two problems per register | AVX + FMA |
//!
//! The SIMD modules are compiled on every x86 target. Whether a tier may actually run
//! is decided at runtime by [`Tier::is_supported`]; the build script only records the
//! tier that matched the build machine, exposed as [`Tier::native`].

use std::fmt;
use std::str::FromStr;

use crate::error::{KernelError, Result};

pub mod scalar;

#[cfg_attr(
    not(any(target_arch = "x86", target_arch = "x86_64")),
    allow(dead_code)
)]
pub(crate) mod traits;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx2;

/// Which lanes take part in a dot product.
///
/// On the 128-bit tier this selects the `_mm_dp_ps` mask: `0x77` for three lanes
/// (inputs x, y, z; result broadcast to lanes 0–2) and `0xFF` for four lanes, where the
/// homogeneous w lane participates too.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DotLanes {
    /// x, y, z only.
    #[default]
    Three,
    /// x, y, z and w.
    Four,
}

impl DotLanes {
    pub const fn count(self) -> usize {
        match self {
            DotLanes::Three => 3,
            DotLanes::Four => 4,
        }
    }
}

/// A level of hardware parallelism a kernel can run at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Scalar,
    Sse,
    Fma,
    DualFma,
}

impl Tier {
    /// All tiers in escalating order.
    pub const ALL: [Tier; 4] = [Tier::Scalar, Tier::Sse, Tier::Fma, Tier::DualFma];

    pub const fn name(self) -> &'static str {
        match self {
            Tier::Scalar => "scalar",
            Tier::Sse => "sse",
            Tier::Fma => "fma",
            Tier::DualFma => "dual",
        }
    }

    /// CPU features the tier's kernels are compiled for.
    pub const fn features(self) -> &'static str {
        match self {
            Tier::Scalar => "none",
            Tier::Sse => "sse4.1",
            Tier::Fma | Tier::DualFma => "avx+fma",
        }
    }

    /// Checks at runtime whether this CPU can execute the tier.
    pub fn is_supported(self) -> bool {
        match self {
            Tier::Scalar => true,
            Tier::Sse => has_sse41(),
            Tier::Fma | Tier::DualFma => has_avx_fma(),
        }
    }

    pub fn ensure_supported(self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(KernelError::UnsupportedTier {
                tier: self,
                features: self.features(),
            })
        }
    }

    /// Tiers this CPU can execute, in escalating order.
    pub fn available() -> Vec<Tier> {
        Tier::ALL
            .into_iter()
            .filter(|tier| tier.is_supported())
            .collect()
    }

    /// The single-problem tier matching the CPU the crate was built on.
    pub fn native() -> Tier {
        if cfg!(avx_fma) {
            Tier::Fma
        } else if cfg!(sse) {
            Tier::Sse
        } else {
            Tier::Scalar
        }
    }

    /// The highest single-problem tier this CPU can execute.
    pub fn best() -> Tier {
        [Tier::Fma, Tier::Sse]
            .into_iter()
            .find(|tier| tier.is_supported())
            .unwrap_or(Tier::Scalar)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" | "fpu" => Ok(Tier::Scalar),
            "sse" | "128" => Ok(Tier::Sse),
            "fma" | "avx" | "256" => Ok(Tier::Fma),
            "dual" | "avx2" | "dual256" => Ok(Tier::DualFma),
            _ => Err(KernelError::UnknownTier(s.to_string())),
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn has_sse41() -> bool {
    is_x86_feature_detected!("sse4.1")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn has_sse41() -> bool {
    false
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn has_avx_fma() -> bool {
    is_x86_feature_detected!("avx") && is_x86_feature_detected!("fma")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn has_avx_fma() -> bool {
    false
}
