//! Runtime selection of the wide-register backend.
//!
//! Each backend is one implementation of the batch transform in
//! [`crate::kernels::vec3_add`]. Detection runs once per process and is cached.

use std::fmt;
use std::sync::OnceLock;

/// Instruction-set backends for the batched `Vec3` add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Backend {
    /// Portable lane emulation, available everywhere.
    Scalar,
    /// SSE2 (128-bit, x86_64 baseline)
    Sse2,
    /// ARM NEON (128-bit, aarch64 baseline)
    Neon,
}

impl Backend {
    pub const ALL: [Self; 3] = [Self::Scalar, Self::Sse2, Self::Neon];

    /// Best backend for the running CPU, detected on first call.
    pub fn detect() -> Self {
        static DETECTED: OnceLock<Backend> = OnceLock::new();
        *DETECTED.get_or_init(|| {
            let backend = Self::ALL
                .into_iter()
                .rev()
                .find(|b| b.is_available())
                .unwrap_or(Self::Scalar);
            tracing::debug!(%backend, arch = std::env::consts::ARCH, "selected vec3 add backend");
            backend
        })
    }

    /// Whether this backend can run on the current CPU.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Self::Scalar => true,
            Self::Sse2 => sse2_detected(),
            Self::Neon => neon_detected(),
        }
    }

    /// Every backend runnable on this host, scalar first.
    #[must_use]
    pub fn supported() -> Vec<Self> {
        Self::ALL.into_iter().filter(|b| b.is_available()).collect()
    }

    /// Label used in the report header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Scalar => "Scalar",
            Self::Sse2 => "SSE2",
            Self::Neon => "NEON",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(target_arch = "x86_64")]
fn sse2_detected() -> bool {
    is_x86_feature_detected!("sse2")
}

#[cfg(not(target_arch = "x86_64"))]
fn sse2_detected() -> bool {
    false
}

#[cfg(target_arch = "aarch64")]
fn neon_detected() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(not(target_arch = "aarch64"))]
fn neon_detected() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_always_available() {
        assert!(Backend::Scalar.is_available());
        assert_eq!(Backend::supported()[0], Backend::Scalar);
    }

    #[test]
    fn detect_is_available_and_stable() {
        let b = Backend::detect();
        assert!(b.is_available());
        assert_eq!(b, Backend::detect());
    }

    #[test]
    fn detect_picks_widest_supported() {
        let best = *Backend::supported().last().unwrap();
        assert_eq!(Backend::detect(), best);
    }

    #[test]
    fn labels() {
        assert_eq!(Backend::Neon.to_string(), "NEON");
        assert_eq!(Backend::Sse2.to_string(), "SSE2");
        assert_eq!(Backend::Scalar.to_string(), "Scalar");
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn x86_64_has_sse2() {
        assert_eq!(Backend::detect(), Backend::Sse2);
        assert!(!Backend::Neon.is_available());
    }

    #[cfg(target_arch = "aarch64")]
    #[test]
    fn aarch64_has_neon() {
        assert_eq!(Backend::detect(), Backend::Neon);
        assert!(!Backend::Sse2.is_available());
    }
}
