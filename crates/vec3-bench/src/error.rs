use thiserror::Error;

/// Failures of the benchmark harness.
///
/// Both variants are allocation failures: either the allocator refused the
/// request, or the requested size and alignment never formed a valid layout.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to allocate {buffer} buffer ({bytes} bytes, {align}-byte aligned)")]
    Allocation {
        buffer: &'static str,
        bytes: usize,
        align: usize,
    },

    #[error("invalid layout for {buffer} buffer: {len} records with {align}-byte alignment")]
    Layout {
        buffer: &'static str,
        len: usize,
        align: usize,
    },
}

impl BenchError {
    /// Name of the buffer whose allocation failed.
    #[must_use]
    pub fn buffer(&self) -> &'static str {
        match self {
            Self::Allocation { buffer, .. } | Self::Layout { buffer, .. } => buffer,
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
