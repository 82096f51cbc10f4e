//! Throughput harness around [`add_vectors_with`].
//!
//! Owns the three aligned buffers for its whole lifetime, fills the inputs
//! once, times a fixed number of kernel calls and derives MFLOPS.

use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::buffer::AlignedBuffer;
use crate::capability::Backend;
use crate::error::Result;
use crate::kernels::{add_vectors_with, verify_sums};
use crate::vec3::{Vec3, fill_inputs};

/// Records per array.
pub const ARRAY_SIZE: usize = 250_000;
/// Timed kernel invocations.
pub const NUM_RUNS: usize = 500;
/// Byte alignment of every buffer.
pub const ALIGNMENT: usize = 16;
/// Scalar additions per record.
pub const FLOPS_PER_RECORD: u64 = 3;

const SEPARATOR: &str = "----------------------------------------";

/// Fixed benchmark parameters. `Default` yields the compiled-in constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    pub array_size: usize,
    pub runs: usize,
    pub alignment: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            array_size: ARRAY_SIZE,
            runs: NUM_RUNS,
            alignment: ALIGNMENT,
        }
    }
}

impl BenchConfig {
    /// `3 * N * R`, exact.
    #[must_use]
    pub fn total_flops(&self) -> u64 {
        FLOPS_PER_RECORD * self.array_size as u64 * self.runs as u64
    }
}

/// Buffers and parameters of one benchmark.
#[derive(Debug)]
pub struct Bench {
    config: BenchConfig,
    backend: Backend,
    a: AlignedBuffer,
    b: AlignedBuffer,
    out: AlignedBuffer,
}

impl Bench {
    /// Allocate and fill the buffers, using the detected backend.
    ///
    /// # Errors
    /// Returns an allocation error if any of the three buffers cannot be
    /// obtained; buffers already allocated are released.
    pub fn setup(config: BenchConfig) -> Result<Self> {
        Self::with_backend(config, Backend::detect())
    }

    /// Like [`Bench::setup`] with an explicit backend.
    ///
    /// # Errors
    /// Returns an allocation error if any of the three buffers cannot be
    /// obtained.
    pub fn with_backend(config: BenchConfig, backend: Backend) -> Result<Self> {
        let n = config.array_size;
        let mut a = AlignedBuffer::zeroed("input a", n, config.alignment)?;
        let mut b = AlignedBuffer::zeroed("input b", n, config.alignment)?;
        let out = AlignedBuffer::zeroed("output", n, config.alignment)?;
        fill_inputs(&mut a, &mut b);
        tracing::debug!(?config, %backend, "benchmark buffers ready");
        Ok(Self {
            config,
            backend,
            a,
            b,
            out,
        })
    }

    #[must_use]
    pub fn config(&self) -> BenchConfig {
        self.config
    }

    #[must_use]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// The two report lines printed before timing starts.
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "Benchmarking Vector3 Addition ({} Optimized)...\nArray Size: {} | Runs: {}",
            self.backend, self.config.array_size, self.config.runs
        )
    }

    #[must_use]
    pub fn inputs(&self) -> (&[Vec3], &[Vec3]) {
        (&self.a[..], &self.b[..])
    }

    /// Mutable inputs, for callers that replace the generated data.
    pub fn inputs_mut(&mut self) -> (&mut [Vec3], &mut [Vec3]) {
        (&mut self.a[..], &mut self.b[..])
    }

    #[must_use]
    pub fn output(&self) -> &[Vec3] {
        &self.out
    }

    /// Run the kernel `runs` times and measure the elapsed wall-clock time.
    ///
    /// After every call the whole output passes through an optimizer
    /// barrier and `output[0].x` is added to the sink.
    pub fn run(&mut self) -> BenchReport {
        let mut sink = 0.0f64;

        let start = Instant::now();
        for _ in 0..self.config.runs {
            add_vectors_with(self.backend, &self.a, &self.b, &mut self.out);
            let observed = black_box(&mut self.out[..]);
            sink += f64::from(observed.first().map_or(0.0, |r| r.x));
        }
        let elapsed = start.elapsed();

        let verified = match verify_sums(&self.a, &self.b, &self.out) {
            Some(index) => {
                tracing::warn!(index, backend = %self.backend, "output does not match a + b");
                false
            }
            None => true,
        };
        tracing::debug!(?elapsed, runs = self.config.runs, "timed loop finished");

        BenchReport {
            backend: self.backend,
            array_size: self.config.array_size,
            runs: self.config.runs,
            total: elapsed,
            total_flops: self.config.total_flops(),
            sink,
            verified,
        }
    }
}

/// Statistics of one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub backend: Backend,
    pub array_size: usize,
    pub runs: usize,
    pub total: Duration,
    pub total_flops: u64,
    pub sink: f64,
    /// Output matched `a + b` bit-for-bit after the last run.
    pub verified: bool,
}

impl BenchReport {
    #[must_use]
    pub fn total_secs(&self) -> f64 {
        self.total.as_secs_f64()
    }

    #[must_use]
    pub fn avg_secs(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.total_secs() / self.runs as f64
        }
    }

    #[must_use]
    pub fn mflops(&self) -> f64 {
        let secs = self.total_secs();
        if secs > 0.0 {
            self.total_flops as f64 / secs / 1e6
        } else {
            0.0
        }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "Total Time   : {:.6} seconds", self.total_secs())?;
        writeln!(f, "Avg Time/Run : {:.6} seconds", self.avg_secs())?;
        writeln!(f, "Throughput   : {:.2} MFLOPS", self.mflops())?;
        write!(f, "Sink Value   : {:.6}", self.sink)
    }
}
