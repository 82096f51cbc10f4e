//! # vec3-bench
//!
//! Throughput of adding two arrays of interleaved 3-component `f32` vectors
//! with 128-bit SIMD, plus the harness that measures it.
//!
//! ## Modules
//!
//! - [`vec3`]: the `Vec3` record and the deterministic input generator
//! - [`buffer`]: 16-byte aligned, owned record storage
//! - [`capability`]: runtime backend detection (Scalar, SSE2, NEON)
//! - [`kernels`]: the batched de-interleaving add and its scalar reference
//! - [`harness`]: allocation, timed loop, sink and MFLOPS report
//! - [`error`]: allocation failures

pub mod buffer;
pub mod capability;
pub mod error;
pub mod harness;
pub mod kernels;
pub mod vec3;

pub use capability::Backend;
pub use error::{BenchError, Result};
pub use harness::{Bench, BenchConfig, BenchReport};
pub use kernels::add_vectors;
pub use vec3::Vec3;
