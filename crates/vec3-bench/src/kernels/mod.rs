//! `Vec3` addition kernels: scalar reference, portable batch emulation, SSE2
//! and NEON.
//!
//! Every backend shares one driver: full batches of [`vec3_add::BATCH`]
//! records go through a [`vec3_add::BatchKernel`], the 0-3 record tail is
//! added one component at a time.

// Kernel code indexes lanes by position and casts record pointers to `f32`.
#![allow(
    clippy::needless_range_loop,
    clippy::float_cmp,
    clippy::cast_ptr_alignment,
    unsafe_op_in_unsafe_fn
)]

pub mod ulp;
pub mod vec3_add;

pub use vec3_add::{
    BATCH, BatchKernel, Portable, add_batched, add_vectors, add_vectors_scalar, add_vectors_with,
    verify_sums,
};
