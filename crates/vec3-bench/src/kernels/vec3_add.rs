//! Element-wise addition of interleaved `Vec3` arrays.
//!
//! `out[i] = a[i] + b[i]` for every record. The batched path loads four
//! records from each input, de-interleaves them into `xs`, `ys` and `zs`
//! lanes, adds lane-wise and re-interleaves on store. Inputs keep their
//! array-of-structures layout; only the registers see component-major data.
//!
//! Backends:
//! - `fn add_vectors_scalar(...)` -- per-record reference (ground truth)
//! - [`Portable`] -- batch transform emulated with `[f32; 4]` lanes
//! - `Sse2` -- `_mm_shuffle_ps` transpose (x86_64)
//! - `Neon` -- `vld3q_f32` / `vst3q_f32` structure loads (aarch64)

use crate::capability::Backend;
use crate::vec3::Vec3;

/// Records per batch (four `f32` lanes per 128-bit register).
pub const BATCH: usize = 4;

/// One de-interleave / lane-wise add / re-interleave step over a batch.
pub trait BatchKernel {
    const BACKEND: Backend;

    /// Add one batch. Each slice must hold at least [`BATCH`] records; only
    /// the first [`BATCH`] are read or written.
    ///
    /// # Panics
    /// Panics if any slice is shorter than [`BATCH`].
    fn add_batch(a: &[Vec3], b: &[Vec3], out: &mut [Vec3]);
}

// ────────────────────────────────────────────────────────────────────────────
// Scalar reference
// ────────────────────────────────────────────────────────────────────────────

/// Per-record addition, also used for the tail of every batched backend.
///
/// # Panics
/// Panics if `a`, `b` and `out` differ in length.
pub fn add_vectors_scalar(a: &[Vec3], b: &[Vec3], out: &mut [Vec3]) {
    check_lengths(a, b, out);
    for ((ra, rb), ro) in a.iter().zip(b).zip(out.iter_mut()) {
        ro.x = ra.x + rb.x;
        ro.y = ra.y + rb.y;
        ro.z = ra.z + rb.z;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Driver and dispatch
// ────────────────────────────────────────────────────────────────────────────

/// Run `K` over every full batch, then finish the remainder per record.
///
/// # Panics
/// Panics if `a`, `b` and `out` differ in length.
pub fn add_batched<K: BatchKernel>(a: &[Vec3], b: &[Vec3], out: &mut [Vec3]) {
    check_lengths(a, b, out);
    let split = a.len() - a.len() % BATCH;
    let (a_body, a_tail) = a.split_at(split);
    let (b_body, b_tail) = b.split_at(split);
    let (out_body, out_tail) = out.split_at_mut(split);

    for ((ca, cb), co) in a_body
        .chunks_exact(BATCH)
        .zip(b_body.chunks_exact(BATCH))
        .zip(out_body.chunks_exact_mut(BATCH))
    {
        K::add_batch(ca, cb, co);
    }
    add_vectors_scalar(a_tail, b_tail, out_tail);
}

/// `out[i] = a[i] + b[i]` using the best backend for this CPU.
///
/// # Panics
/// Panics if `a`, `b` and `out` differ in length.
pub fn add_vectors(a: &[Vec3], b: &[Vec3], out: &mut [Vec3]) {
    add_vectors_with(Backend::detect(), a, b, out);
}

/// `out[i] = a[i] + b[i]` using a specific backend.
///
/// A backend that cannot run on this architecture falls back to
/// [`Portable`], so the result is always defined.
///
/// # Panics
/// Panics if `a`, `b` and `out` differ in length.
pub fn add_vectors_with(backend: Backend, a: &[Vec3], b: &[Vec3], out: &mut [Vec3]) {
    match backend {
        #[cfg(target_arch = "x86_64")]
        Backend::Sse2 => add_batched::<sse2::Sse2>(a, b, out),
        #[cfg(target_arch = "aarch64")]
        Backend::Neon => add_batched::<neon::Neon>(a, b, out),
        _ => add_batched::<Portable>(a, b, out),
    }
}

/// Index of the first record where `out` is not bit-identical to `a + b`.
///
/// # Panics
/// Panics if `a`, `b` and `out` differ in length.
#[must_use]
pub fn verify_sums(a: &[Vec3], b: &[Vec3], out: &[Vec3]) -> Option<usize> {
    assert_eq!(a.len(), b.len(), "verify_sums: a.len() != b.len()");
    assert_eq!(a.len(), out.len(), "verify_sums: a.len() != out.len()");
    a.iter().zip(b).zip(out).position(|((&ra, &rb), &ro)| {
        (ra + rb).to_array().map(f32::to_bits) != ro.to_array().map(f32::to_bits)
    })
}

fn check_lengths(a: &[Vec3], b: &[Vec3], out: &[Vec3]) {
    assert_eq!(a.len(), b.len(), "add_vectors: a.len() != b.len()");
    assert_eq!(a.len(), out.len(), "add_vectors: a.len() != out.len()");
}

// ────────────────────────────────────────────────────────────────────────────
// Portable batch transform
// ────────────────────────────────────────────────────────────────────────────

/// The batch transform spelled out with plain arrays as lanes.
pub struct Portable;

type Lanes = [[f32; BATCH]; 3];

fn deinterleave(batch: &[Vec3]) -> Lanes {
    let mut lanes = [[0.0; BATCH]; 3];
    for (i, v) in batch[..BATCH].iter().enumerate() {
        lanes[0][i] = v.x;
        lanes[1][i] = v.y;
        lanes[2][i] = v.z;
    }
    lanes
}

fn interleave(lanes: &Lanes, batch: &mut [Vec3]) {
    for (i, v) in batch[..BATCH].iter_mut().enumerate() {
        *v = Vec3::new(lanes[0][i], lanes[1][i], lanes[2][i]);
    }
}

impl BatchKernel for Portable {
    const BACKEND: Backend = Backend::Scalar;

    #[inline]
    fn add_batch(a: &[Vec3], b: &[Vec3], out: &mut [Vec3]) {
        let mut sum = deinterleave(a);
        let rhs = deinterleave(b);
        for c in 0..3 {
            for l in 0..BATCH {
                sum[c][l] += rhs[c][l];
            }
        }
        interleave(&sum, out);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SSE2 implementation
// ────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
mod sse2 {
    use std::arch::x86_64::{__m128, _mm_add_ps, _mm_loadu_ps, _mm_shuffle_ps, _mm_storeu_ps};

    use super::{BATCH, BatchKernel};
    use crate::capability::Backend;
    use crate::vec3::Vec3;

    /// `[p[i], p[i], q[j], q[j]]`
    macro_rules! pair {
        ($p:expr, $q:expr, $i:literal, $j:literal) => {
            _mm_shuffle_ps::<{ $i | ($i << 2) | ($j << 4) | ($j << 6) }>($p, $q)
        };
    }

    /// `[p[0], p[2], q[0], q[2]]`
    const EVENS: i32 = 0b10_00_10_00;

    /// Four records as three registers: `[x0 y0 z0 x1] [y1 z1 x2 y2] [z2 x3 y3 z3]`.
    #[target_feature(enable = "sse2")]
    unsafe fn load_batch(p: *const f32) -> [__m128; 3] {
        unsafe { [_mm_loadu_ps(p), _mm_loadu_ps(p.add(4)), _mm_loadu_ps(p.add(8))] }
    }

    #[target_feature(enable = "sse2")]
    unsafe fn store_batch(p: *mut f32, [r0, r1, r2]: [__m128; 3]) {
        unsafe {
            _mm_storeu_ps(p, r0);
            _mm_storeu_ps(p.add(4), r1);
            _mm_storeu_ps(p.add(8), r2);
        }
    }

    /// Interleaved registers to `[xs, ys, zs]`.
    #[target_feature(enable = "sse2")]
    unsafe fn deinterleave([r0, r1, r2]: [__m128; 3]) -> [__m128; 3] {
        unsafe {
            let xs = _mm_shuffle_ps::<EVENS>(pair!(r0, r0, 0, 3), pair!(r1, r2, 2, 1));
            let ys = _mm_shuffle_ps::<EVENS>(pair!(r0, r1, 1, 0), pair!(r1, r2, 3, 2));
            let zs = _mm_shuffle_ps::<EVENS>(pair!(r0, r1, 2, 1), pair!(r2, r2, 0, 3));
            [xs, ys, zs]
        }
    }

    /// `[xs, ys, zs]` back to interleaved registers.
    #[target_feature(enable = "sse2")]
    unsafe fn interleave([xs, ys, zs]: [__m128; 3]) -> [__m128; 3] {
        unsafe {
            let r0 = _mm_shuffle_ps::<EVENS>(pair!(xs, ys, 0, 0), pair!(zs, xs, 0, 1));
            let r1 = _mm_shuffle_ps::<EVENS>(pair!(ys, zs, 1, 1), pair!(xs, ys, 2, 2));
            let r2 = _mm_shuffle_ps::<EVENS>(pair!(zs, xs, 2, 3), pair!(ys, zs, 3, 3));
            [r0, r1, r2]
        }
    }

    #[target_feature(enable = "sse2")]
    unsafe fn add_batch_sse2(a: *const f32, b: *const f32, out: *mut f32) {
        unsafe {
            let [ax, ay, az] = deinterleave(load_batch(a));
            let [bx, by, bz] = deinterleave(load_batch(b));
            let sum = [_mm_add_ps(ax, bx), _mm_add_ps(ay, by), _mm_add_ps(az, bz)];
            store_batch(out, interleave(sum));
        }
    }

    pub struct Sse2;

    impl BatchKernel for Sse2 {
        const BACKEND: Backend = Backend::Sse2;

        #[inline]
        fn add_batch(a: &[Vec3], b: &[Vec3], out: &mut [Vec3]) {
            let (a, b, out) = (&a[..BATCH], &b[..BATCH], &mut out[..BATCH]);
            // SAFETY: SSE2 is part of the x86_64 baseline. Each slice is
            // exactly BATCH repr(C) records, i.e. 12 contiguous f32; loads
            // and stores are unaligned.
            unsafe {
                add_batch_sse2(
                    a.as_ptr().cast::<f32>(),
                    b.as_ptr().cast::<f32>(),
                    out.as_mut_ptr().cast::<f32>(),
                );
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// NEON implementation
// ────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "aarch64")]
mod neon {
    use std::arch::aarch64::{float32x4x3_t, vaddq_f32, vld3q_f32, vst3q_f32};

    use super::{BATCH, BatchKernel};
    use crate::capability::Backend;
    use crate::vec3::Vec3;

    pub struct Neon;

    impl BatchKernel for Neon {
        const BACKEND: Backend = Backend::Neon;

        #[inline]
        fn add_batch(a: &[Vec3], b: &[Vec3], out: &mut [Vec3]) {
            let (a, b, out) = (&a[..BATCH], &b[..BATCH], &mut out[..BATCH]);
            // SAFETY: NEON is mandatory on aarch64. Each slice is exactly
            // BATCH repr(C) records, i.e. 12 contiguous f32. vld3q/vst3q
            // de-interleave and re-interleave 3-element structures.
            unsafe {
                let va = vld3q_f32(a.as_ptr().cast::<f32>());
                let vb = vld3q_f32(b.as_ptr().cast::<f32>());
                let sum = float32x4x3_t(
                    vaddq_f32(va.0, vb.0),
                    vaddq_f32(va.1, vb.1),
                    vaddq_f32(va.2, vb.2),
                );
                vst3q_f32(out.as_mut_ptr().cast::<f32>(), sum);
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
