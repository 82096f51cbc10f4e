//! Owned, over-aligned storage for `Vec3` records.
//!
//! The harness needs three buffers on a 16-byte boundary for the wide loads
//! and stores of the SIMD kernels. `AlignedBuffer` obtains zeroed memory from
//! the global allocator with an explicit `Layout` and gives it back in `Drop`,
//! so every exit path after a successful allocation releases it.

use std::alloc::{self, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::error::{BenchError, Result};
use crate::vec3::Vec3;

/// A fixed-length, zero-initialised `[Vec3]` with a caller-chosen alignment.
pub struct AlignedBuffer {
    ptr: NonNull<Vec3>,
    len: usize,
    layout: Layout,
}

impl AlignedBuffer {
    /// Allocate `len` zeroed records aligned to at least `align` bytes.
    ///
    /// `name` identifies the buffer in error messages. The effective
    /// alignment never drops below `align_of::<Vec3>()`.
    ///
    /// # Errors
    /// Returns [`BenchError::Layout`] if the size overflows or `align` is not
    /// a power of two, and [`BenchError::Allocation`] if the allocator fails.
    pub fn zeroed(name: &'static str, len: usize, align: usize) -> Result<Self> {
        let layout_err = || BenchError::Layout {
            buffer: name,
            len,
            align,
        };
        let bytes = len
            .checked_mul(size_of::<Vec3>())
            .ok_or_else(layout_err)?;
        let layout = Layout::from_size_align(bytes, align.max(align_of::<Vec3>()))
            .map_err(|_| layout_err())?;

        let ptr = if layout.size() == 0 {
            // Zero-sized allocations are not allowed; any aligned non-null
            // pointer is a valid base for an empty slice.
            NonNull::new(std::ptr::without_provenance_mut::<Vec3>(layout.align()))
        } else {
            // SAFETY: layout has non-zero size.
            NonNull::new(unsafe { alloc::alloc_zeroed(layout) }.cast::<Vec3>())
        }
        .ok_or(BenchError::Allocation {
            buffer: name,
            bytes,
            align: layout.align(),
        })?;

        tracing::debug!(
            buffer = name,
            len,
            bytes,
            align = layout.align(),
            "allocated aligned buffer"
        );
        Ok(Self { ptr, len, layout })
    }

    /// Alignment the buffer was allocated with.
    #[must_use]
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    /// Size of the record storage in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.layout.size()
    }
}

impl Deref for AlignedBuffer {
    type Target = [Vec3];

    fn deref(&self) -> &[Vec3] {
        // SAFETY: ptr is non-null, aligned for Vec3 and covers `len` zeroed
        // records (all-zero bits are a valid Vec3), owned by `self`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for AlignedBuffer {
    fn deref_mut(&mut self) -> &mut [Vec3] {
        // SAFETY: as in `deref`; `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: ptr came from `alloc_zeroed` with this exact layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout) };
        }
    }
}

impl std::fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("align", &self.layout.align())
            .finish_non_exhaustive()
    }
}
