//! The interleaved `Vec3` record and the deterministic input generator.

use std::ops::Add;

/// One 3D vector stored as three contiguous `f32` (12 bytes, no padding).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Same value in every component.
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Per-component scale factors of input `a`.
pub const INPUT_A_SCALE: [f32; 3] = [0.1, 0.2, 0.3];
/// Per-component scale factors of input `b`.
pub const INPUT_B_SCALE: [f32; 3] = [0.4, 0.5, 0.6];

/// Record `i` of input `a`: `(0.1*i, 0.2*i, 0.3*i)`.
#[must_use]
pub fn input_a(i: usize) -> Vec3 {
    scaled(i, INPUT_A_SCALE)
}

/// Record `i` of input `b`: `(0.4*i, 0.5*i, 0.6*i)`.
#[must_use]
pub fn input_b(i: usize) -> Vec3 {
    scaled(i, INPUT_B_SCALE)
}

#[allow(clippy::cast_precision_loss)]
fn scaled(i: usize, [sx, sy, sz]: [f32; 3]) -> Vec3 {
    let t = i as f32;
    Vec3::new(t * sx, t * sy, t * sz)
}

/// Fill both input slices as a pure function of the index.
///
/// # Panics
/// Panics if `a.len() != b.len()`.
pub fn fill_inputs(a: &mut [Vec3], b: &mut [Vec3]) {
    assert_eq!(a.len(), b.len(), "fill_inputs: a.len() != b.len()");
    for (i, (ra, rb)) in a.iter_mut().zip(b.iter_mut()).enumerate() {
        *ra = input_a(i);
        *rb = input_b(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn layout_is_three_packed_floats() {
        assert_eq!(std::mem::size_of::<Vec3>(), 12);
        assert_eq!(std::mem::align_of::<Vec3>(), 4);
    }

    #[test]
    fn add_is_componentwise() {
        let s = Vec3::new(1.0, 2.0, 3.0) + Vec3::new(10.0, 20.0, 30.0);
        assert_eq!(s, Vec3::new(11.0, 22.0, 33.0));
    }

    #[test]
    fn first_records() {
        assert_eq!(input_a(0), Vec3::ZERO);
        assert_eq!(input_b(0), Vec3::ZERO);
        assert_eq!(input_a(1), Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(input_b(1), Vec3::new(0.4, 0.5, 0.6));
        assert_eq!(input_a(2), Vec3::new(2.0 * 0.1, 2.0 * 0.2, 2.0 * 0.3));
    }

    #[test]
    fn fill_writes_every_index() {
        let mut a = vec![Vec3::splat(-1.0); 9];
        let mut b = vec![Vec3::splat(-1.0); 9];
        fill_inputs(&mut a, &mut b);
        for i in 0..9 {
            assert_eq!(a[i], input_a(i));
            assert_eq!(b[i], input_b(i));
        }
    }

    #[test]
    #[should_panic(expected = "a.len() != b.len()")]
    fn fill_rejects_mismatched_lengths() {
        let mut a = vec![Vec3::ZERO; 2];
        let mut b = vec![Vec3::ZERO; 3];
        fill_inputs(&mut a, &mut b);
    }

    proptest! {
        #[test]
        fn prop_fill_is_deterministic(n in 0usize..512) {
            let mut a1 = vec![Vec3::ZERO; n];
            let mut b1 = vec![Vec3::ZERO; n];
            let mut a2 = vec![Vec3::splat(7.0); n];
            let mut b2 = vec![Vec3::splat(7.0); n];
            fill_inputs(&mut a1, &mut b1);
            fill_inputs(&mut a2, &mut b2);

            let bits = |v: &[Vec3]| -> Vec<u32> {
                v.iter().flat_map(|r| r.to_array()).map(f32::to_bits).collect()
            };
            prop_assert_eq!(bits(&a1[..]), bits(&a2[..]));
            prop_assert_eq!(bits(&b1[..]), bits(&b2[..]));
        }
    }
}
