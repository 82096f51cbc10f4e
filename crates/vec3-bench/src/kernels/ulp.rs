//! ULP (Unit in the Last Place) distance for comparing kernel output against
//! decimal expectations.
//!
//! Backends are compared with each other bit-for-bit. ULP tolerance is only
//! needed when the expected value is written as a decimal literal that `f32`
//! cannot represent exactly (`0.1 + 0.4` and so on).

use crate::vec3::Vec3;

/// Number of representable `f32` values between `a` and `b`.
///
/// NaN on either side, or a sign mismatch between non-zero values, yields
/// `u32::MAX`.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn ulp_distance(a: f32, b: f32) -> u32 {
    if a.is_nan() || b.is_nan() {
        return u32::MAX;
    }
    if a == b {
        return 0;
    }
    let (a_bits, b_bits) = (a.to_bits() as i32, b.to_bits() as i32);
    if (a_bits < 0) != (b_bits < 0) {
        return u32::MAX;
    }
    a_bits.abs_diff(b_bits)
}

/// Largest per-component ULP distance between two records.
#[must_use]
pub fn vec3_ulp_distance(a: Vec3, b: Vec3) -> u32 {
    a.to_array()
        .into_iter()
        .zip(b.to_array())
        .map(|(x, y)| ulp_distance(x, y))
        .max()
        .unwrap_or(0)
}

/// Assert that two record slices agree within `max_ulp` on every component.
///
/// # Panics
/// Panics on a length mismatch or on the first record outside tolerance.
pub fn assert_vec3_ulp_eq(actual: &[Vec3], expected: &[Vec3], max_ulp: u32) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "record count mismatch: {} vs {}",
        actual.len(),
        expected.len()
    );
    for (i, (&got, &want)) in actual.iter().zip(expected).enumerate() {
        let dist = vec3_ulp_distance(got, want);
        assert!(
            dist <= max_ulp,
            "record {i}: {got:?} vs {want:?} (ULP distance {dist}, max {max_ulp})"
        );
    }
}
