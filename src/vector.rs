//! Vector algebra on [`Vec3`].
//!
//! These are the building blocks every other module leans on: the FOV test,
//! the matrix builders (axis normalization) and the scene helpers.
//!
//! The functions are written out component by component rather than forwarded
//! to glam so the formulas stay visible next to their tests.
//!
//! # Degenerate input
//!
//! [`normalize`] maps the zero vector to the zero vector. Callers must not
//! assume a unit vector comes back.
//!
//! ```
//! use transform_lab::{Vec3, vector};
//!
//! assert_eq!(vector::normalize(Vec3::ZERO), Vec3::ZERO);
//! assert_eq!(vector::cross(Vec3::X, Vec3::Y), Vec3::Z);
//! ```

use glam::Vec3;

/// Sum of the componentwise products.
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Right-handed cross product.
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

/// Euclidean length, `sqrt(dot(v, v))`.
pub fn length(v: Vec3) -> f32 {
    dot(v, v).sqrt()
}

/// Returns `v / length(v)`, or the zero vector when `v` has zero length.
pub fn normalize(v: Vec3) -> Vec3 {
    let len = length(v);
    if len != 0.0 {
        Vec3::new(v.x / len, v.y / len, v.z / len)
    } else {
        Vec3::ZERO
    }
}

/// Rotates `v` about the +Y axis by `angle` radians.
///
/// Uses `x' = x cosθ + z sinθ`, `z' = -x sinθ + z cosθ`, which agrees with
/// [`rotation`](crate::transforms::rotation) about `Vec3::Y`: a quarter turn
/// takes `+X` to `-Z`.
pub fn rotate_about_y(v: Vec3, angle: f32) -> Vec3 {
    let (sin_a, cos_a) = angle.sin_cos();
    Vec3::new(v.x * cos_a + v.z * sin_a, v.y, -v.x * sin_a + v.z * cos_a)
}
