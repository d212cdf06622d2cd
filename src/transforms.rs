//! Matrix builders for rotation, scaling, projection and translation.
//!
//! Every builder comes in the flavour the exercises use it in: 3×3 [`Mat3`]
//! for the purely linear viewer and homogeneous 4×4 [`Mat4`] once translation
//! and perspective enter the picture.
//!
//! # Conventions
//!
//! Matrices act on column vectors: `v' = M * v`. Applying `A` then `B` is the
//! product `B * A`. [`pipeline`](crate::pipeline) takes care of that ordering.
//!
//! Axis arguments do not need to be unit length; each builder normalizes them.
//! A zero axis normalizes to zero, which turns rotations into a uniform
//! `cos θ` scale and scalings/projections into the identity.
//!
//! Rotations are right-handed: looking down the axis towards the origin,
//! positive angles turn counter-clockwise. The 3×3 and 4×4 variants share a
//! single implementation, so they cannot disagree on signs.
//!
//! ```
//! use transform_lab::transforms::rotation_homogeneous;
//! use transform_lab::{Vec3, Vec4};
//!
//! let quarter = rotation_homogeneous(Vec3::Y, std::f32::consts::FRAC_PI_2);
//! let p = quarter * Vec4::new(1.0, 0.0, 0.0, 1.0);
//! assert!(p.abs_diff_eq(Vec4::new(0.0, 0.0, -1.0, 1.0), 1e-6));
//! ```

use glam::{Mat3, Mat4, Vec3, Vec4};

use crate::vector::normalize;

/// Errors raised while building or applying transforms.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    /// The perspective focal distance was zero or not finite.
    #[error("invalid focal distance {0}: must be finite and non-zero")]
    InvalidFocalDistance(f32),
    /// A vertex ended up with a homogeneous `w` too close to zero to divide by.
    #[error("degenerate projection at vertex {vertex}: w = {w}")]
    DegenerateProjection { vertex: usize, w: f32 },
}

/// Outer product `n nᵀ`.
fn outer(n: Vec3) -> Mat3 {
    Mat3::from_cols(n * n.x, n * n.y, n * n.z)
}

/// Skew-symmetric matrix `[n]×`, so that `[n]× v == n × v`.
fn skew(n: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, n.z, -n.y),
        Vec3::new(-n.z, 0.0, n.x),
        Vec3::new(n.y, -n.x, 0.0),
    )
}

/// Rotation by `theta` radians about `axis` (Rodrigues' formula).
///
/// `R = cosθ I + (1 - cosθ) n nᵀ + sinθ [n]×`
pub fn rotation(axis: Vec3, theta: f32) -> Mat3 {
    let n = normalize(axis);
    let (sin_t, cos_t) = theta.sin_cos();
    Mat3::IDENTITY * cos_t + outer(n) * (1.0 - cos_t) + skew(n) * sin_t
}

/// [`rotation`] embedded in a homogeneous matrix.
pub fn rotation_homogeneous(axis: Vec3, theta: f32) -> Mat4 {
    Mat4::from_mat3(rotation(axis, theta))
}

/// Scales by `k` along `axis` and leaves the orthogonal plane untouched.
///
/// `S = I + (k - 1) n nᵀ`. `k = 0` flattens onto the plane orthogonal to the
/// axis; negative `k` mirrors across it.
pub fn scaling(axis: Vec3, k: f32) -> Mat3 {
    let n = normalize(axis);
    Mat3::IDENTITY + outer(n) * (k - 1.0)
}

/// [`scaling`] embedded in a homogeneous matrix.
pub fn scaling_homogeneous(axis: Vec3, k: f32) -> Mat4 {
    Mat4::from_mat3(scaling(axis, k))
}

/// Uniform scale `diag(k, k, k, 1)`.
pub fn isotropic_scaling(k: f32) -> Mat4 {
    Mat4::from_diagonal(Vec4::new(k, k, k, 1.0))
}

/// Projects onto the plane through the origin orthogonal to `axis`.
///
/// `P = I - n nᵀ`. Idempotent and singular.
pub fn orthographic_projection(axis: Vec3) -> Mat3 {
    let n = normalize(axis);
    Mat3::IDENTITY - outer(n)
}

/// Homogeneous orthographic projection, followed by a lift of `offset` along Y.
///
/// The offset places the flattened geometry on a ground plane at that height.
pub fn orthographic_projection_homogeneous(axis: Vec3, offset: f32) -> Mat4 {
    translation(0.0, offset, 0.0) * Mat4::from_mat3(orthographic_projection(axis))
}

/// Perspective projection with focal distance `d`.
///
/// The identity with its last row replaced by `[0, 0, 1/d, 0]`: after the
/// multiply, `w = z / d`, so the homogeneous divide lands every point on the
/// plane `z = d`.
pub fn perspective_projection(d: f32) -> Result<Mat4, TransformError> {
    if d == 0.0 || !d.is_finite() {
        return Err(TransformError::InvalidFocalDistance(d));
    }

    Ok(Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0 / d),
        Vec4::new(0.0, 0.0, 0.0, 0.0),
    ))
}

/// Translation by `(tx, ty, tz)`, stored in the last column.
pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(tx, ty, tz))
}
