//! Applying ordered transform lists to vertex buffers.
//!
//! The applicator always starts from the original, untransformed vertices and
//! returns a fresh buffer. Nothing is mutated in place, so a frame can never
//! compound the error of the previous one.
//!
//! Matrices are applied in slice order: `[a, b, c]` means `a` first. The
//! viewer's declared order is translation, rotation, scaling, projection;
//! [`TransformStack`] encodes it.
//!
//! ```
//! use transform_lab::pipeline::apply_homogeneous;
//! use transform_lab::transforms::translation;
//! use transform_lab::Vec3;
//!
//! let out = apply_homogeneous(&[Vec3::ONE], &[translation(1.0, 0.0, 0.0)]).unwrap();
//! assert_eq!(out, vec![Vec3::new(2.0, 1.0, 1.0)]);
//! ```

use glam::{Mat3, Mat4, Vec3};

use crate::transforms::TransformError;

/// Smallest `|w|` the homogeneous divide accepts.
pub const W_EPSILON: f32 = 1e-6;

/// Combines matrices so that the first one in the slice is applied first.
pub fn compose(matrices: &[Mat4]) -> Mat4 {
    matrices.iter().fold(Mat4::IDENTITY, |acc, m| *m * acc)
}

/// 3×3 counterpart of [`compose`].
pub fn compose_linear(matrices: &[Mat3]) -> Mat3 {
    matrices.iter().fold(Mat3::IDENTITY, |acc, m| *m * acc)
}

/// Applies linear transforms to every vertex.
pub fn apply_linear(original: &[Vec3], matrices: &[Mat3]) -> Vec<Vec3> {
    let m = compose_linear(matrices);
    original.iter().map(|v| m * *v).collect()
}

/// Applies homogeneous transforms to every vertex, then divides by `w`.
///
/// Fails with [`TransformError::DegenerateProjection`] on the first vertex
/// whose `w` is within [`W_EPSILON`] of zero or whose divided coordinates are
/// not finite.
pub fn apply_homogeneous(original: &[Vec3], matrices: &[Mat4]) -> Result<Vec<Vec3>, TransformError> {
    let m = compose(matrices);
    original
        .iter()
        .enumerate()
        .map(|(vertex, v)| {
            let h = m * v.extend(1.0);
            let projected = h.truncate() / h.w;
            if h.w.abs() < W_EPSILON || !projected.is_finite() {
                Err(TransformError::DegenerateProjection { vertex, w: h.w })
            } else {
                Ok(projected)
            }
        })
        .collect()
}

/// The four transform stages of the homogeneous viewer, in application order.
///
/// Stages default to the identity, so a stack only needs the ones it uses.
///
/// ```
/// use transform_lab::pipeline::TransformStack;
/// use transform_lab::transforms::{rotation_homogeneous, translation};
/// use transform_lab::Vec3;
///
/// let stack = TransformStack::new()
///     .translation(translation(0.0, 0.0, 1.0))
///     .rotation(rotation_homogeneous(Vec3::Y, std::f32::consts::FRAC_PI_2));
///
/// // Translated first, then rotated: (0, 0, 1) ends up on +X.
/// let out = stack.apply(&[Vec3::ZERO]).unwrap();
/// assert!(out[0].abs_diff_eq(Vec3::X, 1e-6));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformStack {
    pub translation: Mat4,
    pub rotation: Mat4,
    pub scaling: Mat4,
    pub projection: Mat4,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self {
            translation: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            scaling: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translation(mut self, m: Mat4) -> Self {
        self.translation = m;
        self
    }

    pub fn rotation(mut self, m: Mat4) -> Self {
        self.rotation = m;
        self
    }

    pub fn scaling(mut self, m: Mat4) -> Self {
        self.scaling = m;
        self
    }

    pub fn projection(mut self, m: Mat4) -> Self {
        self.projection = m;
        self
    }

    /// Stages in the order they are applied.
    pub fn matrices(&self) -> [Mat4; 4] {
        [self.translation, self.rotation, self.scaling, self.projection]
    }

    /// Single matrix equivalent to the whole stack.
    pub fn matrix(&self) -> Mat4 {
        compose(&self.matrices())
    }

    pub fn apply(&self, original: &[Vec3]) -> Result<Vec<Vec3>, TransformError> {
        apply_homogeneous(original, &self.matrices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::{
        isotropic_scaling, orthographic_projection, orthographic_projection_homogeneous,
        perspective_projection, rotation, rotation_homogeneous, scaling, translation,
    };
    use std::f32::consts::FRAC_PI_2;

    fn cloud() -> Vec<Vec3> {
        vec![
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(3.0, -1.0, 2.0),
            Vec3::new(-2.5, 4.0, 0.25),
        ]
    }

    fn all_close(a: &[Vec3], b: &[Vec3], eps: f32) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.abs_diff_eq(*y, eps))
    }

    #[test]
    fn empty_list_is_identity() {
        let original = cloud();
        assert_eq!(apply_homogeneous(&original, &[]).unwrap(), original);
        assert_eq!(apply_linear(&original, &[]), original);
    }

    #[test]
    fn translation_round_trip() {
        let original = cloud();
        let out = apply_homogeneous(
            &original,
            &[translation(1.5, -2.0, 4.0), translation(-1.5, 2.0, -4.0)],
        )
        .unwrap();
        assert!(all_close(&out, &original, 1e-5));
    }

    #[test]
    fn orthographic_projection_applied_twice_equals_once() {
        let original = cloud();
        let axis = Vec3::new(1.0, 2.0, -0.5);
        let once = apply_homogeneous(&original, &[orthographic_projection_homogeneous(axis, 0.0)])
            .unwrap();
        let twice = apply_homogeneous(
            &original,
            &[
                orthographic_projection_homogeneous(axis, 0.0),
                orthographic_projection_homogeneous(axis, 0.0),
            ],
        )
        .unwrap();
        assert!(all_close(&once, &twice, 1e-5));

        let once = apply_linear(&original, &[orthographic_projection(axis)]);
        let twice = apply_homogeneous(&once, &[Mat4::from_mat3(orthographic_projection(axis))])
            .unwrap();
        assert!(all_close(&once, &twice, 1e-5));
    }

    #[test]
    fn single_vertex_quarter_turn_about_y() {
        let out = apply_homogeneous(&[Vec3::X], &[rotation_homogeneous(Vec3::Y, FRAC_PI_2)])
            .unwrap();
        assert!(out[0].abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));

        let out = apply_linear(&[Vec3::X], &[rotation(Vec3::Y, FRAC_PI_2)]);
        assert!(out[0].abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn order_matters() {
        let t = translation(1.0, 0.0, 0.0);
        let r = rotation_homogeneous(Vec3::Y, FRAC_PI_2);
        let tr = apply_homogeneous(&[Vec3::ZERO], &[t, r]).unwrap();
        let rt = apply_homogeneous(&[Vec3::ZERO], &[r, t]).unwrap();
        assert!(tr[0].abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
        assert!(rt[0].abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn compose_matches_sequential_application() {
        let original = cloud();
        let stages = [
            translation(0.3, -1.0, 2.0),
            rotation_homogeneous(Vec3::new(1.0, 1.0, 0.0), 0.8),
            isotropic_scaling(1.7),
        ];
        let mut step = original.clone();
        for m in &stages {
            step = apply_homogeneous(&step, std::slice::from_ref(m)).unwrap();
        }
        let at_once = apply_homogeneous(&original, &stages).unwrap();
        assert!(all_close(&step, &at_once, 1e-4));
    }

    #[test]
    fn linear_and_homogeneous_agree() {
        let original = cloud();
        let axis = Vec3::new(0.2, -1.0, 0.4);
        let linear = apply_linear(&original, &[rotation(axis, 1.3), scaling(axis, 2.0)]);
        let homogeneous = apply_homogeneous(
            &original,
            &[
                Mat4::from_mat3(rotation(axis, 1.3)),
                Mat4::from_mat3(scaling(axis, 2.0)),
            ],
        )
        .unwrap();
        assert!(all_close(&linear, &homogeneous, 1e-5));
    }

    #[test]
    fn perspective_divides_by_depth() {
        let d = 2.0;
        let out = apply_homogeneous(
            &[Vec3::new(4.0, -2.0, 8.0)],
            &[perspective_projection(d).unwrap()],
        )
        .unwrap();
        assert!(out[0].abs_diff_eq(Vec3::new(1.0, -0.5, 2.0), 1e-6));
    }

    #[test]
    fn perspective_at_zero_depth_is_reported() {
        let points = [Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 0.0)];
        let err = apply_homogeneous(&points, &[perspective_projection(1.0).unwrap()]).unwrap_err();
        assert_eq!(err, TransformError::DegenerateProjection { vertex: 1, w: 0.0 });
    }

    #[test]
    fn stack_applies_in_declared_order() {
        let stack = TransformStack::new()
            .translation(translation(0.0, 0.0, 1.0))
            .rotation(rotation_homogeneous(Vec3::Y, FRAC_PI_2))
            .scaling(isotropic_scaling(2.0));
        let out = stack.apply(&[Vec3::ZERO]).unwrap();
        assert!(out[0].abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
        let expected = stack.matrix().transform_point3(Vec3::ZERO);
        assert!(out[0].abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn original_buffer_is_untouched() {
        let original = cloud();
        let snapshot = original.clone();
        let _ = apply_homogeneous(&original, &[isotropic_scaling(3.0)]).unwrap();
        assert_eq!(original, snapshot);
    }
}
