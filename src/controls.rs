//! Per-frame controls of the linear and homogeneous transform exercises.
//!
//! The widgets panel edits a [`TransformControls`] in place; the scene turns
//! the current values into matrices every frame.

use glam::{Mat3, Vec3};

use crate::pipeline::TransformStack;
use crate::transforms::{
    TransformError, orthographic_projection, orthographic_projection_homogeneous,
    perspective_projection, rotation, rotation_homogeneous, scaling, scaling_homogeneous,
    translation,
};

/// Projection picked by the homogeneous exercise's projection slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionMode {
    None,
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    /// Maps the `[-1, 1]` slider: its left end means no projection, its right
    /// end perspective, and anything strictly in between orthographic.
    pub fn from_slider(value: f32) -> Self {
        if value >= 1.0 {
            ProjectionMode::Perspective
        } else if value > -1.0 {
            ProjectionMode::Orthographic
        } else {
            ProjectionMode::None
        }
    }
}

/// Slider and checkbox state for the transform exercises.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformControls {
    /// Scale factor along the axis, in `[0.4, 10]`.
    pub scale: f32,
    /// Rotation about the axis, degrees in `[0, 360]`.
    pub angle_degrees: f32,
    /// Shared axis for rotation, scaling and orthographic projection.
    pub axis: Vec3,
    /// Translation, each component in `[-5, 5]`.
    pub translation: Vec3,
    /// Linear exercise: project onto the plane orthogonal to the axis.
    pub orthographic: bool,
    /// Homogeneous exercise: projection slider in `[-1, 1]`.
    pub projection: f32,
    /// Homogeneous exercise: perspective focal distance in `[1, 8]`.
    pub focal_distance: f32,
}

impl Default for TransformControls {
    fn default() -> Self {
        Self {
            scale: 1.0,
            angle_degrees: 0.0,
            axis: Vec3::X,
            translation: Vec3::ZERO,
            orthographic: false,
            projection: -1.0,
            focal_distance: 1.0,
        }
    }
}

impl TransformControls {
    pub fn projection_mode(&self) -> ProjectionMode {
        ProjectionMode::from_slider(self.projection)
    }

    /// Rotation, scaling and projection as 3×3 matrices, in that order.
    pub fn linear_pipeline(&self) -> [Mat3; 3] {
        let projection = if self.orthographic {
            orthographic_projection(self.axis)
        } else {
            Mat3::IDENTITY
        };

        [
            rotation(self.axis, self.angle_degrees.to_radians()),
            scaling(self.axis, self.scale),
            projection,
        ]
    }

    /// Translation, rotation, scaling and the slider-selected projection.
    pub fn homogeneous_stack(&self) -> Result<TransformStack, TransformError> {
        let t = self.translation;
        let stack = TransformStack::new()
            .translation(translation(t.x, t.y, t.z))
            .rotation(rotation_homogeneous(self.axis, self.angle_degrees.to_radians()))
            .scaling(scaling_homogeneous(self.axis, self.scale));

        Ok(match self.projection_mode() {
            ProjectionMode::None => stack,
            ProjectionMode::Orthographic => {
                stack.projection(orthographic_projection_homogeneous(self.axis, 0.0))
            }
            ProjectionMode::Perspective => {
                stack.projection(perspective_projection(self.focal_distance)?)
            }
        })
    }
}
