//! Field-of-view cones and point classification.
//!
//! A cone is described by an origin, a view direction, a maximum distance and
//! an aperture. [`in_fov`] is the raw test taking a half-angle; [`FovCone`]
//! bundles the parameters with the full aperture, which is how the viewer
//! exposes them.
//!
//! ```
//! use transform_lab::{FovCone, Vec3};
//!
//! let cone = FovCone::new(Vec3::ZERO, Vec3::Z, 5.0, 90.0);
//! assert!(cone.contains(Vec3::new(1.5, 0.0, 2.0)));
//! assert!(!cone.contains(Vec3::new(-5.0, 0.0, 4.0)));
//! ```

use glam::Vec3;

use crate::vector::{dot, length, normalize, rotate_about_y};

/// Returns true when `point` lies inside the cone.
///
/// The distance check runs first and returns early, so a far point is never
/// normalized. A point sitting on `origin` normalizes to the zero vector and
/// is therefore inside only when `half_angle_degrees >= 90`.
pub fn in_fov(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    half_angle_degrees: f32,
    point: Vec3,
) -> bool {
    let to_point = point - origin;
    if length(to_point) > max_distance {
        return false;
    }

    let alignment = dot(normalize(direction), normalize(to_point));
    alignment >= half_angle_degrees.to_radians().cos()
}

/// A view cone with a full aperture angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FovCone {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
    /// Full opening angle in degrees, in `[0, 360]`.
    pub aperture_degrees: f32,
}

impl Default for FovCone {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            max_distance: 5.0,
            aperture_degrees: 90.0,
        }
    }
}

impl FovCone {
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32, aperture_degrees: f32) -> Self {
        Self {
            origin,
            direction,
            max_distance: max_distance.max(0.0),
            aperture_degrees,
        }
    }

    pub fn half_angle_degrees(&self) -> f32 {
        self.aperture_degrees * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        in_fov(
            self.origin,
            self.direction,
            self.max_distance,
            self.half_angle_degrees(),
            point,
        )
    }

    /// Points along the far edge of the cone, swept about the Y axis.
    ///
    /// Returns `segments + 1` points going from `-half` to `+half` angle, each
    /// `max_distance` away from the origin.
    pub fn arc_points(&self, segments: u32) -> Vec<Vec3> {
        let segments = segments.max(1);
        let direction = normalize(self.direction);
        let half = self.half_angle_degrees().to_radians();
        let step = 2.0 * half / segments as f32;

        (0..=segments)
            .map(|i| {
                let rotated = rotate_about_y(direction, -half + i as f32 * step);
                self.origin + rotated * self.max_distance
            })
            .collect()
    }
}
