//! A central body with a pool of orbiting, spinning copies.
//!
//! The pool is rolled once from a seed and never changes afterwards. Each
//! frame, the first `N` bodies get a transform pipeline that depends only on
//! the body, the current [`OrbitControls`] and the elapsed time, so bodies can
//! be evaluated in any order.
//!
//! ```
//! use transform_lab::orbit::{OrbitControls, OrbitPool, MAX_ORBITS};
//!
//! let pool = OrbitPool::new(MAX_ORBITS, 7);
//! let controls = OrbitControls::default();
//! let active = pool.active(&controls);
//! assert_eq!(active.len(), 5);
//! let pipeline = active[0].pipeline(&controls, 1.5).unwrap();
//! assert_eq!(pipeline.len(), 4);
//! ```

use std::f32::consts::{FRAC_PI_4, TAU};

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::transforms::{
    TransformError, isotropic_scaling, orthographic_projection_homogeneous,
    perspective_projection, rotation_homogeneous, translation,
};

/// Size of the pool the orbit exercise rolls at startup.
pub const MAX_ORBITS: usize = 50;

/// Height of the ground plane the orthographic projection flattens onto.
pub const GROUND_HEIGHT: f32 = -20.0;

/// Which way a body spins about its own axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }
}

/// Fixed parameters of one orbiting body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitBody {
    /// Added to every coordinate of the orbit position, in `[1, 2)`.
    pub radius_offset: f32,
    /// Tilt of the orbit, radians in `[-π/4, π/4)`.
    pub inclination: f32,
    /// Phase offset of both the orbit and the spin, radians in `[0, 2π)`.
    pub phase: f32,
    /// Spin axis, each component in `[-1, 1)`. Not normalized.
    pub spin_axis: Vec3,
    pub direction: Direction,
    /// Uniform scale factor in `[0.1, 3)`.
    pub scale: f32,
}

impl OrbitBody {
    /// Rolls a body's parameters.
    pub fn random(rng: &mut impl Rng) -> Self {
        let phase = rng.gen_range(0.0..TAU);
        let inclination = rng.gen_range(-FRAC_PI_4..FRAC_PI_4);
        let spin_axis = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let direction = if rng.gen_bool(0.5) {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        let radius_offset = rng.gen_range(1.0..2.0);
        let scale = rng.gen_range(0.1..3.0);

        Self {
            radius_offset,
            inclination,
            phase,
            spin_axis,
            direction,
            scale,
        }
    }

    /// Spin angle in radians at `time` seconds.
    pub fn spin_angle(&self, time: f32) -> f32 {
        time * self.direction.sign() + self.phase
    }

    /// Position on the orbit, relative to the central body, at `time` seconds.
    pub fn orbit_position(&self, time: f32, orbit_radius: f32) -> Vec3 {
        let (sin_t, cos_t) = (time + self.phase).sin_cos();
        Vec3::new(
            cos_t * orbit_radius + self.radius_offset,
            self.inclination.sin() * orbit_radius + self.radius_offset,
            sin_t * orbit_radius + self.radius_offset,
        )
    }

    /// Transforms for this body, in application order: placement on the
    /// orbit around the (moved, rotated) central body, own spin, own scale,
    /// then the projection chosen by the controls.
    pub fn pipeline(&self, controls: &OrbitControls, time: f32) -> Result<[Mat4; 4], TransformError> {
        let orbit = translation_to(self.orbit_position(time, controls.orbit_radius));
        let placement = controls.central_translation() * controls.central_rotation() * orbit;

        Ok([
            placement,
            rotation_homogeneous(self.spin_axis, self.spin_angle(time)),
            isotropic_scaling(self.scale),
            controls.projection()?,
        ])
    }
}

fn translation_to(p: Vec3) -> Mat4 {
    translation(p.x, p.y, p.z)
}

/// The bodies rolled for a session.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitPool {
    bodies: Vec<OrbitBody>,
}

impl OrbitPool {
    /// Rolls `size` bodies from a seeded generator; equal seeds give equal pools.
    pub fn new(size: usize, seed: u64) -> Self {
        Self::from_rng(size, &mut StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(size: usize, rng: &mut impl Rng) -> Self {
        let bodies: Vec<OrbitBody> = (0..size).map(|_| OrbitBody::random(rng)).collect();
        log::debug!("rolled orbit pool of {} bodies", bodies.len());
        Self { bodies }
    }

    pub fn bodies(&self) -> &[OrbitBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The first bodies, as many as the controls ask for.
    pub fn active(&self, controls: &OrbitControls) -> &[OrbitBody] {
        &self.bodies[..controls.active_count(self.len())]
    }
}

/// Per-frame controls of the orbit exercise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitControls {
    /// Translation of the central body, each component in `[-5, 5]`.
    pub translation: Vec3,
    /// Rotation axis of the central body.
    pub axis: Vec3,
    /// Rotation of the central body, degrees in `[0, 360]`.
    pub angle_degrees: f32,
    /// Requested body count; a slider value, rounded when used.
    pub orbit_count: f32,
    /// Orbit radius in `[0, 10]`.
    pub orbit_radius: f32,
    /// Flatten the bodies onto the ground plane.
    pub orthographic: bool,
    /// Perspective-project the bodies. Ignored while `orthographic` is on.
    pub perspective: bool,
    /// Focal distance for the perspective projection, in `[1, 8]`.
    pub focal_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            axis: Vec3::X,
            angle_degrees: 0.0,
            orbit_count: 5.0,
            orbit_radius: 5.0,
            orthographic: false,
            perspective: false,
            focal_distance: 1.0,
        }
    }
}

impl OrbitControls {
    /// Rounded body count, clamped to `[0, available]`.
    pub fn active_count(&self, available: usize) -> usize {
        let rounded = self.orbit_count.round();
        if rounded.is_nan() || rounded <= 0.0 {
            0
        } else {
            (rounded as usize).min(available)
        }
    }

    pub fn central_translation(&self) -> Mat4 {
        translation_to(self.translation)
    }

    pub fn central_rotation(&self) -> Mat4 {
        rotation_homogeneous(self.axis, self.angle_degrees.to_radians())
    }

    /// Transforms for the central body: translation, then rotation.
    pub fn central_pipeline(&self) -> [Mat4; 2] {
        [self.central_translation(), self.central_rotation()]
    }

    /// Projection applied last to every orbiting body.
    pub fn projection(&self) -> Result<Mat4, TransformError> {
        if self.orthographic {
            Ok(orthographic_projection_homogeneous(Vec3::Y, GROUND_HEIGHT))
        } else if self.perspective {
            perspective_projection(self.focal_distance)
        } else {
            Ok(Mat4::IDENTITY)
        }
    }
}
