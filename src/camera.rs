use glam::{Mat4, Vec3};
use winit::keyboard::KeyCode;

use crate::input::KeyState;

/// A perspective camera looking at a fixed target.
///
/// Keyboard movement shifts the position only, so the camera keeps facing the
/// target while it moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn looking_at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.target = Vec3::new(x, y, z);
        self
    }

    pub fn with_fov(mut self, fovy_degrees: f32) -> Self {
        self.fovy = fovy_degrees;
        self
    }

    /// Moves the camera by `speed` for each held movement key.
    ///
    /// W/S move along -Z/+Z, A/D along -X/+X and Q/E along +Y/-Y, in world
    /// axes regardless of where the camera looks.
    pub fn update_from_keys(&mut self, keys: &impl KeyState, speed: f32) {
        const BINDINGS: [(KeyCode, Vec3); 6] = [
            (KeyCode::KeyW, Vec3::NEG_Z),
            (KeyCode::KeyS, Vec3::Z),
            (KeyCode::KeyA, Vec3::NEG_X),
            (KeyCode::KeyD, Vec3::X),
            (KeyCode::KeyQ, Vec3::Y),
            (KeyCode::KeyE, Vec3::NEG_Y),
        ];

        for (key, step) in BINDINGS {
            if keys.key_down(key) {
                self.position += step * speed;
            }
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy.to_radians(), aspect, near, far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect, 0.1, 1000.0) * self.view_matrix()
    }
}
