//! # transform-lab
//!
//! **Vector algebra and homogeneous transforms you can watch.**
//!
//! The math half of the crate is plain functions over [`glam`] types: dot and
//! cross products, a view-cone test, Rodrigues rotations, axis scaling,
//! orthographic and perspective projections, and an applicator that runs a
//! fixed matrix pipeline over a mesh's original vertices. The viewer half is a
//! small wgpu/winit window that draws four interactive exercises with sliders.
//!
//! ## Quick Start
//!
//! ```no_run
//! use transform_lab::scenes::LinearScene;
//! use transform_lab::{AppConfig, GeometryLoader, run_with_config};
//!
//! let mesh = GeometryLoader::from_file("assets/cube.ply").build().unwrap();
//! run_with_config(
//!     AppConfig::from_env().title("Linear transforms"),
//!     Box::new(LinearScene::new(mesh)),
//! )
//! .unwrap();
//! ```
//!
//! ## Conventions
//!
//! - Column vectors: `v' = M · v`. A slice of matrices is applied first to last.
//! - Rotations are right-handed: `(1, 0, 0)` turned 90° about `+Y` ends at `(0, 0, -1)`.
//! - [`FovCone`] stores the full aperture; [`fov::in_fov`] takes the half-angle.
//! - A homogeneous divide by `|w| < 1e-6` is an error, never a NaN.

mod app;
mod assets;
mod camera;
mod config;
pub mod controls;
pub mod draw;
mod draw2d;
pub mod fov;
mod geometry;
mod gpu;
mod immediate;
mod input;
mod mesh;
pub mod orbit;
pub mod pipeline;
pub mod scenes;
pub mod transforms;
pub mod vector;
pub mod widgets;

pub use app::{Scene, build_frame, run_with_config};
pub use assets::{AssetError, FontAtlas};
pub use camera::Camera;
pub use config::{AppConfig, FONT_ENV_VAR, SEED_ENV_VAR};
pub use draw::{Color, DrawCommand, DrawList, DrawTarget};
pub use draw2d::Draw2d;
pub use fov::FovCone;
pub use geometry::{GeometryError, GeometryLoader};
pub use gpu::GpuContext;
pub use immediate::{ImmediatePass, Tessellation};
pub use input::{Input, KeyState};
pub use mesh::Mesh;
pub use transforms::TransformError;

// Re-export glam math types for convenience
pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
