use glam::Vec3;

use super::linear::{AXES_SCALE, PLANE_SIZE};
use super::{DegenerateLog, vector_sliders};
use crate::app::Scene;
use crate::controls::{ProjectionMode, TransformControls};
use crate::draw::{Color, DrawList, draw_coordinate_axes, draw_mesh, draw_plane, draw_transformation_axis};
use crate::mesh::Mesh;
use crate::widgets::Panel;

/// Translation, rotation, scaling and projection of a mesh with 4×4 matrices.
pub struct HomogeneousScene {
    mesh: Mesh,
    pub controls: TransformControls,
    /// `None` while the current projection cannot be drawn.
    vertices: Option<Vec<Vec3>>,
    degenerate: DegenerateLog,
}

impl HomogeneousScene {
    pub fn new(mesh: Mesh) -> Self {
        let vertices = Some(mesh.vertices().to_vec());
        Self {
            mesh,
            controls: TransformControls::default(),
            vertices,
            degenerate: DegenerateLog::new("mesh"),
        }
    }

    /// Vertices as last drawn, if the last frame could draw the mesh.
    pub fn vertices(&self) -> Option<&[Vec3]> {
        self.vertices.as_deref()
    }
}

impl Scene for HomogeneousScene {
    fn ui(&mut self, panel: &mut Panel<'_>) {
        let c = &mut self.controls;
        panel.slider("Scale", &mut c.scale, 0.4, 10.0);
        panel.slider("Angle (degrees)", &mut c.angle_degrees, 0.0, 360.0);
        vector_sliders(panel, "Axis", &mut c.axis, -1.0, 1.0);
        vector_sliders(panel, "Translation", &mut c.translation, -5.0, 5.0);
        panel.space();

        panel.slider("Projection", &mut c.projection, -1.0, 1.0);
        let mode = c.projection_mode();
        panel.label(match mode {
            ProjectionMode::None => "No projection",
            ProjectionMode::Orthographic => "Orthographic",
            ProjectionMode::Perspective => "Perspective",
        });
        if mode == ProjectionMode::Perspective {
            panel.slider("Focal distance", &mut c.focal_distance, 1.0, 8.0);
        }
    }

    fn draw(&mut self, target: &mut DrawList, _time: f32) {
        let axis = self.controls.axis;
        draw_coordinate_axes(target, Vec3::ZERO, AXES_SCALE);
        draw_transformation_axis(target, Vec3::ZERO, axis, AXES_SCALE);
        draw_plane(target, axis, PLANE_SIZE, 0.0, Color::GRAY);

        let result = self
            .controls
            .homogeneous_stack()
            .and_then(|stack| stack.apply(self.mesh.vertices()));
        self.degenerate.record(result.as_ref().err());
        self.vertices = result.ok();

        if let Some(vertices) = &self.vertices {
            draw_mesh(target, vertices, &self.mesh, Color::LIGHT_GRAY);
        }
    }
}
