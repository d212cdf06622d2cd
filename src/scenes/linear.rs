use glam::Vec3;

use super::vector_sliders;
use crate::app::Scene;
use crate::controls::TransformControls;
use crate::draw::{Color, DrawList, draw_coordinate_axes, draw_mesh, draw_plane, draw_transformation_axis};
use crate::mesh::Mesh;
use crate::widgets::Panel;

pub(super) const AXES_SCALE: f32 = 3.0;
pub(super) const PLANE_SIZE: i32 = 10;

/// Rotation, scaling and orthographic projection of a mesh with 3×3 matrices.
pub struct LinearScene {
    mesh: Mesh,
    pub controls: TransformControls,
    vertices: Vec<Vec3>,
}

impl LinearScene {
    pub fn new(mesh: Mesh) -> Self {
        let vertices = mesh.vertices().to_vec();
        Self {
            mesh,
            controls: TransformControls::default(),
            vertices,
        }
    }

    /// Vertices as last drawn.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }
}

impl Scene for LinearScene {
    fn ui(&mut self, panel: &mut Panel<'_>) {
        let c = &mut self.controls;
        panel.slider("Scale", &mut c.scale, 0.4, 10.0);
        panel.slider("Angle (degrees)", &mut c.angle_degrees, 0.0, 360.0);
        vector_sliders(panel, "Axis", &mut c.axis, -1.0, 1.0);
        panel.space();
        panel.checkbox("Orthographic projection", &mut c.orthographic);
    }

    fn draw(&mut self, target: &mut DrawList, _time: f32) {
        let axis = self.controls.axis;
        draw_coordinate_axes(target, Vec3::ZERO, AXES_SCALE);
        draw_transformation_axis(target, Vec3::ZERO, axis, AXES_SCALE);
        draw_plane(target, axis, PLANE_SIZE, 0.0, Color::GRAY);

        self.vertices = self.mesh.transformed_linear(&self.controls.linear_pipeline());
        draw_mesh(target, &self.vertices, &self.mesh, Color::LIGHT_GRAY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_controls_leave_the_mesh_alone() {
        let mut scene = LinearScene::new(Mesh::cube());
        let mut list = DrawList::new();
        scene.draw(&mut list, 0.0);
        for (drawn, original) in scene.vertices().iter().zip(Mesh::cube().vertices()) {
            assert!(drawn.abs_diff_eq(*original, 1e-6));
        }
    }

    #[test]
    fn orthographic_flattens_along_the_axis() {
        let mut scene = LinearScene::new(Mesh::cube());
        scene.controls.axis = Vec3::new(0.0, 1.0, 0.0);
        scene.controls.angle_degrees = 30.0;
        scene.controls.orthographic = true;

        let mut list = DrawList::new();
        scene.draw(&mut list, 0.0);
        assert!(scene.vertices().iter().all(|v| v.y.abs() < 1e-6));
    }

    #[test]
    fn draws_every_face_once() {
        let mut scene = LinearScene::new(Mesh::cube());
        let mut list = DrawList::new();
        scene.draw(&mut list, 0.0);
        assert_eq!(list.triangles().count(), Mesh::cube().faces().len());
    }
}
