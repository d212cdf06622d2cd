use glam::Vec3;

use super::{DegenerateLog, vector_sliders};
use crate::app::Scene;
use crate::draw::{Color, DrawList, draw_mesh, draw_plane};
use crate::mesh::Mesh;
use crate::orbit::{GROUND_HEIGHT, MAX_ORBITS, OrbitControls, OrbitPool};
use crate::transforms::TransformError;
use crate::widgets::Panel;

/// Half-extent of the ground grid, in cells.
const GROUND_SIZE: i32 = 50;

/// A central mesh with copies orbiting and spinning around it.
pub struct OrbitScene {
    mesh: Mesh,
    pool: OrbitPool,
    pub controls: OrbitControls,
    degenerate: DegenerateLog,
    drawn: usize,
}

impl OrbitScene {
    /// Rolls a pool of [`MAX_ORBITS`] bodies from `seed`.
    pub fn new(mesh: Mesh, seed: u64) -> Self {
        Self {
            mesh,
            pool: OrbitPool::new(MAX_ORBITS, seed),
            controls: OrbitControls::default(),
            degenerate: DegenerateLog::new("orbiting bodies"),
            drawn: 0,
        }
    }

    pub fn pool(&self) -> &OrbitPool {
        &self.pool
    }

    /// Orbiting bodies drawn in the last frame.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl Scene for OrbitScene {
    fn ui(&mut self, panel: &mut Panel<'_>) {
        let c = &mut self.controls;
        vector_sliders(panel, "Translation", &mut c.translation, -5.0, 5.0);
        vector_sliders(panel, "Rotation axis", &mut c.axis, -1.0, 1.0);
        panel.slider("Rotation angle", &mut c.angle_degrees, 0.0, 360.0);
        panel.space();

        panel.slider("Orbiting bodies", &mut c.orbit_count, 0.0, MAX_ORBITS as f32);
        panel.slider("Orbit radius", &mut c.orbit_radius, 0.0, 10.0);
        panel.space();

        panel.checkbox("Orthographic projection", &mut c.orthographic);
        panel.checkbox("Perspective projection", &mut c.perspective);
        if c.perspective && !c.orthographic {
            panel.slider("Focal distance", &mut c.focal_distance, 1.0, 8.0);
        }
    }

    fn draw(&mut self, target: &mut DrawList, time: f32) {
        // The central body only moves and turns, so its divide never degenerates.
        if let Ok(central) = self.mesh.transformed(&self.controls.central_pipeline()) {
            draw_mesh(target, &central, &self.mesh, Color::RED);
        }

        draw_plane(target, Vec3::Y, GROUND_SIZE, GROUND_HEIGHT, Color::GRAY);

        let mut first_error: Option<TransformError> = None;
        self.drawn = 0;
        for body in self.pool.active(&self.controls) {
            let placed = body
                .pipeline(&self.controls, time)
                .and_then(|matrices| self.mesh.transformed(&matrices));
            match placed {
                Ok(vertices) => {
                    draw_mesh(target, &vertices, &self.mesh, Color::LIGHT_GRAY);
                    self.drawn += 1;
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        self.degenerate.record(first_error.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_the_requested_number_of_bodies() {
        let mut scene = OrbitScene::new(Mesh::cube(), 1);
        scene.controls.orbit_count = 7.4;

        let mut list = DrawList::new();
        scene.draw(&mut list, 0.5);
        assert_eq!(scene.drawn(), 7);
        // Central body plus seven copies.
        assert_eq!(list.triangles().count(), 8 * Mesh::cube().faces().len());
    }

    #[test]
    fn count_is_capped_by_the_pool() {
        let mut scene = OrbitScene::new(Mesh::cube(), 2);
        scene.controls.orbit_count = 80.0;

        let mut list = DrawList::new();
        scene.draw(&mut list, 0.0);
        assert_eq!(scene.drawn(), MAX_ORBITS);
        assert_eq!(scene.pool().len(), MAX_ORBITS);
    }

    #[test]
    fn ground_projection_lands_bodies_on_the_ground() {
        let mut scene = OrbitScene::new(Mesh::cube(), 3);
        scene.controls.orthographic = true;
        scene.controls.orbit_count = 3.0;

        let mut list = DrawList::new();
        scene.draw(&mut list, 1.0);

        let spheres: Vec<_> = list
            .spheres()
            .filter_map(|c| match c {
                crate::draw::DrawCommand::Sphere { center, .. } => Some(*center),
                _ => None,
            })
            .collect();
        // Eight central vertices first, then the flattened bodies.
        assert_eq!(spheres.len(), 8 * 4);
        for center in &spheres[8..] {
            assert!((center.y - GROUND_HEIGHT).abs() < 1e-4);
        }
    }

    #[test]
    fn same_seed_same_frame() {
        let mut a = OrbitScene::new(Mesh::cube(), 9);
        let mut b = OrbitScene::new(Mesh::cube(), 9);
        let (mut la, mut lb) = (DrawList::new(), DrawList::new());
        a.draw(&mut la, 2.0);
        b.draw(&mut lb, 2.0);
        assert_eq!(la.commands(), lb.commands());
    }
}
