use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::Scene;
use crate::draw::{
    Color, DrawList, draw_classified_points, draw_fov_cone, draw_grid, draw_parallelogram,
};
use crate::fov::FovCone;
use crate::vector::cross;
use crate::widgets::Panel;

/// Hand-placed points, two inside the default cone and two outside.
pub const FIXED_POINTS: [Vec3; 4] = [
    Vec3::new(1.5, 0.0, 2.0),
    Vec3::new(2.0, 0.0, 4.0),
    Vec3::new(-5.0, 0.0, 4.0),
    Vec3::new(4.0, 0.0, 2.0),
];

/// Vectors spanning the parallelogram drawn behind the cone.
pub const PARALLELOGRAM: (Vec3, Vec3) = (Vec3::new(-4.0, 0.0, -3.0), Vec3::new(5.0, 0.0, -3.0));

pub const RANDOM_POINTS: usize = 20;
const GRID_SLICES: i32 = 15;
const CONE_SEGMENTS: u32 = 20;

/// Points classified against a view cone on the ground plane.
pub struct FovScene {
    pub cone: FovCone,
    points: Vec<Vec3>,
    inside: usize,
}

impl FovScene {
    /// The default cone with [`FIXED_POINTS`] and [`RANDOM_POINTS`] points
    /// scattered over `x ∈ [-5, 5)`, `z ∈ [0, 6)`.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut points = FIXED_POINTS.to_vec();
        points.extend((0..RANDOM_POINTS).map(|_| {
            Vec3::new(rng.gen_range(-5.0..5.0), 0.0, rng.gen_range(0.0..6.0))
        }));

        let (e, f) = PARALLELOGRAM;
        log::debug!("fov scene seed {seed}, cross(e, f) = {}", cross(e, f));

        let cone = FovCone::default();
        let inside = points.iter().filter(|&&p| cone.contains(p)).count();
        Self {
            cone,
            points,
            inside,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// How many points the cone held when last drawn.
    pub fn inside(&self) -> usize {
        self.inside
    }
}

impl Scene for FovScene {
    fn ui(&mut self, panel: &mut Panel<'_>) {
        panel.label(format!("Inside: {} of {}", self.inside, self.points.len()));
        panel.space();
        panel.slider("Aperture", &mut self.cone.aperture_degrees, 0.0, 180.0);
        panel.slider("Distance", &mut self.cone.max_distance, 0.0, 10.0);
    }

    fn draw(&mut self, target: &mut DrawList, _time: f32) {
        draw_grid(target, GRID_SLICES, 1.0);
        self.inside = draw_classified_points(target, &self.cone, &self.points);
        draw_fov_cone(target, &self.cone, CONE_SEGMENTS, Color::BLUE);

        let (e, f) = PARALLELOGRAM;
        draw_parallelogram(target, e, f);
    }
}
