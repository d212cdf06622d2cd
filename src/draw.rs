//! World-space drawing primitives and the scene helpers built on them.
//!
//! Everything a scene draws goes through [`DrawTarget`], which knows four
//! primitives: lines, triangles, spheres and (possibly tapered) cylinders.
//! [`DrawList`] records them as [`DrawCommand`]s; the GPU side tessellates the
//! list once per frame. Tests draw into a `DrawList` and inspect it.
//!
//! ```
//! use transform_lab::draw::{draw_vector, Color, DrawCommand, DrawList};
//! use transform_lab::Vec3;
//!
//! let mut list = DrawList::new();
//! draw_vector(&mut list, Vec3::ZERO, Vec3::X, Color::RED, 0.05);
//! assert_eq!(list.len(), 2); // shaft and head
//! assert!(matches!(list.commands()[0], DrawCommand::Cylinder { .. }));
//! ```

use glam::Vec3;

use crate::fov::FovCone;
use crate::mesh::Mesh;
use crate::vector::{cross, length, normalize};

/// Linear RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Builds a color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color = Color::rgb8(230, 41, 55);
    pub const GREEN: Color = Color::rgb8(0, 228, 48);
    pub const BLUE: Color = Color::rgb8(0, 121, 241);
    pub const PURPLE: Color = Color::rgb8(200, 122, 255);
    pub const VIOLET: Color = Color::rgb8(135, 60, 190);
    pub const LIGHT_GRAY: Color = Color::rgb8(200, 200, 200);
    pub const GRAY: Color = Color::rgb8(130, 130, 130);
    pub const DARK_GRAY: Color = Color::rgb8(80, 80, 80);
    pub const OFF_WHITE: Color = Color::rgb8(245, 245, 245);

    /// Semi-transparent dark background for control panels.
    pub const PANEL_BG: Color = Color::rgba(0.1, 0.1, 0.1, 0.85);
    /// Accent color for panel borders.
    pub const PANEL_BORDER: Color = Color::rgba(0.4, 0.4, 0.4, 1.0);

    /// Same color with its alpha replaced.
    pub const fn fade(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Something world-space primitives can be drawn into.
pub trait DrawTarget {
    fn line(&mut self, start: Vec3, end: Vec3, color: Color);

    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Color);

    fn sphere(&mut self, center: Vec3, radius: f32, color: Color);

    /// A cylinder from `start` to `end`; unequal radii give a truncated cone.
    fn cylinder(&mut self, start: Vec3, end: Vec3, start_radius: f32, end_radius: f32, color: Color);
}

/// One recorded primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Line {
        start: Vec3,
        end: Vec3,
        color: Color,
    },
    Triangle {
        a: Vec3,
        b: Vec3,
        c: Vec3,
        color: Color,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        color: Color,
    },
    Cylinder {
        start: Vec3,
        end: Vec3,
        start_radius: f32,
        end_radius: f32,
        color: Color,
    },
}

/// Commands recorded during one frame, in submission order.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn triangles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Triangle { .. }))
    }

    pub fn spheres(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sphere { .. }))
    }

    pub fn cylinders(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Cylinder { .. }))
    }
}

impl DrawTarget for DrawList {
    fn line(&mut self, start: Vec3, end: Vec3, color: Color) {
        self.commands.push(DrawCommand::Line { start, end, color });
    }

    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Color) {
        self.commands.push(DrawCommand::Triangle { a, b, c, color });
    }

    fn sphere(&mut self, center: Vec3, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Sphere {
            center,
            radius,
            color,
        });
    }

    fn cylinder(&mut self, start: Vec3, end: Vec3, start_radius: f32, end_radius: f32, color: Color) {
        self.commands.push(DrawCommand::Cylinder {
            start,
            end,
            start_radius,
            end_radius,
            color,
        });
    }
}

/// Shaft thickness used by every arrow in the exercises.
pub const VECTOR_THICKNESS: f32 = 0.05;

/// Fraction of the arrow length where the head starts.
const HEAD_START: f32 = 0.8;

/// An arrow from `start` to `end`: a thin shaft plus a tapered head over the
/// last fifth of its length.
pub fn draw_vector(target: &mut impl DrawTarget, start: Vec3, end: Vec3, color: Color, thickness: f32) {
    let direction = end - start;
    let head_start = start + normalize(direction) * length(direction) * HEAD_START;

    target.cylinder(start, end, thickness / 2.0, thickness / 2.0, color);
    target.cylinder(head_start, end, thickness * 2.0, thickness / 5.0, color);
}

/// X, Y and Z unit arrows (red, green, blue) scaled by `scale`.
pub fn draw_coordinate_axes(target: &mut impl DrawTarget, origin: Vec3, scale: f32) {
    draw_vector(target, origin, origin + Vec3::X * scale, Color::RED, VECTOR_THICKNESS);
    draw_vector(target, origin, origin + Vec3::Y * scale, Color::GREEN, VECTOR_THICKNESS);
    draw_vector(target, origin, origin + Vec3::Z * scale, Color::BLUE, VECTOR_THICKNESS);
}

/// The user-chosen transformation axis, as a purple arrow.
///
/// The axis is drawn as given, so its length shows the raw slider values.
pub fn draw_transformation_axis(target: &mut impl DrawTarget, origin: Vec3, axis: Vec3, scale: f32) {
    draw_vector(target, origin, origin + axis * scale, Color::PURPLE, VECTOR_THICKNESS);
}

/// Line grid spanning the plane through the origin orthogonal to `axis`,
/// lifted by `height` along Y.
///
/// Draws `2 * (2 * size + 1)` lines one unit apart. The in-plane basis is
/// normalized, so the spacing does not follow the length of `axis` the way a
/// basis of raw cross products would. A zero axis collapses the grid to a point.
pub fn draw_plane(target: &mut impl DrawTarget, axis: Vec3, size: i32, height: f32, color: Color) {
    let n = normalize(axis);
    let helper = if n.x.abs() < n.y.abs() { Vec3::X } else { Vec3::Y };
    let u = normalize(cross(n, helper));
    let v = normalize(cross(n, u));
    let lift = Vec3::new(0.0, height, 0.0);
    let extent = size as f32;

    for i in -size..=size {
        let i = i as f32;
        target.line(lift + u * -extent + v * i, lift + u * extent + v * i, color);
        target.line(lift + v * -extent + u * i, lift + v * extent + u * i, color);
    }
}

/// Reference grid on the XZ plane, `slices` cells wide with `spacing` units per
/// cell. Center lines are darker.
pub fn draw_grid(target: &mut impl DrawTarget, slices: i32, spacing: f32) {
    let half = slices / 2;
    let reach = half as f32 * spacing;

    for i in -half..=half {
        let color = if i == 0 { Color::DARK_GRAY } else { Color::LIGHT_GRAY };
        let offset = i as f32 * spacing;
        target.line(Vec3::new(offset, 0.0, -reach), Vec3::new(offset, 0.0, reach), color);
        target.line(Vec3::new(-reach, 0.0, offset), Vec3::new(reach, 0.0, offset), color);
    }
}

/// Radius of the spheres marking mesh vertices.
const VERTEX_MARKER_RADIUS: f32 = 0.05;

/// Draws a mesh's faces in `color`, its edges in black and its vertices as
/// small red spheres.
///
/// `vertices` is the buffer to draw, usually the output of
/// [`Mesh::transformed`]; `mesh` supplies the topology. Faces or edges that
/// index past the end of `vertices` are skipped.
pub fn draw_mesh(target: &mut impl DrawTarget, vertices: &[Vec3], mesh: &Mesh, color: Color) {
    let corner = |i: u32| vertices.get(i as usize).copied();

    for &[a, b, c] in mesh.faces() {
        if let (Some(a), Some(b), Some(c)) = (corner(a), corner(b), corner(c)) {
            target.triangle(a, b, c, color);
        }
    }

    for &[a, b] in mesh.edges() {
        if let (Some(a), Some(b)) = (corner(a), corner(b)) {
            target.line(a, b, Color::BLACK);
        }
    }

    for &v in vertices {
        target.sphere(v, VERTEX_MARKER_RADIUS, Color::RED);
    }
}

/// Outline of the cone's horizontal sector: spokes from the origin to each arc
/// point, the arc itself, and a closing spoke to the last point.
pub fn draw_fov_cone(target: &mut impl DrawTarget, cone: &FovCone, segments: u32, color: Color) {
    let points = cone.arc_points(segments);

    for pair in points.windows(2) {
        target.line(cone.origin, pair[0], color);
        target.line(pair[0], pair[1], color);
    }
    if let Some(&last) = points.last() {
        target.line(cone.origin, last, color);
    }
}

/// Radius of the spheres marking classified points.
const POINT_MARKER_RADIUS: f32 = 0.1;

/// Marks each point green when the cone contains it and red otherwise.
///
/// Returns how many points were inside.
pub fn draw_classified_points(target: &mut impl DrawTarget, cone: &FovCone, points: &[Vec3]) -> usize {
    let mut inside = 0;
    for &p in points {
        let color = if cone.contains(p) {
            inside += 1;
            Color::GREEN
        } else {
            Color::RED
        };
        target.sphere(p, POINT_MARKER_RADIUS, color);
    }
    inside
}

/// The parallelogram spanned by `a` and `b` from the origin.
///
/// Draws `a` as a red arrow and `b` as a blue one, the two far edges in green,
/// and the face as two half-transparent violet triangles. The triangle winding
/// follows the sign of `cross(a, b).y`, so the face is wound the same way
/// whichever order the vectors come in.
pub fn draw_parallelogram(target: &mut impl DrawTarget, a: Vec3, b: Vec3) {
    let origin = Vec3::ZERO;
    let far = a + b;

    draw_vector(target, origin, a, Color::RED, VECTOR_THICKNESS);
    draw_vector(target, origin, b, Color::BLUE, VECTOR_THICKNESS);

    target.line(a, far, Color::GREEN);
    target.line(b, far, Color::GREEN);

    let fill = Color::VIOLET.fade(0.5);
    if cross(a, b).y > 0.0 {
        target.triangle(origin, a, b, fill);
        target.triangle(a, far, b, fill);
    } else {
        target.triangle(origin, b, a, fill);
        target.triangle(b, far, a, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vector_head_covers_the_last_fifth() {
        let mut list = DrawList::new();
        draw_vector(&mut list, Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Color::BLUE, 0.05);

        let DrawCommand::Cylinder {
            start,
            start_radius,
            end_radius,
            ..
        } = list.commands()[1]
        else {
            panic!("expected a cylinder");
        };
        assert!(start.abs_diff_eq(Vec3::new(0.0, 0.0, 8.0), 1e-5));
        assert_relative_eq!(start_radius, 0.1);
        assert_relative_eq!(end_radius, 0.01, epsilon = 1e-7);
    }

    #[test]
    fn zero_length_vector_still_draws() {
        let mut list = DrawList::new();
        draw_vector(&mut list, Vec3::ONE, Vec3::ONE, Color::RED, 0.05);
        assert_eq!(list.cylinders().count(), 2);
    }

    #[test]
    fn axes_are_red_green_blue() {
        let mut list = DrawList::new();
        draw_coordinate_axes(&mut list, Vec3::ZERO, 3.0);
        let colors: Vec<Color> = list
            .commands()
            .iter()
            .step_by(2)
            .map(|c| match c {
                DrawCommand::Cylinder { color, .. } => *color,
                _ => panic!("expected cylinders only"),
            })
            .collect();
        assert_eq!(colors, vec![Color::RED, Color::GREEN, Color::BLUE]);
    }

    #[test]
    fn plane_line_count_and_height() {
        let mut list = DrawList::new();
        draw_plane(&mut list, Vec3::Y, 10, -20.0, Color::GRAY);
        assert_eq!(list.lines().count(), 42);
        for cmd in list.lines() {
            let DrawCommand::Line { start, end, .. } = cmd else { unreachable!() };
            assert_eq!(start.y, -20.0);
            assert_eq!(end.y, -20.0);
        }
    }

    #[test]
    fn plane_lies_orthogonal_to_its_axis() {
        let axis = Vec3::new(1.0, 2.0, -1.0);
        let n = normalize(axis);
        let mut list = DrawList::new();
        draw_plane(&mut list, axis, 3, 0.0, Color::GRAY);
        for cmd in list.lines() {
            let DrawCommand::Line { start, end, .. } = cmd else { unreachable!() };
            assert!(start.dot(n).abs() < 1e-4);
            assert!(end.dot(n).abs() < 1e-4);
        }
    }

    #[test]
    fn plane_spacing_ignores_axis_length() {
        let mut list = DrawList::new();
        draw_plane(&mut list, Vec3::new(0.0, 0.0, 4.0), 2, 0.0, Color::GRAY);
        let lines: Vec<_> = list
            .lines()
            .map(|cmd| match cmd {
                DrawCommand::Line { start, .. } => *start,
                _ => unreachable!(),
            })
            .collect();
        // Consecutive lines of the same family sit one unit apart.
        assert!(((lines[2] - lines[0]).length() - 1.0).abs() < 1e-5);
        assert!(((lines[3] - lines[1]).length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn grid_draws_both_directions() {
        let mut list = DrawList::new();
        draw_grid(&mut list, 15, 1.0);
        assert_eq!(list.lines().count(), 30);

        let center: Vec<_> = list
            .lines()
            .filter(|cmd| matches!(cmd, DrawCommand::Line { color, .. } if *color == Color::DARK_GRAY))
            .collect();
        assert_eq!(center.len(), 2);
    }

    #[test]
    fn mesh_draws_faces_edges_and_vertices() {
        let cube = Mesh::cube();
        let mut list = DrawList::new();
        draw_mesh(&mut list, cube.vertices(), &cube, Color::LIGHT_GRAY);
        assert_eq!(list.triangles().count(), 12);
        assert_eq!(list.lines().count(), 18);
        assert_eq!(list.spheres().count(), 8);
    }

    #[test]
    fn fov_cone_outline() {
        let mut list = DrawList::new();
        draw_fov_cone(&mut list, &FovCone::default(), 20, Color::BLUE);
        assert_eq!(list.lines().count(), 41);
    }

    #[test]
    fn classified_points_are_colored() {
        let cone = FovCone::default();
        let points = [
            Vec3::new(1.5, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 4.0),
            Vec3::new(-5.0, 0.0, 4.0),
            Vec3::new(4.0, 0.0, 2.0),
        ];
        let mut list = DrawList::new();
        assert_eq!(draw_classified_points(&mut list, &cone, &points), 2);

        let colors: Vec<Color> = list
            .spheres()
            .map(|c| match c {
                DrawCommand::Sphere { color, .. } => *color,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(colors, vec![Color::GREEN, Color::GREEN, Color::RED, Color::RED]);
    }

    #[test]
    fn parallelogram_winding_follows_cross_sign() {
        let a = Vec3::new(-4.0, 0.0, -3.0);
        let b = Vec3::new(5.0, 0.0, -3.0);
        // cross(a, b).y = a.z * b.x - a.x * b.z = -15 - 12 < 0
        let mut list = DrawList::new();
        draw_parallelogram(&mut list, a, b);
        assert_eq!(list.cylinders().count(), 4);
        assert_eq!(list.lines().count(), 2);

        let first = list.triangles().next().copied();
        assert_eq!(
            first,
            Some(DrawCommand::Triangle {
                a: Vec3::ZERO,
                b,
                c: a,
                color: Color::VIOLET.fade(0.5),
            })
        );

        let mut swapped = DrawList::new();
        draw_parallelogram(&mut swapped, b, a);
        let first = swapped.triangles().next().copied();
        assert_eq!(
            first,
            Some(DrawCommand::Triangle {
                a: Vec3::ZERO,
                b,
                c: a,
                color: Color::VIOLET.fade(0.5),
            })
        );
    }

    #[test]
    fn fade_keeps_rgb() {
        let faded = Color::VIOLET.fade(0.25);
        assert_eq!(faded.to_array()[..3], Color::VIOLET.to_array()[..3]);
        assert_eq!(faded.a, 0.25);
    }
}
