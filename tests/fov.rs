use transform_lab::draw::DrawCommand;
use transform_lab::fov::in_fov;
use transform_lab::scenes::FovScene;
use transform_lab::widgets::{Pointer, WidgetState};
use transform_lab::{DrawList, FovCone, Vec3, build_frame, vector};

#[test]
fn reference_points_against_the_default_cone() {
    let cone = FovCone::default();
    assert_eq!(cone.half_angle_degrees(), 45.0);

    assert!(cone.contains(Vec3::new(1.5, 0.0, 2.0)));
    assert!(cone.contains(Vec3::new(2.0, 0.0, 4.0)));
    // Too far, whatever the angle.
    assert!(!cone.contains(Vec3::new(-5.0, 0.0, 4.0)));
    // Close enough but 63° off axis.
    assert!(!cone.contains(Vec3::new(4.0, 0.0, 2.0)));
}

#[test]
fn cone_matches_the_raw_test_with_half_the_aperture() {
    let cone = FovCone::new(Vec3::new(1.0, 0.0, -1.0), Vec3::X, 4.0, 60.0);
    for x in -4..=4 {
        for z in -4..=4 {
            let p = Vec3::new(x as f32, 0.0, z as f32);
            assert_eq!(
                cone.contains(p),
                in_fov(cone.origin, cone.direction, 4.0, 30.0, p),
                "{p}"
            );
        }
    }
}

#[test]
fn origin_is_inside_only_from_ninety_degrees() {
    assert!(!in_fov(Vec3::ZERO, Vec3::Z, 5.0, 45.0, Vec3::ZERO));
    assert!(in_fov(Vec3::ZERO, Vec3::Z, 5.0, 90.0, Vec3::ZERO));
}

#[test]
fn cone_outline_reaches_max_distance() {
    let cone = FovCone::default();
    let arc = cone.arc_points(20);
    assert_eq!(arc.len(), 21);
    for p in &arc {
        assert!((vector::length(*p) - 5.0).abs() < 1e-5);
    }
    // Both ends sit on the boundary; everything between is well inside.
    for p in &arc[1..arc.len() - 1] {
        assert!(cone.contains(*p * 0.999));
    }
    assert!(arc[0].x < 0.0 && arc[20].x > 0.0);
}

#[test]
fn scene_frame_classifies_every_point() {
    let mut scene = FovScene::new(2024);
    let mut widgets = WidgetState::default();
    let mut list = DrawList::new();

    build_frame(&mut scene, &mut widgets, Pointer::default(), &mut list, 0.0);

    let (mut green, mut red) = (0, 0);
    for command in list.spheres() {
        if let DrawCommand::Sphere { color, .. } = command {
            if *color == transform_lab::Color::GREEN {
                green += 1;
            } else if *color == transform_lab::Color::RED {
                red += 1;
            }
        }
    }
    assert_eq!(green, scene.inside());
    assert_eq!(green + red, scene.points().len());
    // The two hand-placed inside points at least.
    assert!(green >= 2);
}
