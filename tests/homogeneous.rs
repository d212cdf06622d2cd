use approx::assert_abs_diff_eq;
use transform_lab::controls::{ProjectionMode, TransformControls};
use transform_lab::pipeline::{apply_homogeneous, compose};
use transform_lab::scenes::HomogeneousScene;
use transform_lab::transforms::{
    orthographic_projection_homogeneous, perspective_projection, rotation_homogeneous, translation,
};
use transform_lab::widgets::{Pointer, WidgetState};
use transform_lab::{DrawList, Mat4, Mesh, TransformError, Vec3, build_frame};

fn sample() -> Vec<Vec3> {
    vec![
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-0.5, 0.25, 4.0),
        Vec3::new(2.0, -3.0, 1.5),
    ]
}

#[test]
fn translation_then_its_inverse_is_identity() {
    let there = translation(1.5, -2.0, 0.25);
    let back = translation(-1.5, 2.0, -0.25);
    let out = apply_homogeneous(&sample(), &[there, back]).unwrap();
    for (a, b) in out.iter().zip(sample()) {
        assert!(a.abs_diff_eq(b, 1e-6));
    }
}

#[test]
fn orthographic_projection_is_idempotent() {
    let p = orthographic_projection_homogeneous(Vec3::new(1.0, 1.0, 0.0), 0.0);
    assert!((p * p).abs_diff_eq(p, 1e-6));

    let ground = orthographic_projection_homogeneous(Vec3::Y, -20.0);
    let once = apply_homogeneous(&sample(), &[ground]).unwrap();
    let twice = apply_homogeneous(&sample(), &[ground, ground]).unwrap();
    for (a, b) in once.iter().zip(&twice) {
        assert!(a.abs_diff_eq(*b, 1e-5));
        assert_abs_diff_eq!(a.y, -20.0, epsilon = 1e-6);
    }
}

#[test]
fn perspective_divide_lands_on_the_focal_plane() {
    let d = 2.5;
    let out = apply_homogeneous(&sample(), &[perspective_projection(d).unwrap()]).unwrap();
    for (projected, v) in out.iter().zip(sample()) {
        assert_abs_diff_eq!(projected.x, v.x * d / v.z, epsilon = 1e-5);
        assert_abs_diff_eq!(projected.y, v.y * d / v.z, epsilon = 1e-5);
        assert_abs_diff_eq!(projected.z, d, epsilon = 1e-5);
    }
}

#[test]
fn perspective_rejects_bad_input() {
    assert_eq!(
        perspective_projection(0.0),
        Err(TransformError::InvalidFocalDistance(0.0))
    );
    assert!(perspective_projection(f32::INFINITY).is_err());

    let p = perspective_projection(1.0).unwrap();
    let err = apply_homogeneous(&[Vec3::new(1.0, 1.0, 2.0), Vec3::new(1.0, 1.0, 0.0)], &[p]);
    assert!(matches!(
        err,
        Err(TransformError::DegenerateProjection { vertex: 1, .. })
    ));
}

#[test]
fn stack_applies_translation_rotation_scaling_projection() {
    let controls = TransformControls {
        translation: Vec3::new(1.0, 0.0, 0.0),
        axis: Vec3::Y,
        angle_degrees: 90.0,
        scale: 2.0,
        ..TransformControls::default()
    };
    let stack = controls.homogeneous_stack().unwrap();
    let [t, r, s, p] = stack.matrices();
    assert_eq!(p, Mat4::IDENTITY);
    assert!(stack.matrix().abs_diff_eq(compose(&[t, r, s, p]), 1e-6));

    // Moved to (1, 0, 0), turned to (0, 0, -1), scale along Y leaves it there.
    let out = stack.apply(&[Vec3::ZERO]).unwrap();
    assert!(out[0].abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    assert!(r.abs_diff_eq(rotation_homogeneous(Vec3::Y, std::f32::consts::FRAC_PI_2), 1e-6));
}

#[test]
fn projection_slider_drives_the_scene() {
    let mut scene = HomogeneousScene::new(Mesh::cube());
    scene.controls.translation = Vec3::new(0.0, 0.0, 3.0);
    let mut widgets = WidgetState::default();
    let mut list = DrawList::new();

    scene.controls.projection = 0.0;
    assert_eq!(scene.controls.projection_mode(), ProjectionMode::Orthographic);
    build_frame(&mut scene, &mut widgets, Pointer::default(), &mut list, 0.0);
    // Default axis is X: everything flattened onto x = 0.
    assert!(scene.vertices().unwrap().iter().all(|v| v.x.abs() < 1e-6));

    scene.controls.projection = 1.0;
    scene.controls.focal_distance = 4.0;
    build_frame(&mut scene, &mut widgets, Pointer::default(), &mut list, 0.0);
    assert!(scene.vertices().unwrap().iter().all(|v| (v.z - 4.0).abs() < 1e-5));

    scene.controls.translation = Vec3::new(0.0, 0.0, -0.5);
    build_frame(&mut scene, &mut widgets, Pointer::default(), &mut list, 0.0);
    assert!(scene.vertices().is_none());
    assert_eq!(list.triangles().count(), 0);
}
