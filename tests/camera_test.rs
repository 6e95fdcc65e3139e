use approx::assert_relative_eq;
use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};
use scene_ngin::{
    BoundingBox, SceneGraph,
    camera::{Projection, SceneCamera, ViewFit},
    context::RenderSettings,
};

mod common;
use crate::common::test_utils::{leaf, unit_bbox};

#[test]
fn view_fit_centers_and_backs_off() {
    let bbox = BoundingBox::new([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    let fit = ViewFit::from_bounds(&bbox, 1.0);
    let diameter = bbox.diameter();

    assert_relative_eq!(fit.offset.x, -1.0);
    assert_relative_eq!(fit.offset.y, -1.0);
    assert_relative_eq!(fit.offset.z, -1.0 - 0.5 * diameter, epsilon = 1e-6);
    assert_relative_eq!(fit.z_far, 1.0 + diameter, epsilon = 1e-6);

    // the box center ends up on the -z axis
    let center = fit.model_view() * Vector4::new(1.0, 1.0, 1.0, 1.0);
    assert_relative_eq!(center.x, 0.0);
    assert_relative_eq!(center.y, 0.0);
    assert!(center.z < 0.0);
}

#[test]
fn degenerate_bounds_keep_a_depth_range() {
    let fit = ViewFit::from_bounds(&BoundingBox::default(), 0.5);
    assert_eq!(fit.offset, Vector3::new(0.0, 0.0, 0.0));
    assert!(fit.z_far > fit.z_near);
}

#[test]
fn projection_survives_zero_height() {
    let mut projection = Projection::new(800, 600, cgmath::Deg(80.0), 1.0, 10.0);
    assert_relative_eq!(projection.aspect(), 800.0 / 600.0);
    projection.resize(640, 0);
    assert!(projection.aspect().is_finite());
}

#[test]
fn camera_writes_scene_matrices() {
    let mut scene = SceneGraph::new();
    scene.add_node(leaf(1));

    let camera = SceneCamera::new(&scene.bounds(), 400, 300, &RenderSettings::default());
    camera.apply(&mut scene);

    assert_ne!(scene.projection, Matrix4::identity());
    assert_eq!(scene.model_view, ViewFit::from_bounds(&unit_bbox(), 1.0).model_view());
}

#[test]
fn refit_follows_new_bounds() {
    let mut camera = SceneCamera::new(&unit_bbox(), 400, 300, &RenderSettings::default());
    let bigger = BoundingBox::new([-10.0, -10.0, -10.0], [10.0, 10.0, 10.0]);
    camera.refit(&bigger);
    assert_eq!(camera.fit, ViewFit::from_bounds(&bigger, 1.0));
}
