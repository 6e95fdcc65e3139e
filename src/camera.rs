//! Projection and view framing for a scene.
//!
//! The host application owns the camera. It sets the scene's projection when
//! the viewport changes and resets the scene's model-view to the camera's base
//! view before each render traversal; [`SceneCamera::apply`] does both.

use cgmath::{Deg, Matrix4, Rad, Vector3, perspective};

use crate::{
    context::RenderSettings,
    data_structures::{bounding_box::BoundingBox, scene_graph::SceneGraph},
};

/// cgmath builds OpenGL style clip space (z in -1..1), wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: aspect(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect(width, height);
    }

    pub fn set_depth_range(&mut self, znear: f32, zfar: f32) {
        self.znear = znear;
        self.zfar = zfar;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

fn aspect(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

/// Places the camera so that a bounding box sits in front of it.
///
/// The box center is moved to the origin and then pushed back along -z by
/// half the diameter. The far plane lies one diameter behind the near plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewFit {
    pub offset: Vector3<f32>,
    pub z_near: f32,
    pub z_far: f32,
}

impl ViewFit {
    pub fn from_bounds(bbox: &BoundingBox, z_near: f32) -> Self {
        let diameter = bbox.diameter();
        let mut offset = -bbox.center();
        offset.z -= 0.5 * diameter;
        // a degenerate box still needs a non-empty depth range
        let depth = if diameter > 0.0 { diameter } else { 1.0 };
        Self {
            offset,
            z_near,
            z_far: z_near + depth,
        }
    }

    pub fn model_view(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.offset)
    }
}

/// A projection plus a view fitted to the scene bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCamera {
    pub projection: Projection,
    pub fit: ViewFit,
}

impl SceneCamera {
    pub fn new(bbox: &BoundingBox, width: u32, height: u32, settings: &RenderSettings) -> Self {
        let fit = ViewFit::from_bounds(bbox, settings.z_near);
        let projection = Projection::new(width, height, Deg(settings.fovy), fit.z_near, fit.z_far);
        Self { projection, fit }
    }

    /// Refits the view to a new bounding box, keeping the field of view and aspect.
    pub fn refit(&mut self, bbox: &BoundingBox) {
        self.fit = ViewFit::from_bounds(bbox, self.fit.z_near);
        self.projection.set_depth_range(self.fit.z_near, self.fit.z_far);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Writes the projection and the base model-view into `scene`.
    pub fn apply(&self, scene: &mut SceneGraph) {
        scene.projection = self.projection.calc_matrix();
        scene.model_view = self.fit.model_view();
    }
}
