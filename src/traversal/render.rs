//! Rendering of a scene through a [`RenderBackend`].

use cgmath::{Matrix4, SquareMatrix};
use log::debug;

use crate::{
    data_structures::{
        node::{Cone, Cube, GeometricObject, GroundPlane, LineQuad, Sphere, SphereLines, Transform},
        scene_graph::SceneGraph,
    },
    render::{DrawCall, DrawCommand, PolygonFill, RenderBackend, Topology},
    traversal::Traversal,
};

/// Emits the draw commands of every leaf reachable from the roots.
///
/// The traversal keeps its own copy of the projection and model-view matrix,
/// loaded from the scene when a traversal starts. Each transform multiplies its
/// matrix into the model-view for the duration of its subtree and restores the
/// previous value afterwards, so siblings never see each other's transforms and
/// the scene's matrices are never written.
pub struct RenderTraversal<'a> {
    backend: &'a mut dyn RenderBackend,
    projection: Matrix4<f32>,
    model_view: Matrix4<f32>,
    draws: usize,
}

impl<'a> RenderTraversal<'a> {
    pub fn new(backend: &'a mut dyn RenderBackend) -> Self {
        Self {
            backend,
            projection: Matrix4::identity(),
            model_view: Matrix4::identity(),
            draws: 0,
        }
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    /// Model-view matrix applying to the node currently being visited.
    pub fn model_view(&self) -> Matrix4<f32> {
        self.model_view
    }

    /// Number of draw commands issued by the last traversal.
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    fn emit(&mut self, geometry: &GeometricObject, call: DrawCall) {
        self.backend.draw(DrawCommand {
            resource: geometry.resource,
            projection: self.projection,
            model_view: self.model_view,
            call,
        });
        self.draws += 1;
    }
}

impl Traversal for RenderTraversal<'_> {
    fn traverse(&mut self, scene: &SceneGraph) {
        self.begin(scene);
        for node in scene.roots() {
            node.receive(scene, self);
        }
        debug!(
            "render traversal issued {} draw(s) for {} root(s)",
            self.draws,
            scene.root_ids().len()
        );
    }

    fn begin(&mut self, scene: &SceneGraph) {
        self.projection = scene.projection;
        self.model_view = scene.model_view;
        self.draws = 0;
    }

    fn visit_geometric_object(&mut self, _scene: &SceneGraph, node: &GeometricObject) {
        self.emit(node, DrawCall::arrays(Topology::TriangleFan, 0..node.vertex_count));
    }

    fn visit_cone(&mut self, _scene: &SceneGraph, node: &Cone) {
        let cone = node.cone_indices;
        let base = cone + node.base_indices;
        self.emit(
            &node.geometry,
            DrawCall::indexed(Topology::TriangleFan, 0..cone).with_fill(PolygonFill::Line),
        );
        self.emit(
            &node.geometry,
            DrawCall::indexed(Topology::TriangleFan, cone..base).with_fill(PolygonFill::Line),
        );
    }

    fn visit_ground_plane(&mut self, _scene: &SceneGraph, node: &GroundPlane) {
        let count = node.geometry.vertex_count;
        self.emit(&node.geometry, DrawCall::arrays(Topology::TriangleFan, 0..count));
    }

    fn visit_cube(&mut self, _scene: &SceneGraph, node: &Cube) {
        let count = node.geometry.vertex_count;
        self.emit(&node.geometry, DrawCall::arrays(Topology::TriangleList, 0..count));
    }

    fn visit_sphere(&mut self, _scene: &SceneGraph, node: &Sphere) {
        let count = node.geometry.vertex_count;
        self.emit(&node.geometry, DrawCall::arrays(Topology::TriangleStrip, 0..count));
    }

    fn visit_sphere_lines(&mut self, _scene: &SceneGraph, node: &SphereLines) {
        let count = node.geometry.vertex_count;
        self.emit(
            &node.geometry,
            DrawCall::arrays(Topology::TriangleStrip, 0..count).blended(),
        );
    }

    fn visit_line_quad(&mut self, _scene: &SceneGraph, node: &LineQuad) {
        self.emit(
            &node.geometry,
            DrawCall::arrays(Topology::TriangleStrip, 0..LineQuad::QUAD_VERTICES)
                .instanced(node.instances),
        );
    }

    fn visit_transform(&mut self, scene: &SceneGraph, node: &Transform) {
        let saved = self.model_view;
        self.model_view = saved * node.xform;
        self.descend(scene, node);
        self.model_view = saved;
    }
}
