//! Bounding box of a whole scene.

use cgmath::{Matrix4, SquareMatrix};

use crate::{
    data_structures::{
        bounding_box::BoundingBox,
        node::{Cone, Cube, GeometricObject, GroundPlane, LineQuad, Sphere, SphereLines, Transform},
        scene_graph::SceneGraph,
    },
    traversal::Traversal,
};

/// Coordinate frame the leaf boxes are merged in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundsSpace {
    /// Leaf boxes are merged as stored, ignoring every ancestor transform.
    #[default]
    Local,
    /// Leaf boxes are moved through the product of their ancestor transforms first.
    World,
}

/// Computes the bounding box of every leaf reachable from the roots.
///
/// By default boxes are merged in each leaf's local space: a transform's
/// matrix is *not* applied to its children. For scenes that nest non-identity
/// transforms use [`BoundingBoxTraversal::world_space`].
///
/// The accumulator keeps growing across calls to `traverse`; call
/// [`BoundingBoxTraversal::reset`] or build a new traversal to start over.
#[derive(Clone, Debug)]
pub struct BoundingBoxTraversal {
    /// Bounding box of the entire scene
    pub bbox: BoundingBox,
    space: BoundsSpace,
    xform: Matrix4<f32>,
}

impl BoundingBoxTraversal {
    pub fn new() -> Self {
        Self::with_space(BoundsSpace::Local)
    }

    pub fn world_space() -> Self {
        Self::with_space(BoundsSpace::World)
    }

    pub fn with_space(space: BoundsSpace) -> Self {
        Self {
            bbox: BoundingBox::default(),
            space,
            xform: Matrix4::identity(),
        }
    }

    pub fn space(&self) -> BoundsSpace {
        self.space
    }

    pub fn reset(&mut self) {
        self.bbox = BoundingBox::default();
        self.xform = Matrix4::identity();
    }

    fn merge(&mut self, geometry: &GeometricObject) {
        let leaf = match self.space {
            BoundsSpace::Local => geometry.bbox,
            BoundsSpace::World => geometry.bbox.transformed(&self.xform),
        };
        self.bbox = self.bbox.merge(&leaf);
    }
}

impl Default for BoundingBoxTraversal {
    fn default() -> Self {
        Self::new()
    }
}

impl Traversal for BoundingBoxTraversal {
    fn begin(&mut self, _scene: &SceneGraph) {
        self.xform = Matrix4::identity();
    }

    fn visit_geometric_object(&mut self, _scene: &SceneGraph, node: &GeometricObject) {
        self.merge(node);
    }

    fn visit_cone(&mut self, _scene: &SceneGraph, node: &Cone) {
        self.merge(&node.geometry);
    }

    fn visit_ground_plane(&mut self, _scene: &SceneGraph, node: &GroundPlane) {
        self.merge(&node.geometry);
    }

    fn visit_cube(&mut self, _scene: &SceneGraph, node: &Cube) {
        self.merge(&node.geometry);
    }

    fn visit_sphere(&mut self, _scene: &SceneGraph, node: &Sphere) {
        self.merge(&node.geometry);
    }

    fn visit_sphere_lines(&mut self, _scene: &SceneGraph, node: &SphereLines) {
        self.merge(&node.geometry);
    }

    fn visit_line_quad(&mut self, _scene: &SceneGraph, node: &LineQuad) {
        self.merge(&node.geometry);
    }

    fn visit_transform(&mut self, scene: &SceneGraph, node: &Transform) {
        match self.space {
            BoundsSpace::Local => self.descend(scene, node),
            BoundsSpace::World => {
                let saved = self.xform;
                self.xform = saved * node.xform;
                self.descend(scene, node);
                self.xform = saved;
            }
        }
    }
}
