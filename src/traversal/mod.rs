//! Traversals over a [`SceneGraph`].
//!
//! A traversal is an algorithm that walks the scene via double dispatch: the
//! traversal asks each root node to [`Node::receive`] it, and the node calls
//! back the `visit_*` hook matching its variant. Every hook defaults to a
//! no-op, so a traversal only overrides the variants it cares about and any
//! other variant is silently skipped.
//!
//! Transforms never recurse by themselves. A traversal that wants to see the
//! children of a transform calls [`Traversal::descend`] from its
//! `visit_transform`, and is free to wrap that call with whatever state it
//! needs to carry (see [`render::RenderTraversal`]).
//!
//! # Adding a node variant
//!
//! Add the variant to [`Node`], a `visit_*` hook with an empty default body
//! here, and an arm in [`Node::receive`]. Existing traversals keep compiling
//! and skip the new variant until they override its hook.
//!
//! [`Node`]: crate::data_structures::node::Node
//! [`Node::receive`]: crate::data_structures::node::Node::receive

use crate::data_structures::{
    node::{Cone, Cube, GeometricObject, GroundPlane, LineQuad, Sphere, SphereLines, Transform},
    scene_graph::SceneGraph,
};

pub mod bounding_box;
pub mod render;

pub trait Traversal {
    /// Runs the traversal over every root of `scene`, in insertion order.
    fn traverse(&mut self, scene: &SceneGraph) {
        self.begin(scene);
        for node in scene.roots() {
            node.receive(scene, self);
        }
    }

    /// Called once at the start of [`Self::traverse`], before any root is visited.
    fn begin(&mut self, _scene: &SceneGraph) {}

    /// Dispatches every child of `transform` back into `self`.
    fn descend(&mut self, scene: &SceneGraph, transform: &Transform) {
        for child in scene.children(transform) {
            child.receive(scene, self);
        }
    }

    fn visit_geometric_object(&mut self, _scene: &SceneGraph, _node: &GeometricObject) {}
    fn visit_cone(&mut self, _scene: &SceneGraph, _node: &Cone) {}
    fn visit_ground_plane(&mut self, _scene: &SceneGraph, _node: &GroundPlane) {}
    fn visit_cube(&mut self, _scene: &SceneGraph, _node: &Cube) {}
    fn visit_sphere(&mut self, _scene: &SceneGraph, _node: &Sphere) {}
    fn visit_sphere_lines(&mut self, _scene: &SceneGraph, _node: &SphereLines) {}
    fn visit_line_quad(&mut self, _scene: &SceneGraph, _node: &LineQuad) {}
    fn visit_transform(&mut self, _scene: &SceneGraph, _node: &Transform) {}
}
