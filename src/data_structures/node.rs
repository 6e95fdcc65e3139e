//! Scene graph members.
//!
//! [`Node`] is the closed set of everything that can live in a [`SceneGraph`].
//! Leaves carry a [`GeometricObject`] (bounding box + render resource), the
//! interior [`Transform`] carries a local matrix and the ids of its children.
//!
//! Nodes know nothing about the algorithms run over them. The only behaviour
//! they expose is [`Node::receive`], which hands the concrete payload back to
//! the traversal.

use cgmath::{Matrix4, SquareMatrix};

use crate::{
    data_structures::{bounding_box::BoundingBox, scene_graph::{NodeId, SceneGraph}},
    traversal::Traversal,
};

/// Opaque handle to GPU-side geometry owned by a render backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(pub u64);

/// Base data of every renderable leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometricObject {
    pub bbox: BoundingBox,
    pub resource: ResourceHandle,
    /// number of vertices to be rendered
    pub vertex_count: u32,
}

impl GeometricObject {
    pub fn new(bbox: BoundingBox, resource: ResourceHandle, vertex_count: u32) -> Self {
        Self {
            bbox,
            resource,
            vertex_count,
        }
    }
}

/// A cone whose surface is split into two index ranges: the mantle fan
/// followed by the base fan.
#[derive(Clone, Debug, PartialEq)]
pub struct Cone {
    pub geometry: GeometricObject,
    pub cone_indices: u32,
    pub base_indices: u32,
}

impl Cone {
    pub fn new(geometry: GeometricObject, cone_indices: u32, base_indices: u32) -> Self {
        Self {
            geometry,
            cone_indices,
            base_indices,
        }
    }
}

/// A flat quad used as the floor of a scene, drawn as a single fan.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundPlane {
    pub geometry: GeometricObject,
}

/// A cube stored as a plain triangle list.
#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    pub geometry: GeometricObject,
}

/// A sphere stored as one long triangle strip.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub geometry: GeometricObject,
}

/// Radial line strips around a sphere, drawn with blending enabled.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereLines {
    pub geometry: GeometricObject,
}

/// A four vertex strip drawn `instances` times.
#[derive(Clone, Debug, PartialEq)]
pub struct LineQuad {
    pub geometry: GeometricObject,
    pub instances: u32,
}

impl LineQuad {
    pub const QUAD_VERTICES: u32 = 4;

    pub fn new(geometry: GeometricObject, instances: u32) -> Self {
        Self {
            geometry,
            instances,
        }
    }
}

/// Interior node: a local transformation applied to an ordered list of children.
///
/// Children are referenced by id and owned by the [`SceneGraph`]; use
/// [`SceneGraph::add_child`] or [`SceneGraph::attach`] to populate them.
///
/// A clone copies the matrix only. The children stay with the original, so a
/// clone inserted into the graph starts out as an empty group.
#[derive(Debug, PartialEq)]
pub struct Transform {
    pub xform: Matrix4<f32>,
    pub(crate) children: Vec<NodeId>,
}

impl Transform {
    pub fn new() -> Self {
        Self::from_matrix(Matrix4::identity())
    }

    pub fn from_matrix(xform: Matrix4<f32>) -> Self {
        Self {
            xform,
            children: Vec::new(),
        }
    }

    /// Post-multiplies the local matrix: `xform = xform * m`.
    pub fn apply(&mut self, m: Matrix4<f32>) {
        self.xform = self.xform * m;
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl Clone for Transform {
    fn clone(&self) -> Self {
        Self::from_matrix(self.xform)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    GeometricObject(GeometricObject),
    Cone(Cone),
    GroundPlane(GroundPlane),
    Cube(Cube),
    Sphere(Sphere),
    SphereLines(SphereLines),
    LineQuad(LineQuad),
    Transform(Transform),
}

impl Node {
    /// Dispatches `self` to the matching `visit_*` hook of `traversal`.
    ///
    /// A Transform does not recurse here, descending is up to the traversal.
    pub fn receive<T: Traversal + ?Sized>(&self, scene: &SceneGraph, traversal: &mut T) {
        match self {
            Node::GeometricObject(node) => traversal.visit_geometric_object(scene, node),
            Node::Cone(node) => traversal.visit_cone(scene, node),
            Node::GroundPlane(node) => traversal.visit_ground_plane(scene, node),
            Node::Cube(node) => traversal.visit_cube(scene, node),
            Node::Sphere(node) => traversal.visit_sphere(scene, node),
            Node::SphereLines(node) => traversal.visit_sphere_lines(scene, node),
            Node::LineQuad(node) => traversal.visit_line_quad(scene, node),
            Node::Transform(node) => traversal.visit_transform(scene, node),
        }
    }

    /// The leaf payload, `None` for a Transform.
    pub fn geometry(&self) -> Option<&GeometricObject> {
        match self {
            Node::GeometricObject(g) => Some(g),
            Node::Cone(Cone { geometry, .. })
            | Node::GroundPlane(GroundPlane { geometry })
            | Node::Cube(Cube { geometry })
            | Node::Sphere(Sphere { geometry })
            | Node::SphereLines(SphereLines { geometry })
            | Node::LineQuad(LineQuad { geometry, .. }) => Some(geometry),
            Node::Transform(_) => None,
        }
    }

    pub fn as_transform(&self) -> Option<&Transform> {
        match self {
            Node::Transform(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_transform_mut(&mut self) -> Option<&mut Transform> {
        match self {
            Node::Transform(t) => Some(t),
            _ => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Node {
                fn from(node: $variant) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

impl_from_variant!(
    GeometricObject,
    Cone,
    GroundPlane,
    Cube,
    Sphere,
    SphereLines,
    LineQuad,
    Transform,
);
