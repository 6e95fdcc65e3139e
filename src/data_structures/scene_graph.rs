//! Scene graph and hierarchical scene organization.
//!
//! The [`SceneGraph`] owns every node of a scene in an arena. Roots are kept in
//! insertion order, which is also the order traversals visit them in (and
//! therefore the draw order). A [`Transform`] references its children by
//! [`NodeId`], so the hierarchy is a tree of ids rather than of pointers and
//! removing a node removes its whole subtree.
//!
//! Besides the nodes the graph carries the projection and the base model-view
//! matrix. The host sets `projection` on resize and resets `model_view` to the
//! camera's view before rendering; traversals copy both into their own context
//! and never write them back.

use cgmath::{Matrix4, SquareMatrix};
use log::debug;
use slotmap::{SlotMap, new_key_type};

use crate::{
    data_structures::{
        bounding_box::BoundingBox,
        node::{Node, Transform},
    },
    error::{Result, SceneError},
    traversal::{Traversal, bounding_box::BoundingBoxTraversal},
};

new_key_type! {
    /// Stable handle to a node stored in a [`SceneGraph`].
    pub struct NodeId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Link {
    Detached,
    Root,
    Child(NodeId),
}

#[derive(Debug)]
struct Slot {
    node: Node,
    link: Link,
}

#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Slot>,
    roots: Vec<NodeId>,
    /// Projection transformation for the scene
    pub projection: Matrix4<f32>,
    /// Base model-view transformation for the scene
    pub model_view: Matrix4<f32>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            projection: Matrix4::identity(),
            model_view: Matrix4::identity(),
        }
    }

    /// Appends `node` to the roots of the scene.
    pub fn add_node(&mut self, node: impl Into<Node>) -> NodeId {
        let id = self.nodes.insert(Slot {
            node: node.into(),
            link: Link::Root,
        });
        self.roots.push(id);
        id
    }

    /// Appends `node` to the children of the transform `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: impl Into<Node>) -> Result<NodeId> {
        self.transform_mut(parent)?;
        let id = self.nodes.insert(Slot {
            node: node.into(),
            link: Link::Child(parent),
        });
        self.push_child(parent, id);
        Ok(id)
    }

    /// Stores `node` without attaching it anywhere. Detached nodes are not
    /// visited until they are attached with [`Self::attach_root`] or [`Self::attach`].
    pub fn insert(&mut self, node: impl Into<Node>) -> NodeId {
        self.nodes.insert(Slot {
            node: node.into(),
            link: Link::Detached,
        })
    }

    pub fn attach_root(&mut self, id: NodeId) -> Result<()> {
        let slot = self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))?;
        if slot.link != Link::Detached {
            return Err(SceneError::AlreadyAttached(id));
        }
        slot.link = Link::Root;
        self.roots.push(id);
        Ok(())
    }

    /// Attaches the detached node `child` below the transform `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.transform_mut(parent)?;
        let link = self
            .nodes
            .get(child)
            .map(|slot| slot.link)
            .ok_or(SceneError::UnknownNode(child))?;
        if link != Link::Detached {
            return Err(SceneError::AlreadyAttached(child));
        }
        // A detached child can only close a cycle if `parent` hangs below it.
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        if let Some(slot) = self.nodes.get_mut(child) {
            slot.link = Link::Child(parent);
        }
        self.push_child(parent, child);
        Ok(())
    }

    /// Removes `id` and everything below it.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        let link = self
            .nodes
            .get(id)
            .map(|slot| slot.link)
            .ok_or(SceneError::UnknownNode(id))?;
        match link {
            Link::Root => self.roots.retain(|root| *root != id),
            Link::Child(parent) => {
                if let Some(Node::Transform(t)) = self.nodes.get_mut(parent).map(|s| &mut s.node) {
                    t.children.retain(|c| *c != id);
                }
            }
            Link::Detached => (),
        }

        let mut removed = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(slot) = self.nodes.remove(next) {
                removed += 1;
                if let Node::Transform(t) = slot.node {
                    pending.extend(t.children);
                }
            }
        }
        debug!("removed {} node(s) from scene graph", removed);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).map(|slot| &slot.node)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Result<&mut Transform> {
        let slot = self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))?;
        slot.node
            .as_transform_mut()
            .ok_or(SceneError::NotATransform(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes.get(id)?.link {
            Link::Child(parent) => Some(parent),
            Link::Root | Link::Detached => None,
        }
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.roots
    }

    /// Root nodes in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.roots.iter().filter_map(|id| self.node(*id))
    }

    /// Children of `transform` in insertion order.
    pub fn children<'a>(&'a self, transform: &'a Transform) -> impl Iterator<Item = &'a Node> {
        transform.children.iter().filter_map(|id| self.node(*id))
    }

    /// Number of stored nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Merged local-space bounding box of everything reachable from the roots.
    pub fn bounds(&self) -> BoundingBox {
        let mut traversal = BoundingBoxTraversal::new();
        traversal.traverse(self);
        traversal.bbox
    }

    fn push_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(Node::Transform(t)) = self.nodes.get_mut(parent).map(|s| &mut s.node) {
            t.children.push(child);
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        while let Some(parent) = self.parent(id) {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
