//! Errors raised while building a scene graph.

use thiserror::Error;

use crate::data_structures::scene_graph::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist in this scene")]
    UnknownNode(NodeId),

    #[error("node {0:?} is not a transform and cannot have children")]
    NotATransform(NodeId),

    #[error("node {0:?} is already attached to the scene")]
    AlreadyAttached(NodeId),

    #[error("attaching {child:?} below {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

pub type Result<T> = std::result::Result<T, SceneError>;
