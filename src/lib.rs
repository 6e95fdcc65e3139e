//! scene-ngin
//!
//! A small scene-graph engine: a tree of transform groups and geometric leaves
//! that is walked by traversals. Each traversal is one operation (computing
//! bounds, issuing draws) implemented once over the closed set of node kinds,
//! so adding an operation never touches the node types.
//!
//! High-level modules
//! - `data_structures`: node kinds, bounding boxes and the scene graph arena
//! - `traversal`: the traversal trait plus the bounding box and render traversals
//! - `render`: draw commands and the backend seam render traversals emit into
//! - `camera`: projection and a view that fits the scene bounds
//! - `context`: GPU device setup and render settings
//! - `pipelines`: the wgpu backend that replays recorded draws
//! - `resources`: GPU meshes referenced by scene leaves
//! - `error`: scene graph errors
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod traversal;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use wgpu;

pub use data_structures::bounding_box::BoundingBox;
pub use data_structures::node::{Node, ResourceHandle};
pub use data_structures::scene_graph::{NodeId, SceneGraph};
pub use error::SceneError;
pub use traversal::Traversal;
