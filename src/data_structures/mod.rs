//! Scene data: nodes, bounding boxes and the scene graph arena.
//!
//! - `bounding_box` is the axis-aligned box used for scene extents
//! - `node` defines the closed set of node variants
//! - `scene_graph` owns the nodes and their parent/child links

pub mod bounding_box;
pub mod node;
pub mod scene_graph;
