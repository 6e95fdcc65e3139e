//! Render pipelines for the scene backend.
//!
//! - `basic` builds pipeline and primitive state from draw call attributes
//! - `scene` owns the uploaded meshes and replays draw lists on the GPU

pub mod basic;
pub mod scene;
