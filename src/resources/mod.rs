use std::collections::HashMap;

use crate::{data_structures::node::ResourceHandle, resources::mesh::GpuMesh};

/**
 * This module contains the GPU-side resources referenced by scene leaves.
 *
 * Leaves only store a `ResourceHandle`; the registry maps handles to the
 * uploaded buffers. Dropping a `GpuMesh` releases its buffers.
 */
pub mod mesh;

#[derive(Default)]
pub struct MeshRegistry {
    meshes: HashMap<ResourceHandle, GpuMesh>,
    next: u64,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mesh: GpuMesh) -> ResourceHandle {
        let handle = ResourceHandle(self.next);
        self.next += 1;
        self.meshes.insert(handle, mesh);
        handle
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&GpuMesh> {
        self.meshes.get(&handle)
    }

    pub fn remove(&mut self, handle: ResourceHandle) -> Option<GpuMesh> {
        self.meshes.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
