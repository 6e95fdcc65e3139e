use std::{collections::HashMap, ops::Range};

use anyhow::{bail, ensure};
use wgpu::util::DeviceExt;

use crate::render::Primitives;

/// CPU-side geometry handed over by whoever builds the shapes.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub label: String,
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    /// Primitive ranges that will be drawn as triangle fans.
    pub fans: Vec<Primitives>,
}

impl MeshData {
    pub fn new(label: impl Into<String>, positions: Vec<[f32; 3]>) -> Self {
        Self {
            label: label.into(),
            positions,
            ..Default::default()
        }
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = indices;
        self
    }

    pub fn with_fan(mut self, fan: Primitives) -> Self {
        self.fans.push(fan);
        self
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
}

impl SceneVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// Geometry living on the GPU.
///
/// wgpu has no triangle fans, so every fan declared in [`MeshData::fans`] is
/// expanded into a triangle list at upload time and stored in `fan_buffer`.
pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub fan_buffer: Option<wgpu::Buffer>,
    pub num_vertices: u32,
    pub num_indices: u32,
    fans: HashMap<Primitives, Range<u32>>,
}

impl GpuMesh {
    /// Range in `fan_buffer` holding the expanded triangle list of `fan`.
    pub fn fan_range(&self, fan: &Primitives) -> Option<Range<u32>> {
        self.fans.get(fan).cloned()
    }
}

/// Turns one triangle fan into a triangle list: `[v0, v1, v2, v3]` becomes
/// `[v0, v1, v2, v0, v2, v3]`. Fans with fewer than three entries yield nothing.
pub fn fan_to_list(fan: &[u32]) -> Vec<u32> {
    let Some((&hub, rim)) = fan.split_first() else {
        return Vec::new();
    };
    rim.windows(2).flat_map(|edge| [hub, edge[0], edge[1]]).collect()
}

/// Expands every declared fan of `data`, returning the concatenated triangle
/// list and where each fan ended up in it.
pub fn expand_fans(data: &MeshData) -> anyhow::Result<(Vec<u32>, HashMap<Primitives, Range<u32>>)> {
    let mut list = Vec::new();
    let mut ranges = HashMap::new();
    for fan in &data.fans {
        let sequence: Vec<u32> = match fan {
            Primitives::Vertices(range) => {
                ensure!(
                    range.end as usize <= data.positions.len(),
                    "fan {:?} of mesh {} exceeds its {} vertices",
                    range,
                    data.label,
                    data.positions.len()
                );
                range.clone().collect()
            }
            Primitives::Indices(range) => match data.indices.get(range.start as usize..range.end as usize) {
                Some(indices) => indices.to_vec(),
                None => bail!(
                    "fan {:?} of mesh {} exceeds its {} indices",
                    range,
                    data.label,
                    data.indices.len()
                ),
            },
        };
        let start = list.len() as u32;
        list.extend(fan_to_list(&sequence));
        ranges.insert(fan.clone(), start..list.len() as u32);
    }
    Ok((list, ranges))
}

pub fn load_mesh(device: &wgpu::Device, data: &MeshData) -> anyhow::Result<GpuMesh> {
    ensure!(!data.positions.is_empty(), "mesh {} has no vertices", data.label);
    if let Some(bad) = data.indices.iter().find(|i| **i as usize >= data.positions.len()) {
        bail!(
            "mesh {} references vertex {} but only has {}",
            data.label,
            bad,
            data.positions.len()
        );
    }

    let vertices = data
        .positions
        .iter()
        .map(|&position| SceneVertex { position })
        .collect::<Vec<_>>();
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", data.label)),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = (!data.indices.is_empty()).then(|| {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", data.label)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        })
    });

    let (fan_indices, fans) = expand_fans(data)?;
    let fan_buffer = (!fan_indices.is_empty()).then(|| {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Fan Index Buffer", data.label)),
            contents: bytemuck::cast_slice(&fan_indices),
            usage: wgpu::BufferUsages::INDEX,
        })
    });

    Ok(GpuMesh {
        name: data.label.clone(),
        vertex_buffer,
        index_buffer,
        fan_buffer,
        num_vertices: data.positions.len() as u32,
        num_indices: data.indices.len() as u32,
        fans,
    })
}
