#![allow(dead_code)]

use cgmath::{Matrix4, Vector3};
use scene_ngin::{
    BoundingBox, ResourceHandle, SceneGraph, Traversal,
    data_structures::node::{
        Cone, Cube, GeometricObject, GroundPlane, LineQuad, Sphere, SphereLines, Transform,
    },
};

/// Box used by every test leaf: (-1, -1, 0) -> (1, 1, 1).
pub fn unit_bbox() -> BoundingBox {
    BoundingBox::new([-1.0, -1.0, 0.0], [1.0, 1.0, 1.0])
}

pub fn leaf(resource: u64) -> GeometricObject {
    GeometricObject::new(unit_bbox(), ResourceHandle(resource), 4)
}

pub fn leaf_with_bbox(resource: u64, bbox: BoundingBox) -> GeometricObject {
    GeometricObject::new(bbox, ResourceHandle(resource), 4)
}

pub fn translation(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_matrix(Matrix4::from_translation(Vector3::new(x, y, z)))
}

/// Records which hook saw which node, in visit order.
#[derive(Debug, Default)]
pub struct VisitRecorder {
    pub visits: Vec<&'static str>,
    pub resources: Vec<ResourceHandle>,
    pub begins: u32,
}

impl VisitRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn leaf(&mut self, kind: &'static str, geometry: &GeometricObject) {
        self.visits.push(kind);
        self.resources.push(geometry.resource);
    }
}

impl Traversal for VisitRecorder {
    fn begin(&mut self, _scene: &SceneGraph) {
        self.begins += 1;
    }

    fn visit_geometric_object(&mut self, _scene: &SceneGraph, node: &GeometricObject) {
        self.leaf("geometric_object", node);
    }

    fn visit_cone(&mut self, _scene: &SceneGraph, node: &Cone) {
        self.leaf("cone", &node.geometry);
    }

    fn visit_ground_plane(&mut self, _scene: &SceneGraph, node: &GroundPlane) {
        self.leaf("ground_plane", &node.geometry);
    }

    fn visit_cube(&mut self, _scene: &SceneGraph, node: &Cube) {
        self.leaf("cube", &node.geometry);
    }

    fn visit_sphere(&mut self, _scene: &SceneGraph, node: &Sphere) {
        self.leaf("sphere", &node.geometry);
    }

    fn visit_sphere_lines(&mut self, _scene: &SceneGraph, node: &SphereLines) {
        self.leaf("sphere_lines", &node.geometry);
    }

    fn visit_line_quad(&mut self, _scene: &SceneGraph, node: &LineQuad) {
        self.leaf("line_quad", &node.geometry);
    }

    fn visit_transform(&mut self, scene: &SceneGraph, node: &Transform) {
        self.visits.push("transform");
        self.descend(scene, node);
    }
}

/// Overrides nothing; every variant falls through to the no-op defaults.
pub struct Silent;

impl Traversal for Silent {}

#[cfg(feature = "integration-tests")]
pub const TARGET_SIZE: u32 = 64;

/// Offscreen colour target plus a buffer to read it back into.
#[cfg(feature = "integration-tests")]
pub struct Target {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

#[cfg(feature = "integration-tests")]
impl Target {
    pub fn new(ctx: &scene_ngin::context::GpuContext) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Test Target"),
            size: wgpu::Extent3d {
                width: TARGET_SIZE,
                height: TARGET_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.settings.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Copies the target back to the CPU as tightly packed RGBA8 pixels.
    pub async fn read_pixels(&self, ctx: &scene_ngin::context::GpuContext) -> Vec<[u8; 4]> {
        let u32_size = std::mem::size_of::<u32>() as u32;
        let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            size: (u32_size * TARGET_SIZE * TARGET_SIZE) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: None,
            mapped_at_creation: false,
        });
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(u32_size * TARGET_SIZE),
                    rows_per_image: Some(TARGET_SIZE),
                },
            },
            wgpu::Extent3d {
                width: TARGET_SIZE,
                height: TARGET_SIZE,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        ctx.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(std::time::Duration::from_secs(3)),
            })
            .unwrap();
        rx.receive().await.unwrap().unwrap();
        let data = buffer_slice.get_mapped_range();
        data.chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect()
    }
}
