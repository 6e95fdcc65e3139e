//! wgpu backend for recorded draw commands.
//!
//! A frame is rendered in two steps, mirroring how the traversal and the GPU
//! are decoupled:
//!
//! 1. run a [`RenderTraversal`](crate::traversal::render::RenderTraversal) into a [`DrawList`]
//! 2. [`GpuRenderer::prepare`] uploads one projection/model-view pair per
//!    command into a dynamic uniform buffer and builds missing pipelines, then
//!    [`GpuRenderer::draw`] replays the list into a render pass
//!
//! [`GpuRenderer::render_to`] does step 2 for an offscreen target in one call.

use std::collections::HashMap;

use crate::{
    context::GpuContext,
    data_structures::node::ResourceHandle,
    pipelines::basic::{mk_render_pipeline, primitive_state},
    render::{DrawCall, DrawCommand, DrawList, PolygonFill, Primitives, Topology},
    resources::{
        MeshRegistry,
        mesh::{GpuMesh, MeshData, SceneVertex, load_mesh},
    },
};

/// Per-draw uniform data, laid out like `Matrices` in the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MatrixUniform {
    projection: [[f32; 4]; 4],
    model_view: [[f32; 4]; 4],
}

impl From<&DrawCommand> for MatrixUniform {
    fn from(command: &DrawCommand) -> Self {
        Self {
            projection: command.projection.into(),
            model_view: command.model_view.into(),
        }
    }
}

const UNIFORM_SIZE: u64 = std::mem::size_of::<MatrixUniform>() as u64;
const INITIAL_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PipelineKey {
    topology: Topology,
    fill: PolygonFill,
    blend: bool,
}

pub struct GpuRenderer {
    meshes: MeshRegistry,
    shader: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    bind_group_layout: wgpu::BindGroupLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    capacity: usize,
    line_mode: bool,
    format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
}

impl GpuRenderer {
    pub fn new(ctx: &GpuContext) -> Self {
        let device = &ctx.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene_shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                },
                count: None,
            }],
            label: Some("matrix_bind_group_layout"),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[Some(&bind_group_layout)],
            immediate_size: 0,
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let uniform_stride = wgpu::util::align_to(UNIFORM_SIZE, alignment);
        let (uniform_buffer, bind_group) =
            mk_uniforms(device, &bind_group_layout, uniform_stride, INITIAL_CAPACITY);

        Self {
            meshes: MeshRegistry::new(),
            shader,
            layout,
            bind_group_layout,
            pipelines: HashMap::new(),
            uniform_buffer,
            bind_group,
            uniform_stride,
            capacity: INITIAL_CAPACITY,
            line_mode: ctx.supports_wireframe(),
            format: ctx.settings.format,
            depth_format: ctx.settings.depth_format,
        }
    }

    /// Uploads `data` and returns the handle leaves use to reference it.
    pub fn upload(&mut self, ctx: &GpuContext, data: &MeshData) -> anyhow::Result<ResourceHandle> {
        let mesh = load_mesh(&ctx.device, data)?;
        Ok(self.meshes.insert(mesh))
    }

    /// Drops the buffers behind `handle`. Leaves still referencing it are skipped on draw.
    pub fn release(&mut self, handle: ResourceHandle) -> bool {
        self.meshes.remove(handle).is_some()
    }

    pub fn meshes(&self) -> &MeshRegistry {
        &self.meshes
    }

    /// Writes the uniforms of every command and builds the pipelines the list needs.
    pub fn prepare(&mut self, ctx: &GpuContext, list: &DrawList) {
        if list.len() > self.capacity {
            self.capacity = list.len().next_power_of_two();
            let (buffer, bind_group) = mk_uniforms(
                &ctx.device,
                &self.bind_group_layout,
                self.uniform_stride,
                self.capacity,
            );
            self.uniform_buffer = buffer;
            self.bind_group = bind_group;
        }

        if list.is_empty() {
            return;
        }
        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; list.len() * stride];
        for (command, chunk) in list.iter().zip(bytes.chunks_exact_mut(stride)) {
            let uniform = MatrixUniform::from(command);
            chunk[..UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        ctx.queue.write_buffer(&self.uniform_buffer, 0, &bytes);

        for command in list.iter() {
            let key = self.key(&command.call);
            if !self.pipelines.contains_key(&key) {
                let pipeline = self.mk_pipeline(&ctx.device, key);
                self.pipelines.insert(key, pipeline);
            }
        }
    }

    /// Replays `list` into `pass`. Commands whose resource or fan expansion is
    /// missing are skipped with a warning. Returns the number of issued draws.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, list: &DrawList) -> usize {
        if list.len() > self.capacity {
            log::warn!(
                "draw list of {} commands was not prepared (capacity {}), skipping frame",
                list.len(),
                self.capacity
            );
            return 0;
        }
        let mut issued = 0;
        for (idx, command) in list.iter().enumerate() {
            let Some(mesh) = self.meshes.get(command.resource) else {
                log::warn!("no mesh uploaded for {:?}, skipping draw", command.resource);
                continue;
            };
            let Some(pipeline) = self.pipelines.get(&self.key(&command.call)) else {
                log::warn!("no pipeline prepared for {:?}, skipping draw", command.call);
                continue;
            };
            let Some(offset) = dynamic_offset(idx, self.uniform_stride) else {
                log::warn!("uniform offset of draw {} does not fit a dynamic offset, skipping draw", idx);
                continue;
            };
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.bind_group, &[offset]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            if draw_mesh(pass, mesh, &command.call) {
                issued += 1;
            }
        }
        issued
    }

    /// Prepares `list`, records it into a fresh render pass on `view` cleared to
    /// the configured colour, and submits the work.
    pub fn render_to(
        &mut self,
        ctx: &GpuContext,
        view: &wgpu::TextureView,
        depth: Option<&wgpu::TextureView>,
        list: &DrawList,
    ) -> usize {
        self.prepare(ctx, list);
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });
        let issued = {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.settings.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: depth.map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            self.draw(&mut render_pass, list)
        };
        ctx.queue.submit(std::iter::once(encoder.finish()));
        issued
    }

    fn key(&self, call: &DrawCall) -> PipelineKey {
        let fill = match call.fill {
            PolygonFill::Line if self.line_mode => PolygonFill::Line,
            _ => PolygonFill::Fill,
        };
        PipelineKey {
            topology: call.topology,
            fill,
            blend: call.blend,
        }
    }

    fn mk_pipeline(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        let blend = if key.blend {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };
        mk_render_pipeline(
            device,
            &self.layout,
            self.format,
            Some(blend),
            self.depth_format,
            &[SceneVertex::desc()],
            &self.shader,
            primitive_state(key.topology, key.fill),
        )
    }
}

/// Byte offset of the uniforms of draw `index`, `None` if it does not fit a
/// dynamic offset.
pub fn dynamic_offset(index: usize, stride: u64) -> Option<wgpu::DynamicOffset> {
    let offset = u64::try_from(index).ok()?.checked_mul(stride)?;
    wgpu::DynamicOffset::try_from(offset).ok()
}

fn draw_mesh(pass: &mut wgpu::RenderPass<'_>, mesh: &GpuMesh, call: &DrawCall) -> bool {
    let instances = call.instances.clone();
    match (call.topology, &call.primitives) {
        (Topology::TriangleFan, fan) => match (mesh.fan_range(fan), &mesh.fan_buffer) {
            (Some(range), Some(buffer)) => {
                pass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(range, 0, instances);
            }
            _ => {
                log::warn!(
                    "fan {:?} was not declared when mesh {} was uploaded, skipping draw",
                    fan,
                    mesh.name
                );
                return false;
            }
        },
        (_, Primitives::Vertices(range)) => pass.draw(range.clone(), instances),
        (_, Primitives::Indices(range)) => match &mesh.index_buffer {
            Some(buffer) => {
                pass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(range.clone(), 0, instances);
            }
            None => {
                log::warn!("mesh {} has no index buffer, skipping draw", mesh.name);
                return false;
            }
        },
    }
    true
}

fn mk_uniforms(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Matrix Uniform Buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(UNIFORM_SIZE),
            }),
        }],
        label: Some("matrix_bind_group"),
    });
    (buffer, bind_group)
}
