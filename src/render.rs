//! Draw commands and the render backend seam.
//!
//! The [`RenderTraversal`](crate::traversal::render::RenderTraversal) does not
//! talk to a graphics API. It describes every draw as a [`DrawCommand`] and
//! hands it to a [`RenderBackend`]. The backend decides what drawing means:
//! [`DrawList`] just records the commands, and
//! [`GpuRenderer`](crate::pipelines::scene::GpuRenderer) replays a recorded
//! list into a `wgpu::RenderPass`.
//!
//! # Key types
//!
//! - [`DrawCall`] is the topology, primitive range and fixed-function state of one draw
//! - [`DrawCommand`] is a draw call bound to a resource and the current matrices
//! - [`RenderBackend`] receives draw commands
//! - [`DrawList`] is a backend that records commands in issue order
//!

use std::ops::Range;

use cgmath::Matrix4;

use crate::data_structures::node::ResourceHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    TriangleFan,
    TriangleStrip,
    TriangleList,
}

/// What a draw call walks over: a range of vertices or a range of the index buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitives {
    Vertices(Range<u32>),
    Indices(Range<u32>),
}

impl Primitives {
    pub fn range(&self) -> &Range<u32> {
        match self {
            Primitives::Vertices(range) | Primitives::Indices(range) => range,
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, Primitives::Indices(_))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PolygonFill {
    #[default]
    Fill,
    /// wireframe
    Line,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub topology: Topology,
    pub primitives: Primitives,
    pub instances: Range<u32>,
    pub fill: PolygonFill,
    pub blend: bool,
}

impl DrawCall {
    /// Non-indexed draw over `vertices`.
    pub fn arrays(topology: Topology, vertices: Range<u32>) -> Self {
        Self::new(topology, Primitives::Vertices(vertices))
    }

    /// Indexed draw over `indices` of the resource's index buffer.
    pub fn indexed(topology: Topology, indices: Range<u32>) -> Self {
        Self::new(topology, Primitives::Indices(indices))
    }

    fn new(topology: Topology, primitives: Primitives) -> Self {
        Self {
            topology,
            primitives,
            instances: 0..1,
            fill: PolygonFill::Fill,
            blend: false,
        }
    }

    pub fn instanced(mut self, instances: u32) -> Self {
        self.instances = 0..instances;
        self
    }

    pub fn with_fill(mut self, fill: PolygonFill) -> Self {
        self.fill = fill;
        self
    }

    pub fn blended(mut self) -> Self {
        self.blend = true;
        self
    }
}

/// One draw call together with everything the backend needs to issue it.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub resource: ResourceHandle,
    pub projection: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
    pub call: DrawCall,
}

/// Receiver of the draw commands emitted by a render traversal.
///
/// Failures (e.g. an unknown resource) are the backend's own business; the
/// traversal neither sees nor handles them.
pub trait RenderBackend {
    fn draw(&mut self, command: DrawCommand);
}

/// Records draw commands in the order they were issued.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drops all recorded commands, keeping the allocation for the next frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderBackend for DrawList {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
