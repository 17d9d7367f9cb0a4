// device/mod.rs
//! The narrow GPU interface the renderer and materials issue commands through.
//!
//! Commands are immediate and ordered; a backend executes (or records) them in
//! the order they are called. Only resource creation can fail.

pub mod recording;

pub use recording::{DeviceCommand, RecordingDevice};

use crate::error::DeviceError;
use crate::renderer::Texture;

// ============================================================================
// Opaque handles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderTargetId(pub u32);

// ============================================================================
// Plain data passed to the device
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    Uniform,
    Vertex,
    Index,
}

/// Framebuffer a camera renders into or blits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub id: RenderTargetId,
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    pub fn new(id: RenderTargetId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    pub fn full_viewport(&self) -> Viewport {
        Viewport::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// Raster and blend state applied once at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalState {
    pub depth_test: bool,
    pub alpha_blending: bool,
    pub srgb_framebuffer: bool,
    pub program_point_size: bool,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            depth_test: true,
            alpha_blending: true,
            srgb_framebuffer: true,
            program_point_size: true,
        }
    }
}

/// The shader stages combined into one pipeline object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineStages {
    pub vertex: ProgramId,
    pub geometry: Option<ProgramId>,
    pub fragment: ProgramId,
}

// ============================================================================
// Device trait
// ============================================================================

pub trait GraphicsDevice {
    fn create_buffer(&mut self, usage: BufferUsage) -> Result<BufferId, DeviceError>;

    /// Replaces the whole contents of `buffer` with `data`, resizing as needed.
    fn write_buffer(&mut self, buffer: BufferId, data: &[u8]);

    fn create_pipeline(&mut self, stages: &PipelineStages) -> Result<PipelineId, DeviceError>;

    fn bind_pipeline(&mut self, pipeline: PipelineId);

    fn apply_global_state(&mut self, state: &GlobalState);

    fn bind_render_target(&mut self, target: RenderTargetId);

    fn set_viewport(&mut self, viewport: Viewport);

    /// Clears color and depth of the bound render target.
    fn clear(&mut self, color: wgpu::Color);

    fn bind_uniform_buffer(&mut self, binding: u32, buffer: BufferId);

    fn bind_vertex_attribute(
        &mut self,
        location: u32,
        buffer: BufferId,
        format: wgpu::VertexFormat,
        stride: u64,
    );

    /// Points the sampler uniform at `location` of `program` to texture unit `unit`.
    fn assign_sampler_unit(&mut self, program: ProgramId, location: u32, unit: u32);

    fn bind_texture(&mut self, unit: u32, texture: Texture);

    fn set_fill_mode(&mut self, mode: wgpu::PolygonMode);

    fn set_point_size(&mut self, size: f32);

    fn draw(&mut self, topology: wgpu::PrimitiveTopology, vertex_count: u32);

    fn draw_indexed(
        &mut self,
        topology: wgpu::PrimitiveTopology,
        index_buffer: BufferId,
        format: wgpu::IndexFormat,
        index_count: u32,
    );

    /// Copies the `source_rect` color region of `source` over the whole of `destination`.
    fn blit(&mut self, source: RenderTargetId, source_rect: Viewport, destination: RenderTarget);
}
