// device/recording.rs
//! Headless backend that records every command in issue order.

use std::collections::HashMap;

use super::{
    BufferId, BufferUsage, GlobalState, GraphicsDevice, PipelineId, PipelineStages, ProgramId,
    RenderTarget, RenderTargetId, Viewport,
};
use crate::error::DeviceError;
use crate::renderer::Texture;

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    CreateBuffer(BufferId, BufferUsage),
    WriteBuffer(BufferId, usize),
    CreatePipeline(PipelineId, PipelineStages),
    BindPipeline(PipelineId),
    ApplyGlobalState(GlobalState),
    BindRenderTarget(RenderTargetId),
    SetViewport(Viewport),
    Clear(wgpu::Color),
    BindUniformBuffer { binding: u32, buffer: BufferId },
    BindVertexAttribute {
        location: u32,
        buffer: BufferId,
        format: wgpu::VertexFormat,
        stride: u64,
    },
    AssignSamplerUnit {
        program: ProgramId,
        location: u32,
        unit: u32,
    },
    BindTexture { unit: u32, texture: Texture },
    SetFillMode(wgpu::PolygonMode),
    SetPointSize(f32),
    Draw {
        topology: wgpu::PrimitiveTopology,
        vertex_count: u32,
    },
    DrawIndexed {
        topology: wgpu::PrimitiveTopology,
        index_buffer: BufferId,
        format: wgpu::IndexFormat,
        index_count: u32,
    },
    Blit {
        source: RenderTargetId,
        source_rect: Viewport,
        destination: RenderTarget,
    },
}

/// Keeps the latest contents of every buffer so uploads can be inspected.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    commands: Vec<DeviceCommand>,
    buffers: HashMap<BufferId, Vec<u8>>,
    next_buffer: u32,
    next_pipeline: u32,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn buffer_contents(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    /// Number of recorded commands matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DeviceCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    fn record(&mut self, command: DeviceCommand) {
        log::trace!("device: {:?}", command);
        self.commands.push(command);
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_buffer(&mut self, usage: BufferUsage) -> Result<BufferId, DeviceError> {
        self.next_buffer += 1;
        let id = BufferId(self.next_buffer);
        self.buffers.insert(id, Vec::new());
        self.record(DeviceCommand::CreateBuffer(id, usage));
        Ok(id)
    }

    fn write_buffer(&mut self, buffer: BufferId, data: &[u8]) {
        self.buffers.insert(buffer, data.to_vec());
        self.record(DeviceCommand::WriteBuffer(buffer, data.len()));
    }

    fn create_pipeline(&mut self, stages: &PipelineStages) -> Result<PipelineId, DeviceError> {
        self.next_pipeline += 1;
        let id = PipelineId(self.next_pipeline);
        self.record(DeviceCommand::CreatePipeline(id, *stages));
        Ok(id)
    }

    fn bind_pipeline(&mut self, pipeline: PipelineId) {
        self.record(DeviceCommand::BindPipeline(pipeline));
    }

    fn apply_global_state(&mut self, state: &GlobalState) {
        self.record(DeviceCommand::ApplyGlobalState(*state));
    }

    fn bind_render_target(&mut self, target: RenderTargetId) {
        self.record(DeviceCommand::BindRenderTarget(target));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.record(DeviceCommand::SetViewport(viewport));
    }

    fn clear(&mut self, color: wgpu::Color) {
        self.record(DeviceCommand::Clear(color));
    }

    fn bind_uniform_buffer(&mut self, binding: u32, buffer: BufferId) {
        self.record(DeviceCommand::BindUniformBuffer { binding, buffer });
    }

    fn bind_vertex_attribute(
        &mut self,
        location: u32,
        buffer: BufferId,
        format: wgpu::VertexFormat,
        stride: u64,
    ) {
        self.record(DeviceCommand::BindVertexAttribute {
            location,
            buffer,
            format,
            stride,
        });
    }

    fn assign_sampler_unit(&mut self, program: ProgramId, location: u32, unit: u32) {
        self.record(DeviceCommand::AssignSamplerUnit {
            program,
            location,
            unit,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: Texture) {
        self.record(DeviceCommand::BindTexture { unit, texture });
    }

    fn set_fill_mode(&mut self, mode: wgpu::PolygonMode) {
        self.record(DeviceCommand::SetFillMode(mode));
    }

    fn set_point_size(&mut self, size: f32) {
        self.record(DeviceCommand::SetPointSize(size));
    }

    fn draw(&mut self, topology: wgpu::PrimitiveTopology, vertex_count: u32) {
        self.record(DeviceCommand::Draw {
            topology,
            vertex_count,
        });
    }

    fn draw_indexed(
        &mut self,
        topology: wgpu::PrimitiveTopology,
        index_buffer: BufferId,
        format: wgpu::IndexFormat,
        index_count: u32,
    ) {
        self.record(DeviceCommand::DrawIndexed {
            topology,
            index_buffer,
            format,
            index_count,
        });
    }

    fn blit(&mut self, source: RenderTargetId, source_rect: Viewport, destination: RenderTarget) {
        self.record(DeviceCommand::Blit {
            source,
            source_rect,
            destination,
        });
    }
}
