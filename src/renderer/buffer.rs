// renderer/buffer.rs
//! Thin wrappers tying a device buffer to what it holds.

use crate::device::{BufferId, BufferUsage, GraphicsDevice};
use crate::error::DeviceError;

#[derive(Debug)]
pub struct UniformBuffer {
    id: BufferId,
    size: usize,
}

impl UniformBuffer {
    pub fn new(device: &mut dyn GraphicsDevice) -> Result<Self, DeviceError> {
        Ok(Self {
            id: device.create_buffer(BufferUsage::Uniform)?,
            size: 0,
        })
    }

    pub fn update(&mut self, device: &mut dyn GraphicsDevice, data: &[u8]) {
        device.write_buffer(self.id, data);
        self.size = data.len();
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Per-vertex attribute stream. The vertex count follows the last upload.
#[derive(Debug)]
pub struct VertexBuffer {
    id: BufferId,
    name: String,
    format: wgpu::VertexFormat,
    vertex_count: u32,
}

impl VertexBuffer {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        name: impl Into<String>,
        format: wgpu::VertexFormat,
    ) -> Result<Self, DeviceError> {
        Ok(Self {
            id: device.create_buffer(BufferUsage::Vertex)?,
            name: name.into(),
            format,
            vertex_count: 0,
        })
    }

    pub fn update(&mut self, device: &mut dyn GraphicsDevice, data: &[u8]) {
        device.write_buffer(self.id, data);
        self.vertex_count = (data.len() as u64 / self.stride()) as u32;
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn format(&self) -> wgpu::VertexFormat {
        self.format
    }

    pub fn stride(&self) -> u64 {
        self.format.size()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

#[derive(Debug)]
pub struct IndexBuffer {
    id: BufferId,
    format: wgpu::IndexFormat,
    index_count: u32,
}

impl IndexBuffer {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        format: wgpu::IndexFormat,
    ) -> Result<Self, DeviceError> {
        Ok(Self {
            id: device.create_buffer(BufferUsage::Index)?,
            format,
            index_count: 0,
        })
    }

    pub fn update(&mut self, device: &mut dyn GraphicsDevice, data: &[u8]) {
        device.write_buffer(self.id, data);
        self.index_count = (data.len() / self.index_size()) as u32;
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn format(&self) -> wgpu::IndexFormat {
        self.format
    }

    pub fn index_size(&self) -> usize {
        match self.format {
            wgpu::IndexFormat::Uint16 => 2,
            wgpu::IndexFormat::Uint32 => 4,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingDevice;

    #[test]
    fn vertex_count_follows_upload_size() {
        let mut device = RecordingDevice::new();
        let mut buffer =
            VertexBuffer::new(&mut device, "position", wgpu::VertexFormat::Float32x3).unwrap();
        assert!(buffer.is_empty());
        buffer.update(&mut device, &[0u8; 12 * 5]);
        assert_eq!(buffer.stride(), 12);
        assert_eq!(buffer.vertex_count(), 5);
    }

    #[test]
    fn index_count_uses_format_width() {
        let mut device = RecordingDevice::new();
        let mut buffer = IndexBuffer::new(&mut device, wgpu::IndexFormat::Uint16).unwrap();
        buffer.update(&mut device, bytemuck::cast_slice(&[0u16, 1, 2, 2, 1, 3]));
        assert_eq!(buffer.index_count(), 6);
    }
}
