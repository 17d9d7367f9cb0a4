// renderer/mesh.rs
use glam::{Vec2, Vec3};

use crate::device::GraphicsDevice;
use crate::error::DeviceError;
use crate::renderer::{IndexBuffer, VertexBuffer};
use crate::shader::attribute_name;

/// Geometry data: the three standard attribute streams, an index buffer, and
/// any number of named custom streams.
#[derive(Debug)]
pub struct Mesh {
    positions: VertexBuffer,
    normals: VertexBuffer,
    tex_coords: VertexBuffer,
    indices: IndexBuffer,
    custom_buffers: Vec<VertexBuffer>,
    vertex_count: usize,
}

impl Mesh {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        index_format: wgpu::IndexFormat,
    ) -> Result<Self, DeviceError> {
        Ok(Self {
            positions: VertexBuffer::new(
                device,
                attribute_name::POSITION,
                wgpu::VertexFormat::Float32x3,
            )?,
            normals: VertexBuffer::new(
                device,
                attribute_name::NORMAL,
                wgpu::VertexFormat::Float32x3,
            )?,
            tex_coords: VertexBuffer::new(
                device,
                attribute_name::TEXTURE_COORDINATES,
                wgpu::VertexFormat::Float32x2,
            )?,
            indices: IndexBuffer::new(device, index_format)?,
            custom_buffers: Vec::new(),
            vertex_count: 0,
        })
    }

    /// Uploads positions and, when given, normals and raw index data
    /// (already encoded in the mesh's index format).
    pub fn update_mesh(
        &mut self,
        device: &mut dyn GraphicsDevice,
        positions: &[Vec3],
        normals: Option<&[Vec3]>,
        indices: Option<&[u8]>,
    ) {
        self.positions
            .update(device, bytemuck::cast_slice(positions));
        if let Some(normals) = normals {
            self.normals.update(device, bytemuck::cast_slice(normals));
        }
        if let Some(indices) = indices {
            self.indices.update(device, indices);
        }
        self.vertex_count = positions.len();
    }

    pub fn update_tex_coords(&mut self, device: &mut dyn GraphicsDevice, tex_coords: &[Vec2]) {
        // Texture coordinates always cover the current vertex count
        let count = tex_coords.len().min(self.vertex_count);
        self.tex_coords
            .update(device, bytemuck::cast_slice(&tex_coords[..count]));
    }

    /// Adds an extra stream bound to the vertex attribute called `name`.
    pub fn set_custom_buffer(&mut self, name: impl Into<String>, mut buffer: VertexBuffer) {
        buffer.set_name(name);
        self.custom_buffers.push(buffer);
    }

    pub fn positions(&self) -> &VertexBuffer {
        &self.positions
    }

    pub fn normals(&self) -> &VertexBuffer {
        &self.normals
    }

    pub fn tex_coords(&self) -> &VertexBuffer {
        &self.tex_coords
    }

    pub fn indices(&self) -> &IndexBuffer {
        &self.indices
    }

    pub fn custom_buffers(&self) -> &[VertexBuffer] {
        &self.custom_buffers
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}
