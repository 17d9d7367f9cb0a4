// shader/mod.rs
//! Compiled shader programs and the reflection data the renderer relies on.
//!
//! Compilation itself happens elsewhere; a `ShaderProgram` is the device
//! handle together with whatever the backend reflected from it.

pub mod value;

pub use value::{ShaderData, ShaderValue, ShaderValueType, Variable};

use std::collections::HashMap;

use crate::device::ProgramId;

/// Uniform-block names shared between the engine and its shaders.
pub mod uniform_name {
    pub const TRANSFORMS: &str = "Transforms";
    pub const LIGHT: &str = "Light";
    pub const MATERIAL: &str = "Material";
}

/// Vertex-attribute names the renderer binds mesh buffers to.
pub mod attribute_name {
    pub const POSITION: &str = "position";
    pub const NORMAL: &str = "normal";
    pub const TEXTURE_COORDINATES: &str = "texture_coordinates";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    /// Geometry stages consume one primitive kind.
    Geometry {
        input: wgpu::PrimitiveTopology,
    },
    Fragment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBlockEntry {
    pub name: String,
    pub offset: usize,
    pub size: usize,
    pub value_type: ShaderValueType,
}

impl UniformBlockEntry {
    /// Entry whose size is the block footprint of `value_type`.
    pub fn new(name: impl Into<String>, offset: usize, value_type: ShaderValueType) -> Self {
        Self {
            name: name.into(),
            offset,
            size: value_type.size(),
            value_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniformBlockDescription {
    pub binding: u32,
    pub size: usize,
    pub entries: Vec<UniformBlockEntry>,
}

impl UniformBlockDescription {
    pub fn new(binding: u32, size: usize) -> Self {
        Self {
            binding,
            size,
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: UniformBlockEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

/// A uniform outside any block; samplers are the ones that matter here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformDescription {
    pub name: String,
    pub location: u32,
    pub value_type: ShaderValueType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttributeDescription {
    pub location: u32,
    pub format: wgpu::VertexFormat,
}

#[derive(Debug, Clone)]
pub struct ShaderProgram {
    id: ProgramId,
    stage: ShaderStage,
    uniform_blocks: HashMap<String, UniformBlockDescription>,
    // Kept in reflection order; sampler units are assigned in this order.
    uniforms: Vec<UniformDescription>,
    attributes: HashMap<String, VertexAttributeDescription>,
}

impl ShaderProgram {
    pub fn new(id: ProgramId, stage: ShaderStage) -> Self {
        Self {
            id,
            stage,
            uniform_blocks: HashMap::new(),
            uniforms: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn vertex(id: ProgramId) -> Self {
        Self::new(id, ShaderStage::Vertex)
    }

    pub fn geometry(id: ProgramId, input: wgpu::PrimitiveTopology) -> Self {
        Self::new(id, ShaderStage::Geometry { input })
    }

    pub fn fragment(id: ProgramId) -> Self {
        Self::new(id, ShaderStage::Fragment)
    }

    pub fn with_uniform_block(
        mut self,
        name: impl Into<String>,
        block: UniformBlockDescription,
    ) -> Self {
        self.uniform_blocks.insert(name.into(), block);
        self
    }

    pub fn with_uniform(
        mut self,
        name: impl Into<String>,
        location: u32,
        value_type: ShaderValueType,
    ) -> Self {
        let name = name.into();
        self.uniforms.retain(|u| u.name != name);
        self.uniforms.push(UniformDescription {
            name,
            location,
            value_type,
        });
        self
    }

    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        location: u32,
        format: wgpu::VertexFormat,
    ) -> Self {
        self.attributes
            .insert(name.into(), VertexAttributeDescription { location, format });
        self
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Primitive kind a geometry program consumes; `None` for other stages.
    pub fn input_topology(&self) -> Option<wgpu::PrimitiveTopology> {
        match self.stage {
            ShaderStage::Geometry { input } => Some(input),
            _ => None,
        }
    }

    pub fn uniform_block(&self, name: &str) -> Option<&UniformBlockDescription> {
        self.uniform_blocks.get(name)
    }

    pub fn uniform_blocks(&self) -> &HashMap<String, UniformBlockDescription> {
        &self.uniform_blocks
    }

    pub fn uniforms(&self) -> &[UniformDescription] {
        &self.uniforms
    }

    pub fn attribute(&self, name: &str) -> Option<&VertexAttributeDescription> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &HashMap<String, VertexAttributeDescription> {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_program_reports_input_topology() {
        let program = ShaderProgram::geometry(ProgramId(4), wgpu::PrimitiveTopology::PointList);
        assert_eq!(
            program.input_topology(),
            Some(wgpu::PrimitiveTopology::PointList)
        );
        assert_eq!(ShaderProgram::vertex(ProgramId(1)).input_topology(), None);
    }

    #[test]
    fn uniforms_keep_reflection_order() {
        let program = ShaderProgram::fragment(ProgramId(2))
            .with_uniform("normal_map", 7, ShaderValueType::Sampler2D)
            .with_uniform("albedo_map", 3, ShaderValueType::Sampler2D)
            .with_uniform("exposure", 1, ShaderValueType::Float);
        let names: Vec<_> = program.uniforms().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["normal_map", "albedo_map", "exposure"]);
    }

    #[test]
    fn block_entries_take_type_footprint() {
        let entry = UniformBlockEntry::new("albedo", 0, ShaderValueType::Vec4);
        assert_eq!(entry.size, 16);
        let block = UniformBlockDescription::new(2, 20)
            .with_entry(entry)
            .with_entry(UniformBlockEntry::new("roughness", 16, ShaderValueType::Float));
        assert_eq!(block.entries.len(), 2);
        assert_eq!(block.entries[1].size, 4);
    }
}
