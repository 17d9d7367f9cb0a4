// renderer/material.rs
//! Shading programs plus the named properties that feed them.
//!
//! The fragment program's reflected `Material` uniform block decides which
//! properties exist, their types and where each lands in the packed buffer.
//! Sampler uniforms become texture properties bound to consecutive units.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec4;

use crate::device::{BufferId, GraphicsDevice};
use crate::error::MaterialError;
use crate::renderer::{Texture, UniformBuffer};
use crate::shader::{
    uniform_name, ShaderData, ShaderProgram, UniformBlockDescription, UniformBlockEntry,
    UniformDescription, Variable,
};

/// Reflected block layout together with the bytes packed for it.
#[derive(Debug)]
struct PackedBlock {
    description: UniformBlockDescription,
    staging: Vec<u8>,
    buffer: UniformBuffer,
}

#[derive(Debug)]
pub struct Material {
    vertex: Option<Arc<ShaderProgram>>,
    geometry: Option<Arc<ShaderProgram>>,
    fragment: Option<Arc<ShaderProgram>>,
    variables: HashMap<String, Variable>,
    block: Option<PackedBlock>,
    sampler_bindings: Vec<UniformDescription>,
    // Kept across rebuilds that leave the material without a block
    spare_buffer: Option<UniformBuffer>,
    dirty: bool,
}

impl Material {
    pub fn new() -> Self {
        Self {
            vertex: None,
            geometry: None,
            fragment: None,
            variables: HashMap::new(),
            block: None,
            sampler_bindings: Vec::new(),
            spare_buffer: None,
            dirty: true,
        }
    }

    pub fn with_programs(
        device: &mut dyn GraphicsDevice,
        vertex: Arc<ShaderProgram>,
        fragment: Arc<ShaderProgram>,
    ) -> Result<Self, MaterialError> {
        let mut material = Self::new();
        material.set_vertex_program(vertex);
        material.set_fragment_program(device, fragment)?;
        Ok(material)
    }

    /// Copies the program triple and every property value into a new material.
    pub fn try_clone(&self, device: &mut dyn GraphicsDevice) -> Result<Self, MaterialError> {
        let mut material = Self::new();
        material.vertex = self.vertex.clone();
        material.geometry = self.geometry.clone();
        if let Some(fragment) = &self.fragment {
            material.set_fragment_program(device, Arc::clone(fragment))?;
        }
        material.copy_values_from(self)?;
        Ok(material)
    }

    /// Copies values by name. Every property of `other` must exist here with
    /// the same type; anything else means the two layouts diverged.
    pub fn copy_values_from(&mut self, other: &Material) -> Result<(), MaterialError> {
        for (name, source) in &other.variables {
            let Some(target) = self.variables.get_mut(name) else {
                log::error!("Material copy: '{}' missing from destination", name);
                return Err(MaterialError::MissingVariable(name.clone()));
            };
            if !target.copy_value(source) {
                log::error!("Material copy: '{}' has a different type", name);
                return Err(MaterialError::LayoutMismatch {
                    entry: target.name().to_string(),
                    variable: source.name().to_string(),
                    expected: target.size(),
                    actual: source.size(),
                });
            }
        }
        self.dirty = true;
        Ok(())
    }

    pub fn vertex_program(&self) -> Option<&Arc<ShaderProgram>> {
        self.vertex.as_ref()
    }

    pub fn geometry_program(&self) -> Option<&Arc<ShaderProgram>> {
        self.geometry.as_ref()
    }

    pub fn fragment_program(&self) -> Option<&Arc<ShaderProgram>> {
        self.fragment.as_ref()
    }

    pub fn set_vertex_program(&mut self, program: Arc<ShaderProgram>) {
        self.vertex = Some(program);
    }

    pub fn set_geometry_program(&mut self, program: Option<Arc<ShaderProgram>>) {
        self.geometry = program;
    }

    /// Replaces the fragment stage and rebuilds the property store from its
    /// reflection. Previous values and layout are discarded; the device
    /// buffer is kept and repacked on the next update.
    pub fn set_fragment_program(
        &mut self,
        device: &mut dyn GraphicsDevice,
        program: Arc<ShaderProgram>,
    ) -> Result<(), MaterialError> {
        self.fragment = Some(program);
        self.build_variables(device)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Mutable access to a property cell. Marks the material dirty when found.
    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        let variable = self.variables.get_mut(name)?;
        self.dirty = true;
        Some(variable)
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Sets a property. Unknown names and mismatched types leave the material
    /// untouched and return `false`.
    pub fn set<T: ShaderData>(&mut self, name: &str, value: T) -> bool {
        let stored = self
            .variables
            .get_mut(name)
            .is_some_and(|variable| variable.set(value));
        if stored {
            self.dirty = true;
        }
        stored
    }

    /// Reads a property, falling back to `T::default()` when it is missing.
    pub fn get<T: ShaderData + Default>(&self, name: &str) -> T {
        self.variables
            .get(name)
            .and_then(Variable::get)
            .unwrap_or_default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn uniform_layout(&self) -> Option<&UniformBlockDescription> {
        self.block.as_ref().map(|block| &block.description)
    }

    pub fn sampler_bindings(&self) -> &[UniformDescription] {
        &self.sampler_bindings
    }

    /// Packs every reflected entry into the uniform buffer if anything changed
    /// since the last call. Returns the buffer, or `None` when the fragment
    /// program has no `Material` block.
    pub fn update_material_uniform_buffer(
        &mut self,
        device: &mut dyn GraphicsDevice,
    ) -> Result<Option<BufferId>, MaterialError> {
        let Some(block) = self.block.as_mut() else {
            return Ok(None);
        };
        if !self.dirty {
            return Ok(Some(block.buffer.id()));
        }

        for entry in &block.description.entries {
            let variable = self.variables.get(&entry.name);
            let range = entry.offset..entry.offset + entry.size;
            match variable {
                Some(v)
                    if v.name() == entry.name
                        && v.size() == entry.size
                        && range.end <= block.staging.len() =>
                {
                    v.write_bytes(&mut block.staging[range]);
                }
                _ => return Err(layout_mismatch(entry, variable)),
            }
        }

        block.buffer.update(device, &block.staging);
        self.dirty = false;
        Ok(Some(block.buffer.id()))
    }

    /// Binds every set texture property to the unit matching its position in
    /// the sampler table. Unset textures leave their unit alone.
    pub fn update_material_uniforms(&self, device: &mut dyn GraphicsDevice) {
        for (unit, sampler) in self.sampler_bindings.iter().enumerate() {
            let texture = self
                .variables
                .get(&sampler.name)
                .and_then(Variable::get::<Option<Texture>>)
                .flatten();
            if let Some(texture) = texture {
                device.bind_texture(unit as u32, texture);
            }
        }
    }

    fn build_variables(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), MaterialError> {
        // The device buffer outlives rebuilds; only its contents change
        let previous_buffer = self
            .block
            .take()
            .map(|block| block.buffer)
            .or_else(|| self.spare_buffer.take());
        self.variables.clear();
        self.sampler_bindings.clear();
        self.dirty = true;

        let Some(fragment) = self.fragment.clone() else {
            self.spare_buffer = previous_buffer;
            return Ok(());
        };

        match fragment.uniform_block(uniform_name::MATERIAL) {
            None => self.spare_buffer = previous_buffer,
            Some(description) => {
                for entry in &description.entries {
                    self.variables.insert(
                        entry.name.clone(),
                        Variable::new(entry.name.as_str(), entry.value_type),
                    );
                }
                let buffer = match previous_buffer {
                    Some(buffer) => buffer,
                    None => UniformBuffer::new(device)?,
                };
                self.block = Some(PackedBlock {
                    description: description.clone(),
                    staging: vec![0; description.size],
                    buffer,
                });
            }
        }

        for uniform in fragment.uniforms().iter().filter(|u| u.value_type.is_sampler()) {
            let unit = self.sampler_bindings.len() as u32;
            device.assign_sampler_unit(fragment.id(), uniform.location, unit);
            self.variables.insert(
                uniform.name.clone(),
                Variable::new(uniform.name.as_str(), uniform.value_type),
            );
            self.sampler_bindings.push(uniform.clone());
        }

        log::debug!(
            "Material rebuilt for program {:?}: {} properties, {} samplers, block {} bytes",
            fragment.id(),
            self.variables.len(),
            self.sampler_bindings.len(),
            self.block.as_ref().map_or(0, |b| b.staging.len())
        );
        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

fn layout_mismatch(entry: &UniformBlockEntry, variable: Option<&Variable>) -> MaterialError {
    let error = MaterialError::LayoutMismatch {
        entry: entry.name.clone(),
        variable: variable.map_or_else(String::new, |v| v.name().to_string()),
        expected: entry.size,
        actual: variable.map_or(0, Variable::size),
    };
    log::error!("{}", error);
    error
}

/// Declares a trait of named, typed property accessors and implements it for
/// `Material`. Each getter reads the property of the same name.
#[macro_export]
macro_rules! material_properties {
    (
        $(#[$meta:meta])*
        $vis:vis trait $trait_name:ident {
            $($getter:ident, $setter:ident: $value:ty;)*
        }
    ) => {
        $(#[$meta])*
        $vis trait $trait_name {
            $(
                fn $getter(&self) -> $value;
                fn $setter(&mut self, value: $value) -> bool;
            )*
        }

        impl $trait_name for $crate::renderer::Material {
            $(
                fn $getter(&self) -> $value {
                    self.get(stringify!($getter))
                }

                fn $setter(&mut self, value: $value) -> bool {
                    self.set(stringify!($getter), value)
                }
            )*
        }
    };
}

material_properties! {
    /// Properties of the metallic/roughness fragment program.
    pub trait PbrProperties {
        albedo, set_albedo: Vec4;
        metallic, set_metallic: f32;
        roughness, set_roughness: f32;
        ambient_occlusion, set_ambient_occlusion: f32;
        albedo_texture, set_albedo_texture: Option<Texture>;
    }
}

material_properties! {
    pub trait UnlitProperties {
        color, set_color: Vec4;
        color_texture, set_color_texture: Option<Texture>;
    }
}
