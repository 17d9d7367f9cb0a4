// shader/value.rs
//! Typed values for reflected shader variables.

use glam::{IVec2, IVec3, IVec4, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::renderer::Texture;

/// Type of a reflected uniform-block member or standalone uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderValueType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    UInt,
    Bool,
    /// Stored as three vec4 columns, as std140 lays it out.
    Mat3,
    Mat4,
    Sampler2D,
    Sampler2DArray,
}

impl ShaderValueType {
    /// Bytes the value occupies inside a uniform block. Samplers live outside
    /// blocks and occupy none.
    pub const fn size(self) -> usize {
        match self {
            Self::Float | Self::Int | Self::UInt | Self::Bool => 4,
            Self::Vec2 | Self::IVec2 => 8,
            Self::Vec3 | Self::IVec3 => 12,
            Self::Vec4 | Self::IVec4 => 16,
            Self::Mat3 => 48,
            Self::Mat4 => 64,
            Self::Sampler2D | Self::Sampler2DArray => 0,
        }
    }

    pub const fn is_sampler(self) -> bool {
        matches!(self, Self::Sampler2D | Self::Sampler2DArray)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShaderValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Int(i32),
    IVec2(IVec2),
    IVec3(IVec3),
    IVec4(IVec4),
    UInt(u32),
    Bool(bool),
    Mat3(Mat3),
    Mat4(Mat4),
    Sampler2D(Option<Texture>),
    Sampler2DArray(Option<Texture>),
}

impl ShaderValue {
    /// Zero value for `ty`; samplers start unbound.
    pub fn default_for(ty: ShaderValueType) -> Self {
        match ty {
            ShaderValueType::Float => Self::Float(0.0),
            ShaderValueType::Vec2 => Self::Vec2(Vec2::ZERO),
            ShaderValueType::Vec3 => Self::Vec3(Vec3::ZERO),
            ShaderValueType::Vec4 => Self::Vec4(Vec4::ZERO),
            ShaderValueType::Int => Self::Int(0),
            ShaderValueType::IVec2 => Self::IVec2(IVec2::ZERO),
            ShaderValueType::IVec3 => Self::IVec3(IVec3::ZERO),
            ShaderValueType::IVec4 => Self::IVec4(IVec4::ZERO),
            ShaderValueType::UInt => Self::UInt(0),
            ShaderValueType::Bool => Self::Bool(false),
            ShaderValueType::Mat3 => Self::Mat3(Mat3::ZERO),
            ShaderValueType::Mat4 => Self::Mat4(Mat4::ZERO),
            ShaderValueType::Sampler2D => Self::Sampler2D(None),
            ShaderValueType::Sampler2DArray => Self::Sampler2DArray(None),
        }
    }

    pub fn value_type(&self) -> ShaderValueType {
        match self {
            Self::Float(_) => ShaderValueType::Float,
            Self::Vec2(_) => ShaderValueType::Vec2,
            Self::Vec3(_) => ShaderValueType::Vec3,
            Self::Vec4(_) => ShaderValueType::Vec4,
            Self::Int(_) => ShaderValueType::Int,
            Self::IVec2(_) => ShaderValueType::IVec2,
            Self::IVec3(_) => ShaderValueType::IVec3,
            Self::IVec4(_) => ShaderValueType::IVec4,
            Self::UInt(_) => ShaderValueType::UInt,
            Self::Bool(_) => ShaderValueType::Bool,
            Self::Mat3(_) => ShaderValueType::Mat3,
            Self::Mat4(_) => ShaderValueType::Mat4,
            Self::Sampler2D(_) => ShaderValueType::Sampler2D,
            Self::Sampler2DArray(_) => ShaderValueType::Sampler2DArray,
        }
    }

    pub fn size(&self) -> usize {
        self.value_type().size()
    }

    /// Writes the little-endian block representation into `dst`, which must be
    /// exactly `self.size()` bytes long.
    pub fn write_bytes(&self, dst: &mut [u8]) {
        match self {
            Self::Float(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::Vec2(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::Vec3(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::Vec4(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::Int(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::IVec2(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::IVec3(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::IVec4(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::UInt(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::Bool(v) => dst.copy_from_slice(bytemuck::bytes_of(&(*v as u32))),
            Self::Mat3(m) => {
                let mut columns = [[0.0f32; 4]; 3];
                for (dst_col, src_col) in columns.iter_mut().zip(m.to_cols_array_2d()) {
                    dst_col[..3].copy_from_slice(&src_col);
                }
                dst.copy_from_slice(bytemuck::cast_slice(&columns));
            }
            Self::Mat4(m) => dst.copy_from_slice(bytemuck::bytes_of(m)),
            Self::Sampler2D(_) | Self::Sampler2DArray(_) => {}
        }
    }
}

/// Rust types that can be stored in a `Variable`.
pub trait ShaderData: Sized {
    fn accepts(ty: ShaderValueType) -> bool;
    fn into_value(self, ty: ShaderValueType) -> ShaderValue;
    fn from_value(value: &ShaderValue) -> Option<Self>;
}

macro_rules! impl_shader_data {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ShaderData for $ty {
                fn accepts(ty: ShaderValueType) -> bool {
                    ty == ShaderValueType::$variant
                }

                fn into_value(self, _ty: ShaderValueType) -> ShaderValue {
                    ShaderValue::$variant(self)
                }

                fn from_value(value: &ShaderValue) -> Option<Self> {
                    match value {
                        ShaderValue::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_shader_data! {
    f32 => Float,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    i32 => Int,
    IVec2 => IVec2,
    IVec3 => IVec3,
    IVec4 => IVec4,
    u32 => UInt,
    bool => Bool,
    Mat3 => Mat3,
    Mat4 => Mat4,
}

// A texture fits either sampler kind; the reflected type picks the variant.
impl ShaderData for Option<Texture> {
    fn accepts(ty: ShaderValueType) -> bool {
        ty.is_sampler()
    }

    fn into_value(self, ty: ShaderValueType) -> ShaderValue {
        match ty {
            ShaderValueType::Sampler2DArray => ShaderValue::Sampler2DArray(self),
            _ => ShaderValue::Sampler2D(self),
        }
    }

    fn from_value(value: &ShaderValue) -> Option<Self> {
        match value {
            ShaderValue::Sampler2D(t) | ShaderValue::Sampler2DArray(t) => Some(*t),
            _ => None,
        }
    }
}

/// A named, typed value cell. The type is fixed at creation from reflection.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    value: ShaderValue,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: ShaderValueType) -> Self {
        Self {
            name: name.into(),
            value: ShaderValue::default_for(ty),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ShaderValueType {
        self.value.value_type()
    }

    pub fn value(&self) -> &ShaderValue {
        &self.value
    }

    pub fn size(&self) -> usize {
        self.value.size()
    }

    pub fn get<T: ShaderData>(&self) -> Option<T> {
        T::from_value(&self.value)
    }

    /// Stores `value` if its type matches the reflected one; returns whether it did.
    pub fn set<T: ShaderData>(&mut self, value: T) -> bool {
        let ty = self.value_type();
        if !T::accepts(ty) {
            log::warn!(
                "Rejected write of {} to '{}' ({:?})",
                std::any::type_name::<T>(),
                self.name,
                ty
            );
            return false;
        }
        self.value = value.into_value(ty);
        true
    }

    /// Copies the value of another variable of the same type.
    pub fn copy_value(&mut self, other: &Variable) -> bool {
        if other.value_type() != self.value_type() {
            return false;
        }
        self.value = other.value;
        true
    }

    pub fn write_bytes(&self, dst: &mut [u8]) {
        self.value.write_bytes(dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::TextureId;

    #[test]
    fn sizes_match_block_footprint() {
        assert_eq!(ShaderValueType::Float.size(), 4);
        assert_eq!(ShaderValueType::Vec3.size(), 12);
        assert_eq!(ShaderValueType::Vec4.size(), 16);
        assert_eq!(ShaderValueType::Mat3.size(), 48);
        assert_eq!(ShaderValueType::Mat4.size(), 64);
        assert_eq!(ShaderValueType::Sampler2D.size(), 0);
    }

    #[test]
    fn vec4_bytes_are_little_endian_floats() {
        let value = ShaderValue::Vec4(Vec4::new(1.0, 0.0, 0.0, 1.0));
        let mut bytes = [0u8; 16];
        value.write_bytes(&mut bytes);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &0.0f32.to_le_bytes());
        assert_eq!(&bytes[12..16], &1.0f32.to_le_bytes());
    }

    #[test]
    fn mat3_columns_are_padded() {
        let value = ShaderValue::Mat3(Mat3::IDENTITY);
        let mut bytes = [0xffu8; 48];
        value.write_bytes(&mut bytes);
        let floats: &[f32] = bytemuck::cast_slice(&bytes);
        assert_eq!(
            floats,
            &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn typed_set_rejects_wrong_type() {
        let mut variable = Variable::new("roughness", ShaderValueType::Float);
        assert!(!variable.set(Vec4::ONE));
        assert_eq!(variable.get::<f32>(), Some(0.0));
        assert!(variable.set(0.5f32));
        assert_eq!(variable.get::<f32>(), Some(0.5));
        assert_eq!(variable.get::<Vec4>(), None);
    }

    #[test]
    fn textures_keep_reflected_sampler_kind() {
        let texture = Texture::new(TextureId(3), wgpu::TextureViewDimension::D2Array);
        let mut variable = Variable::new("layers", ShaderValueType::Sampler2DArray);
        assert!(variable.set(Some(texture)));
        assert_eq!(variable.value_type(), ShaderValueType::Sampler2DArray);
        assert_eq!(variable.get::<Option<Texture>>(), Some(Some(texture)));
    }
}
