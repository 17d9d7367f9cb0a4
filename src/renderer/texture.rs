// renderer/texture.rs

use crate::device::TextureId;

/// A device texture as seen by materials: the handle plus its view kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    id: TextureId,
    kind: wgpu::TextureViewDimension,
}

impl Texture {
    pub fn new(id: TextureId, kind: wgpu::TextureViewDimension) -> Self {
        Self { id, kind }
    }

    pub fn d2(id: TextureId) -> Self {
        Self::new(id, wgpu::TextureViewDimension::D2)
    }

    pub fn d2_array(id: TextureId) -> Self {
        Self::new(id, wgpu::TextureViewDimension::D2Array)
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn kind(&self) -> wgpu::TextureViewDimension {
        self.kind
    }
}
