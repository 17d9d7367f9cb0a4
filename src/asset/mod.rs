pub mod handle;
pub mod cache;

pub use handle::Handle;
pub use cache::AssetCache;

use crate::renderer::{Material, Mesh};

/// Arena storage for everything a renderable points at. Scene nodes hold
/// handles into it; the renderer resolves them for the duration of a frame.
pub struct Assets {
    pub meshes: AssetCache<Mesh>,
    pub materials: AssetCache<Material>,
}

impl Assets {
    pub fn new() -> Self {
        Self {
            meshes: AssetCache::new(),
            materials: AssetCache::new(),
        }
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new()
    }
}
