pub mod buffer;
pub mod hooks;
pub mod lights;
pub mod material;
pub mod mesh;
pub mod options;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod uniforms;

pub use buffer::{IndexBuffer, UniformBuffer, VertexBuffer};
pub use hooks::{CameraHook, FrameHook, RenderHooks};
pub use lights::{LightData, LightRaw, LightType, LightsUniform, MAXIMUM_LIGHTS};
pub use material::{Material, PbrProperties, UnlitProperties};
pub use mesh::Mesh;
pub use options::RenderOptions;
pub use pipeline::{PipelineCache, PipelineKey};
pub use renderer::{
    sort_back_to_front, QueuedCamera, QueuedLight, QueuedRenderable, Renderer, RendererStats,
};
pub use texture::Texture;
pub use uniforms::TransformsUniform;
