pub mod asset;
pub mod device;
pub mod error;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod shader;

pub use asset::{AssetCache, Assets, Handle};
pub use device::{GraphicsDevice, RecordingDevice};
pub use error::{DeviceError, MaterialError, RenderError};
pub use renderer::{Material, Mesh, RenderOptions, Renderer, RendererStats};
pub use scene::Scene;
pub use settings::RenderSettings;

pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
