// scene/mod.rs

pub mod camera;
pub mod transform;
pub mod scene;
pub mod components;
pub mod builder;

// Re-export commonly used types
pub use camera::Projection;
pub use transform::Transform;
pub use scene::Scene;
pub use builder::NodeBuilder;

pub use components::{
    CameraComponent,
    LightComponent,
    Name,
    RenderableComponent,
    WorldTransform,
};
