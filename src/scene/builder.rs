// scene/builder.rs
// Optional helper for building nodes - uses pure hecs

use hecs::World;

use crate::scene::Transform;
use super::components::*;

/// Helper for building scene nodes with a fluent API
pub struct NodeBuilder<'w> {
    world: &'w mut World,
    builder: hecs::EntityBuilder,
}

impl<'w> NodeBuilder<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self {
            world,
            builder: hecs::EntityBuilder::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.builder.add(Name::new(name));
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.builder.add(WorldTransform(transform));
        self
    }

    pub fn with_renderable(mut self, renderable: RenderableComponent) -> Self {
        self.builder.add(renderable);
        self
    }

    pub fn with_camera(mut self, camera: CameraComponent) -> Self {
        self.builder.add(camera);
        self
    }

    pub fn with_light(mut self, light: LightComponent) -> Self {
        self.builder.add(light);
        self
    }

    /// Spawn the node into the world
    pub fn spawn(mut self) -> hecs::Entity {
        self.world.spawn(self.builder.build())
    }
}
