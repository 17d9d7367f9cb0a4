// scene/scene.rs
use hecs::World;

use crate::renderer::Renderer;
use crate::scene::NodeBuilder;

/// A flat collection of nodes. World transforms are stored on the nodes
/// directly; there is no parent/child propagation here.
pub struct Scene {
    pub world: World,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            world: World::new(),
        }
    }

    pub fn node(&mut self) -> NodeBuilder<'_> {
        NodeBuilder::new(&mut self.world)
    }

    /// Queues every node's renderable, camera and light into `renderer`.
    pub fn traverse(&self, renderer: &mut Renderer) {
        for node in self.world.iter() {
            renderer.visit(node);
        }
    }

    pub fn len(&self) -> u32 {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
