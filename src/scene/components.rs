// scene/components.rs
// Node components the renderer looks up by type

use glam::{Mat4, Vec3};

use crate::asset::Handle;
use crate::device::{RenderTarget, Viewport};
use crate::renderer::{LightType, Material, Mesh, RenderOptions};
use crate::scene::{Projection, Transform};

// ============================================================================
// Placement
// ============================================================================

/// World-space transform of a node, computed by whoever owns the hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldTransform(pub Transform);

/// Name component for debugging
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct RenderableComponent {
    pub mesh: Handle<Mesh>,
    pub material: Handle<Material>,
    pub options: RenderOptions,
    pub visible: bool,
}

impl RenderableComponent {
    pub fn new(mesh: Handle<Mesh>, material: Handle<Material>) -> Self {
        Self {
            mesh,
            material,
            options: RenderOptions::default(),
            visible: true,
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CameraComponent {
    /// Cameras without a target are skipped.
    pub render_target: Option<RenderTarget>,
    pub blit_target: Option<RenderTarget>,
    pub projection: Mat4,
    pub viewport: Viewport,
}

impl CameraComponent {
    /// Camera covering the whole of `target` with a perspective projection.
    pub fn perspective(target: RenderTarget, projection: Projection) -> Self {
        let aspect = target.width as f32 / target.height.max(1) as f32;
        Self {
            render_target: Some(target),
            blit_target: None,
            projection: projection.matrix(aspect),
            viewport: target.full_viewport(),
        }
    }

    pub fn with_blit_target(mut self, target: RenderTarget) -> Self {
        self.blit_target = Some(target);
        self
    }
}

// ============================================================================
// Lighting
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct LightComponent {
    pub light_type: LightType,
    pub strength: f32,
    pub color: Vec3,
    pub direction: Vec3,
}

impl LightComponent {
    pub fn directional(direction: Vec3, color: Vec3, strength: f32) -> Self {
        Self {
            light_type: LightType::Directional,
            strength,
            color,
            direction,
        }
    }

    pub fn point(color: Vec3, strength: f32) -> Self {
        Self {
            light_type: LightType::Point,
            strength,
            color,
            direction: Vec3::NEG_Y,
        }
    }
}
