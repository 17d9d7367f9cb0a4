// renderer/renderer.rs
use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::asset::Assets;
use crate::device::{GraphicsDevice, PipelineId};
use crate::error::{DeviceError, RenderError};
use crate::renderer::hooks::RenderHooks;
use crate::renderer::{
    LightData, LightsUniform, PipelineCache, PipelineKey, TransformsUniform, UniformBuffer,
};
use crate::scene::{CameraComponent, LightComponent, RenderableComponent, WorldTransform};
use crate::settings::RenderSettings;
use crate::shader::{uniform_name, ShaderProgram};

/// A renderable together with the world matrix of the node it came from.
#[derive(Debug, Clone, Copy)]
pub struct QueuedRenderable {
    pub renderable: RenderableComponent,
    pub world: Mat4,
}

impl QueuedRenderable {
    pub fn position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueuedCamera {
    pub camera: CameraComponent,
    pub world: Mat4,
}

impl QueuedCamera {
    pub fn position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueuedLight {
    pub light: LightComponent,
    pub world: Mat4,
}

impl QueuedLight {
    /// Position comes from the node; direction is the component's own.
    pub fn to_data(&self) -> LightData {
        LightData {
            position: self.world.w_axis.truncate(),
            direction: self.light.direction,
            color: self.light.color,
            light_type: self.light.light_type,
            strength: self.light.strength,
        }
    }
}

/// Counters for the most recent `render` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    pub cameras_rendered: u32,
    pub cameras_skipped: u32,
    pub draw_calls: u32,
    pub indexed_draw_calls: u32,
    pub pipelines_created: u32,
    pub culled_invisible: u32,
}

pub struct Renderer {
    settings: RenderSettings,
    hooks: RenderHooks,
    renderables: Vec<QueuedRenderable>,
    cameras: Vec<QueuedCamera>,
    lights: Vec<QueuedLight>,
    pipelines: PipelineCache,
    transform_buffer: UniformBuffer,
    light_buffer: UniformBuffer,
    current_camera: Option<CameraComponent>,
    current_pipeline: Option<PipelineId>,
    stats: RendererStats,
}

impl Renderer {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        settings: RenderSettings,
    ) -> Result<Self, DeviceError> {
        let transform_buffer = UniformBuffer::new(device)?;
        let light_buffer = UniformBuffer::new(device)?;

        Ok(Self {
            settings,
            hooks: RenderHooks::default(),
            renderables: Vec::new(),
            cameras: Vec::new(),
            lights: Vec::new(),
            pipelines: PipelineCache::new(),
            transform_buffer,
            light_buffer,
            current_camera: None,
            current_pipeline: None,
            stats: RendererStats::default(),
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn hooks_mut(&mut self) -> &mut RenderHooks {
        &mut self.hooks
    }

    pub fn set_pre_render_hook(&mut self, hook: impl FnMut() + 'static) {
        self.hooks.pre_render = Some(Box::new(hook));
    }

    pub fn set_post_render_hook(&mut self, hook: impl FnMut() + 'static) {
        self.hooks.post_render = Some(Box::new(hook));
    }

    pub fn set_pre_camera_hook(&mut self, hook: impl FnMut(&CameraComponent) + 'static) {
        self.hooks.pre_camera = Some(Box::new(hook));
    }

    pub fn set_post_camera_hook(&mut self, hook: impl FnMut(&CameraComponent) + 'static) {
        self.hooks.post_camera = Some(Box::new(hook));
    }

    // ========================================================================
    // Queuing
    // ========================================================================

    /// Queues whatever renderable, camera and light the node carries.
    pub fn visit(&mut self, node: hecs::EntityRef<'_>) {
        let world = node
            .get::<&WorldTransform>()
            .map_or(Mat4::IDENTITY, |transform| transform.0.matrix());

        if let Some(renderable) = node.get::<&RenderableComponent>() {
            self.queue_renderable(*renderable, world);
        }
        if let Some(camera) = node.get::<&CameraComponent>() {
            self.queue_camera(*camera, world);
        }
        if let Some(light) = node.get::<&LightComponent>() {
            self.queue_light(*light, world);
        }
    }

    pub fn queue_renderable(&mut self, renderable: RenderableComponent, world: Mat4) {
        self.renderables.push(QueuedRenderable { renderable, world });
    }

    pub fn queue_camera(&mut self, camera: CameraComponent, world: Mat4) {
        self.cameras.push(QueuedCamera { camera, world });
    }

    pub fn queue_light(&mut self, light: LightComponent, world: Mat4) {
        self.lights.push(QueuedLight { light, world });
    }

    pub fn queued_renderables(&self) -> &[QueuedRenderable] {
        &self.renderables
    }

    pub fn queued_cameras(&self) -> &[QueuedCamera] {
        &self.cameras
    }

    pub fn queued_lights(&self) -> &[QueuedLight] {
        &self.lights
    }

    pub fn clear_queues(&mut self) {
        self.renderables.clear();
        self.cameras.clear();
        self.lights.clear();
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Camera `render` most recently started on, including one it skipped.
    pub fn current_camera(&self) -> Option<&CameraComponent> {
        self.current_camera.as_ref()
    }

    pub fn current_pipeline(&self) -> Option<PipelineId> {
        self.current_pipeline
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn stats(&self) -> RendererStats {
        self.stats
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Draws every queued renderable once per queued camera. The queues are
    /// empty afterwards whether or not the frame succeeded.
    ///
    /// On error the failing camera's fill mode is still reset to `Fill`, but
    /// its blit, the post-camera and post-render hooks, and any remaining
    /// cameras are skipped.
    pub fn render(
        &mut self,
        device: &mut dyn GraphicsDevice,
        assets: &mut Assets,
    ) -> Result<(), RenderError> {
        self.stats = RendererStats::default();
        self.current_camera = None;
        self.current_pipeline = None;

        let result = self.render_queued(device, assets);
        self.clear_queues();

        log::trace!("Frame finished: {:?}", self.stats);
        result
    }

    fn render_queued(
        &mut self,
        device: &mut dyn GraphicsDevice,
        assets: &mut Assets,
    ) -> Result<(), RenderError> {
        self.hooks.run_pre_render();
        device.apply_global_state(&self.settings.global_state());

        let lights: Vec<LightData> = self.lights.iter().map(QueuedLight::to_data).collect();
        let lights = LightsUniform::from_data(&lights);

        let cameras = std::mem::take(&mut self.cameras);
        let mut renderables = std::mem::take(&mut self.renderables);

        for queued in &cameras {
            self.current_camera = Some(queued.camera);
            self.hooks.run_pre_camera(&queued.camera);

            let Some(target) = queued.camera.render_target else {
                log::trace!("Skipping camera without a render target");
                self.stats.cameras_skipped += 1;
                continue;
            };

            device.bind_render_target(target.id);
            device.set_viewport(queued.camera.viewport);
            device.clear(self.settings.clear_color());

            sort_back_to_front(&mut renderables, queued.position());
            let drawn = self.draw_queue(device, assets, queued, &renderables, &lights);

            // Leave the fill state as later passes expect it, failed or not
            device.set_fill_mode(wgpu::PolygonMode::Fill);
            drawn?;

            if let Some(blit_target) = queued.camera.blit_target {
                device.blit(target.id, queued.camera.viewport, blit_target);
            }

            self.hooks.run_post_camera(&queued.camera);
            self.stats.cameras_rendered += 1;
        }

        self.hooks.run_post_render();
        Ok(())
    }

    fn draw_queue(
        &mut self,
        device: &mut dyn GraphicsDevice,
        assets: &mut Assets,
        camera: &QueuedCamera,
        renderables: &[QueuedRenderable],
        lights: &LightsUniform,
    ) -> Result<(), RenderError> {
        for item in renderables {
            self.draw_renderable(device, assets, camera, item, lights)?;
        }
        Ok(())
    }

    fn draw_renderable(
        &mut self,
        device: &mut dyn GraphicsDevice,
        assets: &mut Assets,
        camera: &QueuedCamera,
        item: &QueuedRenderable,
        lights: &LightsUniform,
    ) -> Result<(), RenderError> {
        let renderable = &item.renderable;
        if !renderable.visible {
            self.stats.culled_invisible += 1;
            return Ok(());
        }

        let mesh = assets
            .meshes
            .get(renderable.mesh)
            .ok_or(RenderError::MissingMesh(renderable.mesh))?;
        let material = assets
            .materials
            .get_mut(renderable.material)
            .ok_or(RenderError::MissingMaterial(renderable.material))?;

        let (Some(vertex), Some(fragment)) = (
            material.vertex_program().cloned(),
            material.fragment_program().cloned(),
        ) else {
            log::warn!(
                "Material {:?} lacks a vertex or fragment program; skipping draw",
                renderable.material
            );
            return Ok(());
        };

        let options = renderable.options;
        let geometry = material
            .geometry_program()
            .filter(|program| program.input_topology() == Some(options.topology))
            .cloned();

        let key = PipelineKey::new(
            vertex.id(),
            geometry.as_ref().map(|program| program.id()),
            fragment.id(),
        );
        let (pipeline, created) = self.pipelines.get_or_create(device, key)?;
        if created {
            self.stats.pipelines_created += 1;
        }
        device.bind_pipeline(pipeline);
        self.current_pipeline = Some(pipeline);

        // Vertex streams
        let streams = [mesh.positions(), mesh.normals(), mesh.tex_coords()]
            .into_iter()
            .chain(mesh.custom_buffers());
        for buffer in streams {
            if buffer.is_empty() {
                continue;
            }
            if let Some(attribute) = vertex.attribute(buffer.name()) {
                device.bind_vertex_attribute(
                    attribute.location,
                    buffer.id(),
                    buffer.format(),
                    buffer.stride(),
                );
            }
        }

        // Transforms, uploaded at most once and shared by every stage
        let transforms =
            TransformsUniform::for_object(camera.camera.projection, camera.world, item.world);
        let stages: [Option<&Arc<ShaderProgram>>; 3] =
            [Some(&vertex), geometry.as_ref(), Some(&fragment)];
        let mut transforms_uploaded = false;
        for program in stages.into_iter().flatten() {
            let Some(block) = program.uniform_block(uniform_name::TRANSFORMS) else {
                continue;
            };
            if !transforms_uploaded {
                self.transform_buffer
                    .update(device, bytemuck::bytes_of(&transforms));
                transforms_uploaded = true;
            }
            device.bind_uniform_buffer(block.binding, self.transform_buffer.id());
        }

        if let Some(block) = fragment.uniform_block(uniform_name::LIGHT) {
            self.light_buffer.update(device, bytemuck::bytes_of(lights));
            device.bind_uniform_buffer(block.binding, self.light_buffer.id());
        }

        material.update_material_uniforms(device);
        let material_buffer = material.update_material_uniform_buffer(device)?;
        if let (Some(buffer), Some(block)) =
            (material_buffer, fragment.uniform_block(uniform_name::MATERIAL))
        {
            device.bind_uniform_buffer(block.binding, buffer);
        }

        device.set_fill_mode(options.fill_mode);
        if options.is_points() {
            device.set_point_size(options.point_size);
        }

        let indices = mesh.indices();
        if indices.index_count() > 0 && !options.is_points() {
            device.draw_indexed(
                options.topology,
                indices.id(),
                indices.format(),
                indices.index_count(),
            );
            self.stats.indexed_draw_calls += 1;
        } else {
            device.draw(options.topology, mesh.positions().vertex_count());
        }
        self.stats.draw_calls += 1;

        log::trace!(
            "Drew {:?} with pipeline {:?} ({:?})",
            renderable.mesh,
            pipeline,
            options.topology
        );
        Ok(())
    }
}

/// Farthest from `eye` first. Equal distances keep no particular order.
pub fn sort_back_to_front(renderables: &mut [QueuedRenderable], eye: Vec3) {
    renderables.sort_unstable_by(|a, b| {
        let da = a.position().distance_squared(eye);
        let db = b.position().distance_squared(eye);
        db.total_cmp(&da)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Handle;
    use crate::device::RecordingDevice;

    fn queued_at(z: f32) -> QueuedRenderable {
        QueuedRenderable {
            renderable: RenderableComponent::new(Handle::new(0), Handle::new(0)),
            world: Mat4::from_translation(Vec3::new(0.0, 0.0, z)),
        }
    }

    #[test]
    fn sort_puts_farthest_first() {
        let mut items = vec![queued_at(1.0), queued_at(5.0), queued_at(3.0)];
        sort_back_to_front(&mut items, Vec3::ZERO);
        let order: Vec<f32> = items.iter().map(|i| i.position().z).collect();
        assert_eq!(order, [5.0, 3.0, 1.0]);
    }

    #[test]
    fn sort_measures_from_the_camera() {
        let mut items = vec![queued_at(1.0), queued_at(5.0), queued_at(3.0)];
        sort_back_to_front(&mut items, Vec3::new(0.0, 0.0, 6.0));
        let order: Vec<f32> = items.iter().map(|i| i.position().z).collect();
        assert_eq!(order, [1.0, 3.0, 5.0]);
    }

    #[test]
    fn light_position_follows_node_direction_does_not() {
        let light = QueuedLight {
            light: LightComponent::directional(Vec3::X, Vec3::ONE, 2.0),
            world: Mat4::from_rotation_translation(
                glam::Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                Vec3::new(1.0, 2.0, 3.0),
            ),
        };
        let data = light.to_data();
        assert!(data.position.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
        assert_eq!(data.strength, 2.0);
        assert_eq!(data.direction, Vec3::X);
    }

    #[test]
    fn render_with_nothing_queued_only_sets_state() {
        let mut device = RecordingDevice::new();
        let mut renderer = Renderer::new(&mut device, RenderSettings::default()).unwrap();
        let mut assets = Assets::new();
        device.clear_commands();

        renderer.render(&mut device, &mut assets).unwrap();
        assert_eq!(device.commands().len(), 1);
        assert_eq!(renderer.stats(), RendererStats::default());
    }
}
