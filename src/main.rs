use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};

use component_renderer::device::{DeviceCommand, ProgramId, RenderTarget, RenderTargetId, TextureId};
use component_renderer::renderer::{LightsUniform, PbrProperties, Texture, UnlitProperties};
use component_renderer::scene::{
    CameraComponent, LightComponent, Projection, RenderableComponent, Transform,
};
use component_renderer::shader::{
    attribute_name, uniform_name, ShaderProgram, ShaderValueType, UniformBlockDescription,
    UniformBlockEntry,
};
use component_renderer::{
    Assets, Material, Mesh, RecordingDevice, RenderError, RenderOptions, RenderSettings,
    Renderer, Scene,
};

const TRANSFORMS_BINDING: u32 = 0;
const LIGHT_BINDING: u32 = 1;
const MATERIAL_BINDING: u32 = 2;

fn transforms_block() -> UniformBlockDescription {
    UniformBlockDescription::new(TRANSFORMS_BINDING, 208)
}

fn standard_vertex() -> ShaderProgram {
    ShaderProgram::vertex(ProgramId(1))
        .with_uniform_block(uniform_name::TRANSFORMS, transforms_block())
        .with_attribute(attribute_name::POSITION, 0, wgpu::VertexFormat::Float32x3)
        .with_attribute(attribute_name::NORMAL, 1, wgpu::VertexFormat::Float32x3)
        .with_attribute(
            attribute_name::TEXTURE_COORDINATES,
            2,
            wgpu::VertexFormat::Float32x2,
        )
}

fn pbr_fragment() -> ShaderProgram {
    let material = UniformBlockDescription::new(MATERIAL_BINDING, 32)
        .with_entry(UniformBlockEntry::new("albedo", 0, ShaderValueType::Vec4))
        .with_entry(UniformBlockEntry::new("metallic", 16, ShaderValueType::Float))
        .with_entry(UniformBlockEntry::new("roughness", 20, ShaderValueType::Float))
        .with_entry(UniformBlockEntry::new(
            "ambient_occlusion",
            24,
            ShaderValueType::Float,
        ));
    let light = UniformBlockDescription::new(
        LIGHT_BINDING,
        std::mem::size_of::<LightsUniform>(),
    );

    ShaderProgram::fragment(ProgramId(2))
        .with_uniform_block(uniform_name::TRANSFORMS, transforms_block())
        .with_uniform_block(uniform_name::LIGHT, light)
        .with_uniform_block(uniform_name::MATERIAL, material)
        .with_uniform("albedo_texture", 0, ShaderValueType::Sampler2D)
}

fn unlit_fragment() -> ShaderProgram {
    let material = UniformBlockDescription::new(MATERIAL_BINDING, 16)
        .with_entry(UniformBlockEntry::new("color", 0, ShaderValueType::Vec4));

    ShaderProgram::fragment(ProgramId(3))
        .with_uniform_block(uniform_name::MATERIAL, material)
        .with_uniform("color_texture", 0, ShaderValueType::Sampler2D)
}

fn triangle(device: &mut RecordingDevice) -> Result<Mesh, RenderError> {
    let mut mesh = Mesh::new(device, wgpu::IndexFormat::Uint16)?;
    let indices: [u16; 3] = [0, 1, 2];
    mesh.update_mesh(
        device,
        &[Vec3::ZERO, Vec3::X, Vec3::Y],
        Some(&[Vec3::Z; 3]),
        Some(bytemuck::cast_slice(&indices)),
    );
    mesh.update_tex_coords(device, &[Vec2::ZERO, Vec2::X, Vec2::Y]);
    Ok(mesh)
}

fn point_cloud(device: &mut RecordingDevice) -> Result<Mesh, RenderError> {
    let mut mesh = Mesh::new(device, wgpu::IndexFormat::Uint32)?;
    let positions: Vec<Vec3> = (0..64)
        .map(|i| Vec3::new((i % 8) as f32, (i / 8) as f32, 0.0) * 0.25)
        .collect();
    mesh.update_mesh(device, &positions, None, None);
    Ok(mesh)
}

fn run() -> Result<(), RenderError> {
    let mut device = RecordingDevice::new();
    let settings = RenderSettings::load();
    let mut renderer = Renderer::new(&mut device, settings)?;
    renderer.set_post_camera_hook(|camera| {
        log::debug!("Finished camera rendering into {:?}", camera.render_target);
    });

    let vertex = Arc::new(standard_vertex());
    let pbr = Arc::new(pbr_fragment());
    let unlit = Arc::new(unlit_fragment());

    let mut assets = Assets::new();
    let triangle = assets.meshes.insert(triangle(&mut device)?);
    let cloud = assets.meshes.insert(point_cloud(&mut device)?);

    let mut gold = Material::with_programs(&mut device, Arc::clone(&vertex), Arc::clone(&pbr))?;
    gold.set_albedo(Vec4::new(1.0, 0.77, 0.34, 1.0));
    gold.set_metallic(1.0);
    gold.set_roughness(0.3);
    gold.set_ambient_occlusion(1.0);
    gold.set_albedo_texture(Some(Texture::d2(TextureId(1))));
    let mut glass = gold.try_clone(&mut device)?;
    glass.set_albedo(Vec4::new(0.6, 0.8, 1.0, 0.4));
    glass.set_metallic(0.0);
    let mut marker = Material::with_programs(&mut device, Arc::clone(&vertex), unlit)?;
    marker.set_color(Vec4::new(0.1, 1.0, 0.2, 1.0));

    let gold = assets.materials.insert(gold);
    let glass = assets.materials.insert(glass);
    let marker = assets.materials.insert(marker);

    let mut scene = Scene::new();
    let main_target = RenderTarget::new(RenderTargetId(1), 1280, 720);
    let window = RenderTarget::new(RenderTargetId(0), 1280, 720);
    scene
        .node()
        .with_name("main camera")
        .with_transform(Transform::looking_at(
            Vec3::new(0.0, 2.0, 8.0),
            Vec3::ZERO,
            Vec3::Y,
        ))
        .with_camera(
            CameraComponent::perspective(main_target, Projection::default())
                .with_blit_target(window),
        )
        .spawn();
    scene
        .node()
        .with_name("overview camera")
        .with_transform(Transform::looking_at(
            Vec3::new(0.0, 12.0, 0.1),
            Vec3::ZERO,
            Vec3::Y,
        ))
        .with_camera(CameraComponent::perspective(
            RenderTarget::new(RenderTargetId(2), 256, 256),
            Projection::default(),
        ))
        .spawn();

    for (i, material) in [gold, glass, gold].into_iter().enumerate() {
        scene
            .node()
            .with_name(format!("triangle {i}"))
            .with_transform(Transform::from_translation(Vec3::new(
                i as f32 - 1.0,
                0.0,
                -(i as f32) * 2.0,
            )))
            .with_renderable(RenderableComponent::new(triangle, material))
            .spawn();
    }
    scene
        .node()
        .with_name("points")
        .with_renderable(
            RenderableComponent::new(cloud, marker).with_options(RenderOptions::points(4.0)),
        )
        .spawn();
    scene
        .node()
        .with_name("wireframe")
        .with_transform(Transform::from_translation(Vec3::new(2.0, 1.0, 0.0)))
        .with_renderable(
            RenderableComponent::new(triangle, marker).with_options(RenderOptions::wireframe()),
        )
        .spawn();

    for i in 0..6 {
        let angle = i as f32 / 6.0 * std::f32::consts::TAU;
        scene
            .node()
            .with_name(format!("light {i}"))
            .with_transform(Transform::from_translation(Vec3::new(
                angle.cos() * 5.0,
                3.0,
                angle.sin() * 5.0,
            )))
            .with_light(LightComponent::point(Vec3::ONE, 10.0))
            .spawn();
    }

    for frame in 0..2 {
        if frame == 1 {
            if let Some(material) = assets.materials.get_mut(glass) {
                material.set_roughness(0.05);
            }
        }

        device.clear_commands();
        scene.traverse(&mut renderer);
        renderer.render(&mut device, &mut assets)?;

        let stats = renderer.stats();
        log::info!(
            "Frame {}: {} commands, {} draws ({} indexed), {} uploads, {} new pipelines, {} cameras",
            frame,
            device.commands().len(),
            stats.draw_calls,
            stats.indexed_draw_calls,
            device.count(|c| matches!(c, DeviceCommand::WriteBuffer(..))),
            stats.pipelines_created,
            stats.cameras_rendered,
        );
    }
    log::info!("Pipelines cached: {}", renderer.pipeline_count());
    for (handle, material) in assets.materials.iter() {
        log::debug!(
            "{:?}: {} properties, dirty = {}",
            handle,
            material.variable_names().count(),
            material.is_dirty()
        );
    }
    Ok(())
}

fn main() {
    component_renderer::init_logging();
    if let Err(err) = run() {
        log::error!("Demo failed: {err}");
        std::process::exit(1);
    }
}
