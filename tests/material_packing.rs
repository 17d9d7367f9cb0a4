use std::sync::Arc;

use glam::{Mat3, Vec4};

use component_renderer::device::{DeviceCommand, ProgramId, TextureId};
use component_renderer::renderer::{PbrProperties, Texture};
use component_renderer::shader::{
    uniform_name, ShaderProgram, ShaderValueType, UniformBlockDescription, UniformBlockEntry,
};
use component_renderer::{Material, MaterialError, RecordingDevice};

fn albedo_roughness_program() -> Arc<ShaderProgram> {
    let block = UniformBlockDescription::new(2, 20)
        .with_entry(UniformBlockEntry::new("albedo", 0, ShaderValueType::Vec4))
        .with_entry(UniformBlockEntry::new("roughness", 16, ShaderValueType::Float));
    Arc::new(ShaderProgram::fragment(ProgramId(10)).with_uniform_block(uniform_name::MATERIAL, block))
}

fn textured_program() -> Arc<ShaderProgram> {
    let block = UniformBlockDescription::new(2, 16)
        .with_entry(UniformBlockEntry::new("albedo", 0, ShaderValueType::Vec4));
    Arc::new(
        ShaderProgram::fragment(ProgramId(11))
            .with_uniform_block(uniform_name::MATERIAL, block)
            .with_uniform("albedo_texture", 4, ShaderValueType::Sampler2D)
            .with_uniform("exposure", 5, ShaderValueType::Float)
            .with_uniform("shadow_layers", 9, ShaderValueType::Sampler2DArray),
    )
}

fn material_with(device: &mut RecordingDevice, program: Arc<ShaderProgram>) -> Material {
    let mut material = Material::new();
    material.set_fragment_program(device, program).unwrap();
    material
}

fn floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[test]
fn packed_bytes_follow_reflected_offsets() {
    let mut device = RecordingDevice::new();
    let mut material = material_with(&mut device, albedo_roughness_program());
    assert!(material.set("albedo", Vec4::new(1.0, 0.0, 0.0, 1.0)));
    assert!(material.set("roughness", 0.5f32));

    let buffer = material
        .update_material_uniform_buffer(&mut device)
        .unwrap()
        .expect("program declares a Material block");
    let bytes = device.buffer_contents(buffer).unwrap();

    assert_eq!(bytes.len(), 20);
    let mut expected = Vec::new();
    for v in [1.0f32, 0.0, 0.0, 1.0] {
        expected.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(&bytes[0..16], expected.as_slice());
    assert_eq!(&bytes[16..20], &0.5f32.to_le_bytes());
}

fn assert_rejected_without_upload(program: Arc<ShaderProgram>, expected_size: usize) {
    let mut device = RecordingDevice::new();
    let mut material = material_with(&mut device, program);
    device.clear_commands();

    let err = material.update_material_uniform_buffer(&mut device).unwrap_err();
    assert!(matches!(
        err,
        MaterialError::LayoutMismatch { ref entry, expected, .. }
            if entry == "albedo" && expected == expected_size
    ));
    assert_eq!(
        device.count(|c| matches!(c, DeviceCommand::WriteBuffer(..))),
        0
    );
    assert!(material.is_dirty());
}

#[test]
fn entry_size_disagreeing_with_variable_is_fatal() {
    let mut entry = UniformBlockEntry::new("albedo", 0, ShaderValueType::Vec4);
    entry.size = 32;
    let block = UniformBlockDescription::new(2, 32).with_entry(entry);
    let program =
        Arc::new(ShaderProgram::fragment(ProgramId(13)).with_uniform_block(uniform_name::MATERIAL, block));
    assert_rejected_without_upload(program, 32);
}

#[test]
fn entry_past_end_of_block_is_fatal() {
    let block = UniformBlockDescription::new(2, 16)
        .with_entry(UniformBlockEntry::new("albedo", 8, ShaderValueType::Vec4));
    let program =
        Arc::new(ShaderProgram::fragment(ProgramId(14)).with_uniform_block(uniform_name::MATERIAL, block));
    assert_rejected_without_upload(program, 16);
}

#[test]
fn clean_material_is_not_repacked() {
    let mut device = RecordingDevice::new();
    let mut material = material_with(&mut device, albedo_roughness_program());
    material.set("roughness", 0.75f32);

    let first = material.update_material_uniform_buffer(&mut device).unwrap();
    let first_bytes = device.buffer_contents(first.unwrap()).unwrap().to_vec();
    device.clear_commands();

    let second = material.update_material_uniform_buffer(&mut device).unwrap();
    assert_eq!(first, second);
    assert_eq!(device.buffer_contents(second.unwrap()).unwrap(), first_bytes.as_slice());
    assert_eq!(
        device.count(|c| matches!(c, DeviceCommand::WriteBuffer(..))),
        0
    );
}

#[test]
fn property_change_triggers_one_upload() {
    let mut device = RecordingDevice::new();
    let mut material = material_with(&mut device, albedo_roughness_program());
    material.update_material_uniform_buffer(&mut device).unwrap();
    device.clear_commands();

    material.set("roughness", 0.1f32);
    let buffer = material
        .update_material_uniform_buffer(&mut device)
        .unwrap()
        .unwrap();
    material.update_material_uniform_buffer(&mut device).unwrap();

    assert_eq!(
        device.count(|c| matches!(c, DeviceCommand::WriteBuffer(..))),
        1
    );
    let packed = floats(device.buffer_contents(buffer).unwrap());
    assert!((packed[4] - 0.1).abs() < f32::EPSILON);
}

#[test]
fn material_without_fragment_program_has_no_buffer() {
    let mut device = RecordingDevice::new();
    let mut material = Material::new();
    assert!(material.variable("albedo").is_none());
    assert_eq!(material.update_material_uniform_buffer(&mut device).unwrap(), None);

    let blockless = Arc::new(ShaderProgram::fragment(ProgramId(12)));
    material.set_fragment_program(&mut device, blockless).unwrap();
    assert_eq!(material.update_material_uniform_buffer(&mut device).unwrap(), None);
}

#[test]
fn program_without_samplers_never_binds_textures() {
    let mut device = RecordingDevice::new();
    let material = material_with(&mut device, albedo_roughness_program());
    assert!(material.sampler_bindings().is_empty());

    device.clear_commands();
    material.update_material_uniforms(&mut device);
    assert!(device.commands().is_empty());
}

#[test]
fn samplers_bind_to_their_table_position() {
    let mut device = RecordingDevice::new();
    let mut material = material_with(&mut device, textured_program());

    // Only sampler uniforms enter the table, in reflection order
    let names: Vec<_> = material
        .sampler_bindings()
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, ["albedo_texture", "shadow_layers"]);
    assert!(material.variable("exposure").is_none());
    assert_eq!(
        device.count(|c| matches!(c, DeviceCommand::AssignSamplerUnit { .. })),
        2
    );
    assert!(device.commands().contains(&DeviceCommand::AssignSamplerUnit {
        program: ProgramId(11),
        location: 9,
        unit: 1,
    }));

    let layers = Texture::d2_array(TextureId(7));
    assert!(material.set("shadow_layers", Some(layers)));
    device.clear_commands();
    material.update_material_uniforms(&mut device);

    // Unit 0 has no texture and is left alone
    assert_eq!(
        device.commands(),
        &[DeviceCommand::BindTexture {
            unit: 1,
            texture: layers,
        }]
    );
}

#[test]
fn missing_property_reads_default() {
    let mut device = RecordingDevice::new();
    let mut material = material_with(&mut device, albedo_roughness_program());

    assert!(material.variable("nonexistent").is_none());
    assert!(material.variable_mut("nonexistent").is_none());
    assert_eq!(material.get::<f32>("nonexistent"), 0.0);
    assert_eq!(material.get::<Vec4>("nonexistent"), Vec4::ZERO);
    assert!(!material.set("nonexistent", 1.0f32));
    assert_eq!(material.metallic(), 0.0);
}

#[test]
fn mismatched_type_is_rejected() {
    let mut device = RecordingDevice::new();
    let mut material = material_with(&mut device, albedo_roughness_program());
    material.update_material_uniform_buffer(&mut device).unwrap();

    assert!(!material.set("roughness", Mat3::IDENTITY));
    assert!(!material.is_dirty());
    assert_eq!(material.get::<f32>("roughness"), 0.0);
}

#[test]
fn clone_copies_values_and_layout() {
    let mut device = RecordingDevice::new();
    let mut original = material_with(&mut device, textured_program());
    let texture = Texture::d2(TextureId(3));
    original.set("albedo", Vec4::splat(0.5));
    original.set("albedo_texture", Some(texture));

    let copy = original.try_clone(&mut device).unwrap();
    assert_eq!(copy.get::<Vec4>("albedo"), Vec4::splat(0.5));
    assert_eq!(copy.albedo_texture(), Some(texture));
    assert_eq!(copy.uniform_layout(), original.uniform_layout());
    assert!(copy.is_dirty());
}

#[test]
fn copying_into_a_smaller_layout_fails() {
    let mut device = RecordingDevice::new();
    let source = material_with(&mut device, albedo_roughness_program());
    let mut destination = material_with(&mut device, textured_program());

    let err = destination.copy_values_from(&source).unwrap_err();
    assert!(matches!(err, MaterialError::MissingVariable(ref name) if name == "roughness"));
}
