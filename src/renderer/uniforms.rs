// renderer/uniforms.rs
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Contents of the shared `Transforms` uniform block.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct TransformsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub _padding: f32,
}

impl TransformsUniform {
    pub fn new() -> Self {
        Self::from_matrices(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO)
    }

    pub fn from_matrices(view_proj: Mat4, model: Mat4, model_view: Mat4, camera_position: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
            camera_position: camera_position.to_array(),
            _padding: 0.0,
        }
    }

    /// Builds the block for an object at `model` seen from a camera whose
    /// node sits at `camera_world`.
    pub fn for_object(projection: Mat4, camera_world: Mat4, model: Mat4) -> Self {
        let view = camera_world.inverse();
        Self::from_matrices(
            projection * view,
            model,
            view * model,
            camera_world.w_axis.truncate(),
        )
    }
}

impl Default for TransformsUniform {
    fn default() -> Self {
        Self::new()
    }
}
