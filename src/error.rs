// error.rs
use thiserror::Error;

use crate::asset::Handle;
use crate::renderer::{Material, Mesh};

/// Failure reported by a `GraphicsDevice` backend while creating resources.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to create buffer: {0}")]
    BufferCreation(String),
    #[error("failed to create pipeline: {0}")]
    PipelineCreation(String),
}

/// Material errors are consistency failures between a material's variable
/// store and the reflected layout of its fragment program. They mean the
/// shader and the engine code disagree and are not recoverable.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error(
        "layout mismatch for '{entry}': shader declares {expected} bytes, variable '{variable}' holds {actual}"
    )]
    LayoutMismatch {
        entry: String,
        variable: String,
        expected: usize,
        actual: usize,
    },
    #[error("variable '{0}' does not exist in the destination material")]
    MissingVariable(String),
    #[error(transparent)]
    Device(#[from] DeviceError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Material(#[from] MaterialError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("renderable references unknown mesh {0:?}")]
    MissingMesh(Handle<Mesh>),
    #[error("renderable references unknown material {0:?}")]
    MissingMaterial(Handle<Material>),
}
