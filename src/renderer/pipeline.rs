// renderer/pipeline.rs
use std::collections::HashMap;

use crate::device::{GraphicsDevice, PipelineId, PipelineStages, ProgramId};
use crate::error::DeviceError;

/// Identity of a stage combination. A missing geometry stage is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    vertex: ProgramId,
    geometry: Option<ProgramId>,
    fragment: ProgramId,
}

impl PipelineKey {
    pub fn new(vertex: ProgramId, geometry: Option<ProgramId>, fragment: ProgramId) -> Self {
        Self {
            vertex,
            geometry,
            fragment,
        }
    }

    pub fn stages(&self) -> PipelineStages {
        PipelineStages {
            vertex: self.vertex,
            geometry: self.geometry,
            fragment: self.fragment,
        }
    }
}

/// Pipelines built so far, one per stage combination. Entries live as long
/// as the cache; nothing is evicted.
#[derive(Debug, Default)]
pub struct PipelineCache {
    pipelines: HashMap<PipelineKey, PipelineId>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached pipeline for `key` and whether it had to be created.
    pub fn get_or_create(
        &mut self,
        device: &mut dyn GraphicsDevice,
        key: PipelineKey,
    ) -> Result<(PipelineId, bool), DeviceError> {
        if let Some(&pipeline) = self.pipelines.get(&key) {
            return Ok((pipeline, false));
        }

        let pipeline = device.create_pipeline(&key.stages())?;
        log::debug!("Created pipeline {:?} for {:?}", pipeline, key);
        self.pipelines.insert(key, pipeline);
        Ok((pipeline, true))
    }

    pub fn get(&self, key: &PipelineKey) -> Option<PipelineId> {
        self.pipelines.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}
