use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Lights beyond this count are dropped from the uniform payload.
pub const MAXIMUM_LIGHTS: usize = 4;

#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LightType {
    #[default]
    Directional = 0,
    Point = 1,
    Spot = 2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightData {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub light_type: LightType,
    pub strength: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct LightRaw {
    pub position: [f32; 3],
    pub strength: f32,
    pub direction: [f32; 3],
    pub light_type: i32,
    pub color: [f32; 3],
    pub _padding: f32,
}

impl LightRaw {
    pub fn from_data(data: &LightData) -> Self {
        Self {
            position: data.position.to_array(),
            strength: data.strength,
            direction: data.direction.to_array(),
            light_type: data.light_type as i32,
            color: data.color.to_array(),
            _padding: 0.0,
        }
    }
}

/// Contents of the shared `Light` uniform block.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct LightsUniform {
    pub lights: [LightRaw; MAXIMUM_LIGHTS],
    pub count: i32,
    pub _padding: [i32; 3],
}

impl LightsUniform {
    pub fn from_data(data: &[LightData]) -> Self {
        let mut uniform = Self::zeroed();

        let count = data.len().min(MAXIMUM_LIGHTS);
        uniform.count = count as i32;
        for (dst, src) in uniform.lights.iter_mut().zip(data.iter()).take(count) {
            *dst = LightRaw::from_data(src);
        }

        uniform
    }

    pub fn active(&self) -> &[LightRaw] {
        &self.lights[..self.count as usize]
    }
}
