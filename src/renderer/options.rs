// renderer/options.rs

/// Per-renderable draw configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub topology: wgpu::PrimitiveTopology,
    pub fill_mode: wgpu::PolygonMode,
    /// Only used for point lists.
    pub point_size: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            topology: wgpu::PrimitiveTopology::TriangleList,
            fill_mode: wgpu::PolygonMode::Fill,
            point_size: 1.0,
        }
    }
}

impl RenderOptions {
    pub fn points(size: f32) -> Self {
        Self {
            topology: wgpu::PrimitiveTopology::PointList,
            point_size: size,
            ..Self::default()
        }
    }

    pub fn wireframe() -> Self {
        Self {
            fill_mode: wgpu::PolygonMode::Line,
            ..Self::default()
        }
    }

    pub fn is_points(&self) -> bool {
        self.topology == wgpu::PrimitiveTopology::PointList
    }
}
