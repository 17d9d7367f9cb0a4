use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::device::GlobalState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "RenderSettings::default_clear_color")]
    pub clear_color: [f32; 4],
    #[serde(default = "RenderSettings::enabled")]
    pub depth_test: bool,
    #[serde(default = "RenderSettings::enabled")]
    pub alpha_blending: bool,
    #[serde(default = "RenderSettings::enabled")]
    pub srgb_framebuffer: bool,
    #[serde(default = "RenderSettings::enabled")]
    pub program_point_size: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: Self::default_clear_color(),
            depth_test: true,
            alpha_blending: true,
            srgb_framebuffer: true,
            program_point_size: true,
        }
    }
}

impl RenderSettings {
    pub fn load() -> Self {
        Self::load_from_path("settings.json")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RenderSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded render settings from {:?}", path);
                    settings.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default render settings.",
                        path, err
                    );
                    RenderSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Render settings file {:?} not found. Using default settings.",
                    path
                );
                RenderSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default render settings.",
                    path, err
                );
                RenderSettings::default()
            }
        }
    }

    fn validate(mut self) -> Self {
        if self.clear_color.iter().any(|c| !c.is_finite()) {
            warn!("Clear color must be finite. Using default clear color.");
            self.clear_color = Self::default_clear_color();
        }

        for component in &mut self.clear_color {
            *component = component.clamp(0.0, 1.0);
        }

        self
    }

    pub fn global_state(&self) -> GlobalState {
        GlobalState {
            depth_test: self.depth_test,
            alpha_blending: self.alpha_blending,
            srgb_framebuffer: self.srgb_framebuffer,
            program_point_size: self.program_point_size,
        }
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }

    const fn default_clear_color() -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    const fn enabled() -> bool {
        true
    }
}
