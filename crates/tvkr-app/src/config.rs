// SPDX-License-Identifier: CEPL-1.0
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, warn};
use tvkr_core::{AppIdentity, RenderSize, APP_VERSION};
use tvkr_platform::WindowSpec;
use tvkr_render_vk::{
    ContextOptions, NegotiationOptions, SelectionPolicy, ShaderPaths, DEFAULT_VALIDATION_LAYER,
};

pub const DEFAULT_CONFIG_PATH: &str = "tvkr.toml";

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct AppCfg {
    pub window: WindowCfg,
    pub vulkan: VulkanCfg,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowCfg {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowCfg {
    fn default() -> Self {
        WindowCfg {
            width: 1280,
            height: 720,
            title: AppIdentity::default_title(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeviceSelection {
    #[default]
    FirstFit,
    PreferDiscrete,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct VulkanCfg {
    pub validation: bool,
    pub validation_layers: Vec<String>,
    pub device_selection: DeviceSelection,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

impl Default for VulkanCfg {
    fn default() -> Self {
        let shaders = ShaderPaths::default();
        VulkanCfg {
            validation: cfg!(debug_assertions),
            validation_layers: vec![DEFAULT_VALIDATION_LAYER.to_string()],
            device_selection: DeviceSelection::FirstFit,
            vertex_shader: shaders.vertex,
            fragment_shader: shaders.fragment,
        }
    }
}

impl AppCfg {
    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec {
            width: self.window.width,
            height: self.window.height,
            title: self.window.title.clone(),
        }
    }

    /// `preferred_size` is the window's actual inner size.
    pub fn context_options(&self, preferred_size: RenderSize) -> ContextOptions {
        let policy = match self.vulkan.device_selection {
            DeviceSelection::FirstFit => SelectionPolicy::FirstFit,
            DeviceSelection::PreferDiscrete => SelectionPolicy::PreferDiscrete,
        };
        ContextOptions {
            app: AppIdentity::new(self.window.title.clone(), APP_VERSION),
            validation_layers: self
                .vulkan
                .validation
                .then(|| self.vulkan.validation_layers.clone()),
            negotiation: NegotiationOptions {
                policy,
                preferred_size,
                shaders: ShaderPaths {
                    vertex: self.vulkan.vertex_shader.clone(),
                    fragment: self.vulkan.fragment_shader.clone(),
                },
            },
        }
    }
}

pub fn parse_cfg(text: &str) -> Result<AppCfg, toml::de::Error> {
    toml::from_str(text)
}

/// Missing or unparsable files fall back to defaults.
pub fn load_cfg(path: &Path) -> AppCfg {
    match fs::read_to_string(path) {
        Ok(s) => parse_cfg(&s).unwrap_or_else(|e| {
            warn!("ignoring {}: {e}", path.display());
            AppCfg::default()
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("no {}, using defaults", path.display());
            AppCfg::default()
        }
        Err(e) => {
            warn!("cannot read {}: {e}", path.display());
            AppCfg::default()
        }
    }
}
