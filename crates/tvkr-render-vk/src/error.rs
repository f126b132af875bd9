// SPDX-License-Identifier: CEPL-1.0
use std::{fmt, io, path::PathBuf};

use ash::vk;
use thiserror::Error;
use tvkr_core::InvalidTransition;

/// Fatal conditions caused by the environment rather than by a rejected call.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to find GPUs with Vulkan support")]
    NoPhysicalDevices,
    #[error("failed to find a suitable GPU")]
    NoSuitableDevice,
    #[error("validation layer {0} requested, but not available")]
    MissingValidationLayer(String),
    #[error("failed to open file '{}'", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{}' is not SPIR-V bytecode", path.display())]
    InvalidSpirv {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid window handle: {0}")]
    WindowHandle(String),
}

/// Native objects the bootstrap creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Instance,
    DebugCallback,
    Surface,
    Device,
    Swapchain,
    ImageView,
    ShaderModule,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Instance => "instance",
            Resource::DebugCallback => "debug callback",
            Resource::Surface => "window surface",
            Resource::Device => "logical device",
            Resource::Swapchain => "swap chain",
            Resource::ImageView => "image view",
            Resource::ShaderModule => "shader module",
        })
    }
}

#[derive(Debug, Error)]
pub enum VkError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("failed to create {resource}: {result}")]
    ResourceCreation {
        resource: Resource,
        #[source]
        result: vk::Result,
    },
    #[error("{query} failed: {result}")]
    Query {
        query: &'static str,
        #[source]
        result: vk::Result,
    },
    #[error(transparent)]
    Lifecycle(#[from] InvalidTransition),
}

impl VkError {
    pub fn creation(resource: Resource) -> impl FnOnce(vk::Result) -> Self {
        move |result| VkError::ResourceCreation { resource, result }
    }

    pub fn query(query: &'static str) -> impl FnOnce(vk::Result) -> Self {
        move |result| VkError::Query { query, result }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, VkError::Configuration(_))
    }
}

pub type Result<T, E = VkError> = std::result::Result<T, E>;
