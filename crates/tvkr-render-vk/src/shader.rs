// SPDX-License-Identifier: CEPL-1.0
use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use ash::{util::read_spv, vk};
use tracing::debug;

use crate::{
    error::{ConfigurationError, Resource, Result, VkError},
    runtime::LogicalDevice,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/vert.spv"),
            fragment: PathBuf::from("shaders/frag.spv"),
        }
    }
}

/// Reads a whole SPIR-V file into words.
pub fn read_spirv(path: &Path) -> Result<Vec<u32>> {
    let bytes = fs::read(path).map_err(|source| ConfigurationError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;
    let words = read_spv(&mut Cursor::new(&bytes)).map_err(|source| {
        ConfigurationError::InvalidSpirv {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!("read {} ({} bytes)", path.display(), bytes.len());
    Ok(words)
}

/// Vertex and fragment modules living on one device.
#[derive(Debug)]
pub struct ShaderStages {
    vertex: vk::ShaderModule,
    fragment: vk::ShaderModule,
}

impl ShaderStages {
    /// Both files are read before any module is created.
    pub fn load<D: LogicalDevice + ?Sized>(device: &D, paths: &ShaderPaths) -> Result<Self> {
        let vertex_code = read_spirv(&paths.vertex)?;
        let fragment_code = read_spirv(&paths.fragment)?;

        let vertex = device
            .create_shader_module(&vertex_code)
            .map_err(VkError::creation(Resource::ShaderModule))?;
        let fragment = match device.create_shader_module(&fragment_code) {
            Ok(module) => module,
            Err(result) => {
                // SAFETY: created just above on `device`.
                unsafe { device.destroy_shader_module(vertex) };
                return Err(VkError::creation(Resource::ShaderModule)(result));
            }
        };
        Ok(Self { vertex, fragment })
    }

    pub fn vertex(&self) -> vk::ShaderModule {
        self.vertex
    }

    pub fn fragment(&self) -> vk::ShaderModule {
        self.fragment
    }

    /// Fragment first, then vertex.
    ///
    /// # Safety
    /// `device` must be the device the modules were created on.
    pub unsafe fn release<D: LogicalDevice + ?Sized>(self, device: &D) {
        unsafe {
            device.destroy_shader_module(self.fragment);
            device.destroy_shader_module(self.vertex);
        }
    }
}
