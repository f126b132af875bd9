// SPDX-License-Identifier: CEPL-1.0
use ash::{prelude::VkResult, vk};
use tracing::debug;

use crate::runtime::Runtime;

/// What a (device, surface) pair supported at probe time. Not refreshed on
/// window changes.
#[derive(Clone, Debug)]
pub struct SurfaceCapabilitySnapshot {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SurfaceCapabilitySnapshot {
    pub fn probe<R: Runtime + ?Sized>(
        runtime: &R,
        phys: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Self> {
        let capabilities = runtime.surface_capabilities(phys, surface)?;
        let formats = runtime.surface_formats(phys, surface)?;
        let present_modes = runtime.surface_present_modes(phys, surface)?;

        debug!(
            "surface support: {} formats, {} present modes, image count: {}-{}",
            formats.len(),
            present_modes.len(),
            capabilities.min_image_count,
            if capabilities.max_image_count == 0 {
                "unbounded".to_string()
            } else {
                capabilities.max_image_count.to_string()
            }
        );

        Ok(Self {
            capabilities,
            formats,
            present_modes,
        })
    }

    /// At least one format and one present mode.
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}
