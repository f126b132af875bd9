// SPDX-License-Identifier: CEPL-1.0
use ash::vk;
use tvkr_core::RenderSize;

use crate::surface::SurfaceCapabilitySnapshot;

/// Format used when the surface imposes none, and the one preferred otherwise.
pub const PREFERRED_FORMAT: vk::SurfaceFormatKHR = vk::SurfaceFormatKHR {
    format: vk::Format::B8G8R8A8_UNORM,
    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSharing {
    Exclusive,
    /// `[graphics, present]` family indices.
    Concurrent([u32; 2]),
}

impl ImageSharing {
    pub fn between(graphics: u32, present: u32) -> Self {
        if graphics == present {
            ImageSharing::Exclusive
        } else {
            ImageSharing::Concurrent([graphics, present])
        }
    }

    pub fn mode(&self) -> vk::SharingMode {
        match self {
            ImageSharing::Exclusive => vk::SharingMode::EXCLUSIVE,
            ImageSharing::Concurrent(_) => vk::SharingMode::CONCURRENT,
        }
    }

    pub fn queue_family_indices(&self) -> &[u32] {
        match self {
            ImageSharing::Exclusive => &[],
            ImageSharing::Concurrent(families) => families,
        }
    }
}

/// Everything the presentation chain is created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
    pub image_count: u32,
    pub sharing: ImageSharing,
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
}

impl SurfaceConfig {
    pub fn select(
        snapshot: &SurfaceCapabilitySnapshot,
        preferred: RenderSize,
        graphics_family: u32,
        present_family: u32,
    ) -> Self {
        let caps = &snapshot.capabilities;
        Self {
            format: choose_surface_format(&snapshot.formats),
            present_mode: choose_present_mode(&snapshot.present_modes),
            extent: extent_from_caps(caps, preferred),
            image_count: choose_image_count(caps),
            sharing: ImageSharing::between(graphics_family, present_family),
            pre_transform: caps.current_transform,
        }
    }
}

pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
    if let [only] = formats {
        if only.format == vk::Format::UNDEFINED {
            return PREFERRED_FORMAT;
        }
    }
    formats
        .iter()
        .copied()
        .find(|f| {
            f.format == PREFERRED_FORMAT.format && f.color_space == PREFERRED_FORMAT.color_space
        })
        .or_else(|| formats.first().copied())
        .unwrap_or(PREFERRED_FORMAT)
}

/// MAILBOX > IMMEDIATE > FIFO. FIFO is always available.
pub fn choose_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    let mut best = vk::PresentModeKHR::FIFO;
    for &mode in modes {
        if mode == vk::PresentModeKHR::MAILBOX {
            return mode;
        } else if mode == vk::PresentModeKHR::IMMEDIATE {
            best = mode;
        }
    }
    best
}

pub fn extent_from_caps(caps: &vk::SurfaceCapabilitiesKHR, want: RenderSize) -> vk::Extent2D {
    if caps.current_extent.width != u32::MAX {
        caps.current_extent
    } else {
        // Not `clamp`: a driver reporting min > max must not panic. The
        // minimum wins.
        vk::Extent2D {
            width: want
                .width
                .min(caps.max_image_extent.width)
                .max(caps.min_image_extent.width),
            height: want
                .height
                .min(caps.max_image_extent.height)
                .max(caps.min_image_extent.height),
        }
    }
}

/// One more than the minimum; `max_image_count == 0` means unbounded.
pub fn choose_image_count(caps: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let wanted = caps.min_image_count + 1;
    if caps.max_image_count > 0 {
        wanted.min(caps.max_image_count)
    } else {
        wanted
    }
}
