// SPDX-License-Identifier: CEPL-1.0
use ash::vk;
use tracing::info;

use crate::{
    error::{Resource, Result, VkError},
    runtime::LogicalDevice,
    surface_config::SurfaceConfig,
};

/// Swapchain images and one view per image, same order.
#[derive(Debug)]
pub struct PresentationChain {
    swapchain: vk::SwapchainKHR,
    format: vk::Format,
    extent: vk::Extent2D,
    images: Vec<vk::Image>,
    views: Vec<vk::ImageView>,
}

pub fn swapchain_create_info<'a>(
    surface: vk::SurfaceKHR,
    config: &'a SurfaceConfig,
) -> vk::SwapchainCreateInfoKHR<'a> {
    vk::SwapchainCreateInfoKHR {
        s_type: vk::StructureType::SWAPCHAIN_CREATE_INFO_KHR,
        surface,
        min_image_count: config.image_count,
        image_format: config.format.format,
        image_color_space: config.format.color_space,
        image_extent: config.extent,
        image_array_layers: 1,
        image_usage: vk::ImageUsageFlags::COLOR_ATTACHMENT,
        image_sharing_mode: config.sharing.mode(),
        pre_transform: config.pre_transform,
        composite_alpha: vk::CompositeAlphaFlagsKHR::OPAQUE,
        present_mode: config.present_mode,
        clipped: vk::TRUE,
        old_swapchain: vk::SwapchainKHR::null(),
        ..Default::default()
    }
    .queue_family_indices(config.sharing.queue_family_indices())
}

pub fn image_view_create_info(image: vk::Image, format: vk::Format) -> vk::ImageViewCreateInfo<'static> {
    let sub = vk::ImageSubresourceRange {
        aspect_mask: vk::ImageAspectFlags::COLOR,
        base_mip_level: 0,
        level_count: 1,
        base_array_layer: 0,
        layer_count: 1,
    };
    vk::ImageViewCreateInfo {
        s_type: vk::StructureType::IMAGE_VIEW_CREATE_INFO,
        image,
        view_type: vk::ImageViewType::TYPE_2D,
        format,
        components: vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        },
        subresource_range: sub,
        ..Default::default()
    }
}

impl PresentationChain {
    /// Creates the swapchain alone; [`create_views`](Self::create_views)
    /// realises the images.
    pub fn create<D: LogicalDevice + ?Sized>(
        device: &D,
        surface: vk::SurfaceKHR,
        config: &SurfaceConfig,
    ) -> Result<Self> {
        let info = swapchain_create_info(surface, config);
        let swapchain = device
            .create_swapchain(&info)
            .map_err(VkError::creation(Resource::Swapchain))?;

        info!(
            "swap chain created ({}x{}, fmt {:?}, {:?})",
            config.extent.width, config.extent.height, config.format.format, config.present_mode
        );
        Ok(PresentationChain {
            swapchain,
            format: config.format.format,
            extent: config.extent,
            images: Vec::new(),
            views: Vec::new(),
        })
    }

    /// Fetches the realised images and creates one view per image. Views
    /// made before a failure stay owned by the chain and go with
    /// [`destroy`](Self::destroy).
    pub fn create_views<D: LogicalDevice + ?Sized>(&mut self, device: &D) -> Result<()> {
        self.images = device
            .swapchain_images(self.swapchain)
            .map_err(VkError::query("get_swapchain_images"))?;

        self.views.reserve(self.images.len());
        for &image in &self.images {
            let info = image_view_create_info(image, self.format);
            let view = device
                .create_image_view(&info)
                .map_err(VkError::creation(Resource::ImageView))?;
            self.views.push(view);
        }
        info!("{} image views ready", self.views.len());
        Ok(())
    }

    /// [`create`](Self::create) then [`create_views`](Self::create_views).
    /// On failure everything created so far is destroyed before returning.
    pub fn build<D: LogicalDevice + ?Sized>(
        device: &D,
        surface: vk::SurfaceKHR,
        config: &SurfaceConfig,
    ) -> Result<Self> {
        let mut chain = Self::create(device, surface, config)?;
        if let Err(e) = chain.create_views(device) {
            // SAFETY: the views and swapchain were just created on `device`.
            unsafe { chain.destroy(device) };
            return Err(e);
        }
        Ok(chain)
    }

    /// Views first, then the swapchain.
    ///
    /// # Safety
    /// `device` must be the device the chain was built on, and no view may be
    /// in use.
    pub unsafe fn destroy<D: LogicalDevice + ?Sized>(self, device: &D) {
        for &view in &self.views {
            unsafe { device.destroy_image_view(view) };
        }
        unsafe { device.destroy_swapchain(self.swapchain) };
    }

    pub fn swapchain(&self) -> vk::SwapchainKHR {
        self.swapchain
    }

    pub fn format(&self) -> vk::Format {
        self.format
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    pub fn images(&self) -> &[vk::Image] {
        &self.images
    }

    pub fn views(&self) -> &[vk::ImageView] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
