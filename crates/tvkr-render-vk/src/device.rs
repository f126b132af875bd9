// SPDX-License-Identifier: CEPL-1.0
use ash::{khr::swapchain, prelude::VkResult, vk};

use crate::runtime::LogicalDevice;

/// Logical device plus its swapchain loader. Dropping it waits for idle and
/// destroys the device.
pub struct AshDevice {
    device: ash::Device,
    swapchain_loader: swapchain::Device,
}

impl AshDevice {
    pub fn new(instance: &ash::Instance, device: ash::Device) -> Self {
        let swapchain_loader = swapchain::Device::new(instance, &device);
        Self {
            device,
            swapchain_loader,
        }
    }

    pub fn raw(&self) -> &ash::Device {
        &self.device
    }
}

impl Drop for AshDevice {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();
            self.device.destroy_device(None);
        }
    }
}

impl LogicalDevice for AshDevice {
    fn queue(&self, family_index: u32) -> vk::Queue {
        unsafe { self.device.get_device_queue(family_index, 0) }
    }

    fn create_swapchain(
        &self,
        info: &vk::SwapchainCreateInfoKHR<'_>,
    ) -> VkResult<vk::SwapchainKHR> {
        unsafe { self.swapchain_loader.create_swapchain(info, None) }
    }

    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        unsafe { self.swapchain_loader.get_swapchain_images(swapchain) }
    }

    unsafe fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        unsafe { self.swapchain_loader.destroy_swapchain(swapchain, None) }
    }

    fn create_image_view(&self, info: &vk::ImageViewCreateInfo<'_>) -> VkResult<vk::ImageView> {
        unsafe { self.device.create_image_view(info, None) }
    }

    unsafe fn destroy_image_view(&self, view: vk::ImageView) {
        unsafe { self.device.destroy_image_view(view, None) }
    }

    fn create_shader_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule> {
        let info = vk::ShaderModuleCreateInfo {
            s_type: vk::StructureType::SHADER_MODULE_CREATE_INFO,
            code_size: std::mem::size_of_val(code),
            p_code: code.as_ptr(),
            ..Default::default()
        };
        unsafe { self.device.create_shader_module(&info, None) }
    }

    unsafe fn destroy_shader_module(&self, module: vk::ShaderModule) {
        unsafe { self.device.destroy_shader_module(module, None) }
    }
}
