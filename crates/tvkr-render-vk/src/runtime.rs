// SPDX-License-Identifier: CEPL-1.0
//! The seam between negotiation logic and the native graphics runtime.
//!
//! Handles passed into these methods must have been produced by the same
//! runtime (physical devices from `enumerate_physical_devices`, surfaces
//! created on the same instance). Implementations may rely on that.
use std::ffi::{CStr, CString};

use ash::{prelude::VkResult, vk};

/// Identity of a physical device, for logs and ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceSummary {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
}

/// What the logical device is created with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceRequest<'a> {
    /// Distinct family indices, one queue each.
    pub queue_families: Vec<u32>,
    pub extensions: &'a [&'a CStr],
}

/// Instance-level queries and logical device creation.
pub trait Runtime {
    type Device: LogicalDevice;

    fn enumerate_physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>>;
    fn device_summary(&self, phys: vk::PhysicalDevice) -> DeviceSummary;
    fn queue_families(&self, phys: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties>;
    fn supports_present(
        &self,
        phys: vk::PhysicalDevice,
        family_index: u32,
        surface: vk::SurfaceKHR,
    ) -> VkResult<bool>;
    fn device_extensions(&self, phys: vk::PhysicalDevice) -> VkResult<Vec<CString>>;

    fn surface_capabilities(
        &self,
        phys: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR>;
    fn surface_formats(
        &self,
        phys: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>>;
    fn surface_present_modes(
        &self,
        phys: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>>;

    fn create_device(
        &self,
        phys: vk::PhysicalDevice,
        request: &DeviceRequest<'_>,
    ) -> VkResult<Self::Device>;
}

/// Device-level creation and destruction. Dropping the implementor destroys
/// the device itself, so every child object must be destroyed first.
pub trait LogicalDevice {
    fn queue(&self, family_index: u32) -> vk::Queue;

    fn create_swapchain(
        &self,
        info: &vk::SwapchainCreateInfoKHR<'_>,
    ) -> VkResult<vk::SwapchainKHR>;
    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>>;
    /// # Safety
    /// `swapchain` must come from this device, have no live views, and not be
    /// destroyed twice.
    unsafe fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR);

    fn create_image_view(&self, info: &vk::ImageViewCreateInfo<'_>) -> VkResult<vk::ImageView>;
    /// # Safety
    /// `view` must come from this device and not be destroyed twice.
    unsafe fn destroy_image_view(&self, view: vk::ImageView);

    fn create_shader_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule>;
    /// # Safety
    /// `module` must come from this device and not be destroyed twice.
    unsafe fn destroy_shader_module(&self, module: vk::ShaderModule);
}
