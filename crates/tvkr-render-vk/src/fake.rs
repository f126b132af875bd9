// SPDX-License-Identifier: CEPL-1.0
//! In-memory runtime that records every call, for tests.
use std::{
    cell::{Cell, RefCell},
    ffi::CString,
    fs,
    rc::Rc,
};

use ash::{
    prelude::VkResult,
    vk::{self, Handle},
};

use crate::{
    extensions::REQUIRED_DEVICE_EXTENSIONS,
    runtime::{DeviceRequest, DeviceSummary, LogicalDevice, Runtime},
    shader::ShaderPaths,
    surface_config::PREFERRED_FORMAT,
};

/// Writes a minimal vertex/fragment pair under the temp dir, unique per `tag`.
pub fn shader_fixture(tag: &str) -> ShaderPaths {
    let dir = std::env::temp_dir().join(format!("tvkr-fixture-{}-{tag}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let magic = 0x0723_0203u32.to_le_bytes();
    let paths = ShaderPaths {
        vertex: dir.join("vert.spv"),
        fragment: dir.join("frag.spv"),
    };
    fs::write(&paths.vertex, magic).unwrap();
    fs::write(&paths.fragment, magic).unwrap();
    paths
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Enumerate,
    QueueFamilies(u64),
    SurfaceSupport(u64, u32),
    Extensions(u64),
    SurfaceCapabilities(u64),
    SurfaceFormats(u64),
    PresentModes(u64),
    CreateDevice(u64, Vec<u32>),
    CreateSwapchain {
        min_image_count: u32,
        sharing: vk::SharingMode,
        family_count: u32,
        present_mode: vk::PresentModeKHR,
        old_swapchain_null: bool,
    },
    SwapchainImages(u64),
    DestroySwapchain(u64),
    CreateImageView(u64),
    DestroyImageView(u64),
    CreateShaderModule(usize),
    DestroyShaderModule(u64),
    DestroyDevice,
}

impl Call {
    pub fn is_creation(&self) -> bool {
        matches!(
            self,
            Call::CreateDevice(..)
                | Call::CreateSwapchain { .. }
                | Call::CreateImageView(_)
                | Call::CreateShaderModule(_)
        )
    }
}

pub type Log = Rc<RefCell<Vec<Call>>>;

#[derive(Clone, Debug)]
pub struct FakeGpu {
    pub name: &'static str,
    pub device_type: vk::PhysicalDeviceType,
    pub queue_families: Vec<vk::QueueFamilyProperties>,
    pub present_families: Vec<u32>,
    pub extensions: Vec<CString>,
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
    pub present_query_fails: bool,
    pub extension_query_fails: bool,
    /// Fails the capabilities, formats and present-mode queries.
    pub surface_query_fails: bool,
}

impl FakeGpu {
    /// One all-purpose family that can present, swapchain support, mailbox.
    pub fn viable(name: &'static str) -> Self {
        Self {
            name,
            device_type: vk::PhysicalDeviceType::INTEGRATED_GPU,
            queue_families: vec![vk::QueueFamilyProperties {
                queue_flags: vk::QueueFlags::GRAPHICS
                    | vk::QueueFlags::COMPUTE
                    | vk::QueueFlags::TRANSFER,
                queue_count: 1,
                ..Default::default()
            }],
            present_families: vec![0],
            extensions: REQUIRED_DEVICE_EXTENSIONS
                .iter()
                .map(|n| CString::from(*n))
                .collect(),
            capabilities: vk::SurfaceCapabilitiesKHR {
                min_image_count: 2,
                max_image_count: 0,
                current_extent: vk::Extent2D {
                    width: u32::MAX,
                    height: u32::MAX,
                },
                min_image_extent: vk::Extent2D {
                    width: 1,
                    height: 1,
                },
                max_image_extent: vk::Extent2D {
                    width: 4096,
                    height: 4096,
                },
                current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
                ..Default::default()
            },
            formats: vec![PREFERRED_FORMAT],
            present_modes: vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX],
            present_query_fails: false,
            extension_query_fails: false,
            surface_query_fails: false,
        }
    }

    pub fn without_extensions(mut self) -> Self {
        self.extensions.clear();
        self
    }

    pub fn without_present(mut self) -> Self {
        self.present_families.clear();
        self
    }

    pub fn without_formats(mut self) -> Self {
        self.formats.clear();
        self
    }

    pub fn failing_present_query(mut self) -> Self {
        self.present_query_fails = true;
        self
    }

    pub fn failing_extension_query(mut self) -> Self {
        self.extension_query_fails = true;
        self
    }

    pub fn failing_surface_query(mut self) -> Self {
        self.surface_query_fails = true;
        self
    }

    pub fn discrete(mut self) -> Self {
        self.device_type = vk::PhysicalDeviceType::DISCRETE_GPU;
        self
    }

    /// Graphics on family 0, present only on a separate family 1.
    pub fn split_present(mut self) -> Self {
        self.queue_families.push(vk::QueueFamilyProperties {
            queue_flags: vk::QueueFlags::TRANSFER,
            queue_count: 1,
            ..Default::default()
        });
        self.present_families = vec![1];
        self
    }
}

/// Which runtime and device-level calls should be rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct Failures {
    pub enumerate: bool,
    /// Zero-based surface-capabilities query from which every later one
    /// fails, counted across all devices.
    pub surface_query_from: Option<usize>,
    pub device: bool,
    pub swapchain: bool,
    /// Zero-based view index whose creation fails.
    pub view_at: Option<usize>,
    pub shader: bool,
    /// Images realised beyond the requested minimum.
    pub extra_images: u32,
}

pub struct FakeRuntime {
    pub gpus: Vec<FakeGpu>,
    pub failures: Failures,
    pub log: Log,
    surface_queries: Cell<usize>,
}

impl FakeRuntime {
    pub fn new(gpus: Vec<FakeGpu>) -> Self {
        Self {
            gpus,
            failures: Failures::default(),
            log: Log::default(),
            surface_queries: Cell::new(0),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn surface() -> vk::SurfaceKHR {
        vk::SurfaceKHR::from_raw(0x5u64)
    }

    pub fn handle(index: usize) -> vk::PhysicalDevice {
        vk::PhysicalDevice::from_raw(index as u64 + 1)
    }

    fn gpu(&self, phys: vk::PhysicalDevice) -> &FakeGpu {
        &self.gpus[phys.as_raw() as usize - 1]
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl Runtime for FakeRuntime {
    type Device = FakeDevice;

    fn enumerate_physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        self.record(Call::Enumerate);
        if self.failures.enumerate {
            return Err(vk::Result::ERROR_INITIALIZATION_FAILED);
        }
        Ok((0..self.gpus.len()).map(Self::handle).collect())
    }

    fn device_summary(&self, phys: vk::PhysicalDevice) -> DeviceSummary {
        let gpu = self.gpu(phys);
        DeviceSummary {
            name: gpu.name.to_string(),
            device_type: gpu.device_type,
        }
    }

    fn queue_families(&self, phys: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        self.record(Call::QueueFamilies(phys.as_raw()));
        self.gpu(phys).queue_families.clone()
    }

    fn supports_present(
        &self,
        phys: vk::PhysicalDevice,
        family_index: u32,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<bool> {
        self.record(Call::SurfaceSupport(phys.as_raw(), family_index));
        if self.gpu(phys).present_query_fails {
            return Err(vk::Result::ERROR_SURFACE_LOST_KHR);
        }
        Ok(self.gpu(phys).present_families.contains(&family_index))
    }

    fn device_extensions(&self, phys: vk::PhysicalDevice) -> VkResult<Vec<CString>> {
        self.record(Call::Extensions(phys.as_raw()));
        if self.gpu(phys).extension_query_fails {
            return Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        }
        Ok(self.gpu(phys).extensions.clone())
    }

    fn surface_capabilities(
        &self,
        phys: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        self.record(Call::SurfaceCapabilities(phys.as_raw()));
        let n = self.surface_queries.get();
        self.surface_queries.set(n + 1);
        let late = self.failures.surface_query_from.is_some_and(|from| n >= from);
        if late || self.gpu(phys).surface_query_fails {
            return Err(vk::Result::ERROR_SURFACE_LOST_KHR);
        }
        Ok(self.gpu(phys).capabilities)
    }

    fn surface_formats(
        &self,
        phys: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        self.record(Call::SurfaceFormats(phys.as_raw()));
        if self.gpu(phys).surface_query_fails {
            return Err(vk::Result::ERROR_SURFACE_LOST_KHR);
        }
        Ok(self.gpu(phys).formats.clone())
    }

    fn surface_present_modes(
        &self,
        phys: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>> {
        self.record(Call::PresentModes(phys.as_raw()));
        if self.gpu(phys).surface_query_fails {
            return Err(vk::Result::ERROR_SURFACE_LOST_KHR);
        }
        Ok(self.gpu(phys).present_modes.clone())
    }

    fn create_device(
        &self,
        phys: vk::PhysicalDevice,
        request: &DeviceRequest<'_>,
    ) -> VkResult<FakeDevice> {
        self.record(Call::CreateDevice(
            phys.as_raw(),
            request.queue_families.clone(),
        ));
        if self.failures.device {
            return Err(vk::Result::ERROR_INITIALIZATION_FAILED);
        }
        Ok(FakeDevice::new(self.log.clone(), self.failures))
    }
}

pub struct FakeDevice {
    log: Log,
    failures: Failures,
    next_handle: Cell<u64>,
    requested_images: Cell<u32>,
    views_created: Cell<usize>,
}

impl FakeDevice {
    pub fn new(log: Log, failures: Failures) -> Self {
        Self {
            log,
            failures,
            next_handle: Cell::new(100),
            requested_images: Cell::new(0),
            views_created: Cell::new(0),
        }
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn next(&self) -> u64 {
        let h = self.next_handle.get();
        self.next_handle.set(h + 1);
        h
    }
}

impl LogicalDevice for FakeDevice {
    fn queue(&self, family_index: u32) -> vk::Queue {
        vk::Queue::from_raw(0x1000 + family_index as u64)
    }

    fn create_swapchain(
        &self,
        info: &vk::SwapchainCreateInfoKHR<'_>,
    ) -> VkResult<vk::SwapchainKHR> {
        self.record(Call::CreateSwapchain {
            min_image_count: info.min_image_count,
            sharing: info.image_sharing_mode,
            family_count: info.queue_family_index_count,
            present_mode: info.present_mode,
            old_swapchain_null: info.old_swapchain == vk::SwapchainKHR::null(),
        });
        if self.failures.swapchain {
            return Err(vk::Result::ERROR_SURFACE_LOST_KHR);
        }
        self.requested_images.set(info.min_image_count);
        Ok(vk::SwapchainKHR::from_raw(self.next()))
    }

    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        self.record(Call::SwapchainImages(swapchain.as_raw()));
        let count = self.requested_images.get() + self.failures.extra_images;
        Ok((0..count)
            .map(|_| vk::Image::from_raw(self.next()))
            .collect())
    }

    unsafe fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        self.record(Call::DestroySwapchain(swapchain.as_raw()));
    }

    fn create_image_view(&self, info: &vk::ImageViewCreateInfo<'_>) -> VkResult<vk::ImageView> {
        self.record(Call::CreateImageView(info.image.as_raw()));
        let index = self.views_created.get();
        if self.failures.view_at == Some(index) {
            return Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
        }
        self.views_created.set(index + 1);
        Ok(vk::ImageView::from_raw(self.next()))
    }

    unsafe fn destroy_image_view(&self, view: vk::ImageView) {
        self.record(Call::DestroyImageView(view.as_raw()));
    }

    fn create_shader_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule> {
        self.record(Call::CreateShaderModule(code.len()));
        if self.failures.shader {
            return Err(vk::Result::ERROR_INVALID_SHADER_NV);
        }
        Ok(vk::ShaderModule::from_raw(self.next()))
    }

    unsafe fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.record(Call::DestroyShaderModule(module.as_raw()));
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        self.record(Call::DestroyDevice);
    }
}
