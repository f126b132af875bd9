// SPDX-License-Identifier: CEPL-1.0
//! ash-backed `Runtime`: the instance, its surface loader, and the window
//! surface guard.
use std::ffi::{c_char, CStr, CString};

use ash::{khr::surface, prelude::VkResult, vk, Entry};
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use tracing::{debug, info};
use tvkr_core::{AppIdentity, ENGINE_NAME, ENGINE_VERSION};

use crate::{
    device::AshDevice,
    error::{ConfigurationError, Resource, Result, VkError},
    runtime::{DeviceRequest, DeviceSummary, Runtime},
};

pub struct AshInstance {
    entry: Entry,
    instance: ash::Instance,
    surface_loader: surface::Instance,
}

impl Drop for AshInstance {
    fn drop(&mut self) {
        unsafe { self.instance.destroy_instance(None) };
    }
}

fn make_version((major, minor, patch): (u32, u32, u32)) -> u32 {
    vk::make_api_version(0, major, minor, patch)
}

/// Names from `requested` that `available` does not list, in request order.
pub fn missing_layers<'a>(available: &[CString], requested: &'a [String]) -> Vec<&'a str> {
    requested
        .iter()
        .filter(|want| !available.iter().any(|have| have.to_bytes() == want.as_bytes()))
        .map(String::as_str)
        .collect()
}

impl AshInstance {
    /// `validation_layers: Some(..)` enables validation; every listed layer
    /// must be installed.
    pub fn new(
        display: RawDisplayHandle,
        app: &AppIdentity,
        validation_layers: Option<&[String]>,
    ) -> Result<Self> {
        let entry = Entry::linked();

        let layer_names: Vec<CString> = match validation_layers {
            Some(requested) => {
                let available: Vec<CString> =
                    unsafe { entry.enumerate_instance_layer_properties() }
                        .map_err(VkError::query("enumerate_instance_layer_properties"))?
                        .iter()
                        .filter_map(|p| p.layer_name_as_c_str().ok().map(CStr::to_owned))
                        .collect();
                if let Some(missing) = missing_layers(&available, requested).first() {
                    return Err(ConfigurationError::MissingValidationLayer(missing.to_string()).into());
                }
                // Every name matched an installed layer, so none holds a NUL.
                requested
                    .iter()
                    .filter_map(|l| CString::new(l.as_str()).ok())
                    .collect()
            }
            None => Vec::new(),
        };
        let layer_ptrs: Vec<*const c_char> = layer_names.iter().map(|l| l.as_ptr()).collect();

        let mut ext_vec = ash_window::enumerate_required_extensions(display)
            .map_err(VkError::query("enumerate_required_extensions"))?
            .to_vec();
        if validation_layers.is_some() {
            ext_vec.push(ash::ext::debug_report::NAME.as_ptr());
        }

        let app_name = CString::new(app.name.as_str()).unwrap_or_default();
        let engine_name = CString::new(ENGINE_NAME).unwrap_or_default();
        let app_info = vk::ApplicationInfo {
            s_type: vk::StructureType::APPLICATION_INFO,
            p_application_name: app_name.as_ptr(),
            application_version: make_version(app.version),
            p_engine_name: engine_name.as_ptr(),
            engine_version: make_version(ENGINE_VERSION),
            api_version: vk::API_VERSION_1_0,
            ..Default::default()
        };

        let create_info = vk::InstanceCreateInfo {
            s_type: vk::StructureType::INSTANCE_CREATE_INFO,
            p_application_info: &app_info,
            enabled_extension_count: ext_vec.len() as u32,
            pp_enabled_extension_names: ext_vec.as_ptr(),
            enabled_layer_count: layer_ptrs.len() as u32,
            pp_enabled_layer_names: layer_ptrs.as_ptr(),
            ..Default::default()
        };

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(VkError::creation(Resource::Instance))?;
        let surface_loader = surface::Instance::new(&entry, &instance);

        info!(
            "Vulkan instance ready ({} extensions, {} layers)",
            ext_vec.len(),
            layer_ptrs.len()
        );
        Ok(Self {
            entry,
            instance,
            surface_loader,
        })
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn raw(&self) -> &ash::Instance {
        &self.instance
    }
}

impl Runtime for AshInstance {
    type Device = AshDevice;

    fn enumerate_physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { self.instance.enumerate_physical_devices() }
    }

    fn device_summary(&self, phys: vk::PhysicalDevice) -> DeviceSummary {
        let props = unsafe { self.instance.get_physical_device_properties(phys) };
        let name = props
            .device_name_as_c_str()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "<unnamed device>".to_string());
        DeviceSummary {
            name,
            device_type: props.device_type,
        }
    }

    fn queue_families(&self, phys: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(phys)
        }
    }

    fn supports_present(
        &self,
        phys: vk::PhysicalDevice,
        family_index: u32,
        surface: vk::SurfaceKHR,
    ) -> VkResult<bool> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_support(phys, family_index, surface)
        }
    }

    fn device_extensions(&self, phys: vk::PhysicalDevice) -> VkResult<Vec<CString>> {
        let props = unsafe { self.instance.enumerate_device_extension_properties(phys) }?;
        Ok(props
            .iter()
            .filter_map(|p| p.extension_name_as_c_str().ok().map(CStr::to_owned))
            .collect())
    }

    fn surface_capabilities(
        &self,
        phys: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_capabilities(phys, surface)
        }
    }

    fn surface_formats(
        &self,
        phys: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_formats(phys, surface)
        }
    }

    fn surface_present_modes(
        &self,
        phys: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_present_modes(phys, surface)
        }
    }

    fn create_device(
        &self,
        phys: vk::PhysicalDevice,
        request: &DeviceRequest<'_>,
    ) -> VkResult<AshDevice> {
        let priorities = [1.0_f32];
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = request
            .queue_families
            .iter()
            .map(|&family| vk::DeviceQueueCreateInfo {
                s_type: vk::StructureType::DEVICE_QUEUE_CREATE_INFO,
                queue_family_index: family,
                queue_count: 1,
                p_queue_priorities: priorities.as_ptr(),
                ..Default::default()
            })
            .collect();

        let device_exts: Vec<*const c_char> =
            request.extensions.iter().map(|e| e.as_ptr()).collect();
        let features = vk::PhysicalDeviceFeatures::default();

        let dinfo = vk::DeviceCreateInfo {
            s_type: vk::StructureType::DEVICE_CREATE_INFO,
            queue_create_info_count: queue_infos.len() as u32,
            p_queue_create_infos: queue_infos.as_ptr(),
            enabled_extension_count: device_exts.len() as u32,
            pp_enabled_extension_names: device_exts.as_ptr(),
            p_enabled_features: &features,
            ..Default::default()
        };

        let device = unsafe { self.instance.create_device(phys, &dinfo, None) }?;
        debug!("device created with {} queue(s)", queue_infos.len());
        Ok(AshDevice::new(&self.instance, device))
    }
}

/// Window surface; must be dropped before the instance it was created on.
pub struct AshSurface {
    loader: surface::Instance,
    surface: vk::SurfaceKHR,
}

impl AshSurface {
    pub fn new(
        instance: &AshInstance,
        display: RawDisplayHandle,
        window: RawWindowHandle,
    ) -> Result<Self> {
        let surface = unsafe {
            ash_window::create_surface(&instance.entry, &instance.instance, display, window, None)
        }
        .map_err(VkError::creation(Resource::Surface))?;
        Ok(Self {
            loader: instance.surface_loader.clone(),
            surface,
        })
    }

    pub fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }
}

impl Drop for AshSurface {
    fn drop(&mut self) {
        unsafe { self.loader.destroy_surface(self.surface, None) };
    }
}
