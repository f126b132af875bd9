// SPDX-License-Identifier: CEPL-1.0
//! Device-dependent half of the bootstrap: everything between a ready surface
//! and a running application.
use ash::vk;
use tracing::info;
use tvkr_core::{Lifecycle, LifecycleState, RenderSize};

use crate::{
    error::{ConfigurationError, Resource, Result, VkError},
    extensions::REQUIRED_DEVICE_EXTENSIONS,
    queue::{find_queue_roles, QueueRoleAssignment},
    runtime::{DeviceRequest, LogicalDevice, Runtime},
    selection::{select_physical_device, SelectionPolicy},
    shader::{ShaderPaths, ShaderStages},
    surface::SurfaceCapabilitySnapshot,
    surface_config::SurfaceConfig,
    swapchain::PresentationChain,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NegotiationOptions {
    pub policy: SelectionPolicy,
    /// Used only when the surface leaves the extent to the application.
    pub preferred_size: RenderSize,
    pub shaders: ShaderPaths,
}

impl Default for NegotiationOptions {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::default(),
            preferred_size: RenderSize::new(1280, 720),
            shaders: ShaderPaths::default(),
        }
    }
}

/// The selected device and everything created on it.
///
/// Dropping it destroys the views, then the swapchain, then the device.
pub struct DeviceContext<D: LogicalDevice> {
    chain: Option<PresentationChain>,
    phys: vk::PhysicalDevice,
    roles: QueueRoleAssignment,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
    config: SurfaceConfig,
    device: D,
}

impl<D: LogicalDevice> Drop for DeviceContext<D> {
    fn drop(&mut self) {
        if let Some(chain) = self.chain.take() {
            // SAFETY: built on `self.device`, which outlives this call.
            unsafe { chain.destroy(&self.device) };
        }
    }
}

impl<D: LogicalDevice> DeviceContext<D> {
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.phys
    }

    pub fn queue_roles(&self) -> &QueueRoleAssignment {
        &self.roles
    }

    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn chain(&self) -> Option<&PresentationChain> {
        self.chain.as_ref()
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}

/// Runs selection through shader release. `lifecycle` must be at
/// `SurfaceReady`; on error every object created here is already destroyed.
pub fn negotiate<R: Runtime + ?Sized>(
    runtime: &R,
    surface: vk::SurfaceKHR,
    options: &NegotiationOptions,
    lifecycle: &mut Lifecycle,
) -> Result<DeviceContext<R::Device>> {
    let phys = select_physical_device(
        runtime,
        surface,
        REQUIRED_DEVICE_EXTENSIONS,
        options.policy,
    )?;
    lifecycle.advance(LifecycleState::DeviceSelected)?;

    // Not cached from scoring.
    let roles = find_queue_roles(runtime, phys, surface);
    let (graphics_family, present_family) = roles
        .presentation_pair()
        .ok_or(ConfigurationError::NoSuitableDevice)?;

    let request = DeviceRequest {
        queue_families: roles.unique_presentation_families(),
        extensions: REQUIRED_DEVICE_EXTENSIONS,
    };
    let device = runtime
        .create_device(phys, &request)
        .map_err(VkError::creation(Resource::Device))?;
    info!(
        "logical device ready (graphics family {graphics_family}, present family {present_family})"
    );
    lifecycle.advance(LifecycleState::LogicalDeviceReady)?;

    let graphics_queue = device.queue(graphics_family);
    let present_queue = device.queue(present_family);

    let snapshot = SurfaceCapabilitySnapshot::probe(runtime, phys, surface)
        .map_err(VkError::query("surface capability probe"))?;
    let config = SurfaceConfig::select(
        &snapshot,
        options.preferred_size,
        graphics_family,
        present_family,
    );

    let chain = PresentationChain::create(&device, surface, &config)?;
    let mut ctx = DeviceContext {
        chain: Some(chain),
        phys,
        roles,
        graphics_queue,
        present_queue,
        config,
        device,
    };
    lifecycle.advance(LifecycleState::ChainReady)?;

    if let Some(chain) = ctx.chain.as_mut() {
        chain.create_views(&ctx.device)?;
    }
    lifecycle.advance(LifecycleState::ViewsReady)?;

    // No pipeline consumes the modules yet.
    let stages = ShaderStages::load(&ctx.device, &options.shaders)?;
    // SAFETY: created on `ctx.device` just above.
    unsafe { stages.release(&ctx.device) };
    lifecycle.advance(LifecycleState::PipelineResourcesReleased)?;

    Ok(ctx)
}
