// SPDX-License-Identifier: CEPL-1.0
use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::info;
use tvkr_core::{AppIdentity, Lifecycle, LifecycleState};

use crate::{
    debug::DebugReporter,
    device::AshDevice,
    error::{ConfigurationError, Result},
    instance::{AshInstance, AshSurface},
    negotiate::{negotiate, DeviceContext, NegotiationOptions},
};

pub const DEFAULT_VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextOptions {
    pub app: AppIdentity,
    /// `None` disables validation and the debug callback.
    pub validation_layers: Option<Vec<String>>,
    pub negotiation: NegotiationOptions,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            app: AppIdentity::new(AppIdentity::default_title(), tvkr_core::APP_VERSION),
            validation_layers: cfg!(debug_assertions)
                .then(|| vec![DEFAULT_VALIDATION_LAYER.to_string()]),
            negotiation: NegotiationOptions::default(),
        }
    }
}

/// Every native object the bootstrap owns.
///
/// Fields drop in declaration order: device objects, surface, debug
/// callback, instance.
pub struct VkContext {
    device: DeviceContext<AshDevice>,
    surface: AshSurface,
    debug: Option<DebugReporter>,
    instance: AshInstance,
}

impl VkContext {
    /// Drives `lifecycle` from `WindowReady` to `PipelineResourcesReleased`.
    /// On failure the lifecycle is aborted and whatever was created is
    /// already released.
    pub fn new(
        window: &dyn HasWindowHandle,
        display: &dyn HasDisplayHandle,
        options: &ContextOptions,
        lifecycle: &mut Lifecycle,
    ) -> Result<Self> {
        match Self::build(window, display, options, lifecycle) {
            Ok(ctx) => Ok(ctx),
            Err(e) => {
                lifecycle.abort(&e);
                Err(e)
            }
        }
    }

    fn build(
        window: &dyn HasWindowHandle,
        display: &dyn HasDisplayHandle,
        options: &ContextOptions,
        lifecycle: &mut Lifecycle,
    ) -> Result<Self> {
        let dh = display
            .display_handle()
            .map_err(|e| ConfigurationError::WindowHandle(e.to_string()))?
            .as_raw();
        let wh = window
            .window_handle()
            .map_err(|e| ConfigurationError::WindowHandle(e.to_string()))?
            .as_raw();

        // STRICT ORDER: instance, debug callback, surface, then the device
        // chosen against that surface.
        let instance = AshInstance::new(dh, &options.app, options.validation_layers.as_deref())?;
        lifecycle.advance(LifecycleState::InstanceReady)?;

        let debug = match options.validation_layers {
            Some(_) => {
                let reporter = DebugReporter::new(instance.entry(), instance.raw())?;
                lifecycle.advance(LifecycleState::DebugHookAttached)?;
                Some(reporter)
            }
            None => None,
        };

        let surface = AshSurface::new(&instance, dh, wh)?;
        lifecycle.advance(LifecycleState::SurfaceReady)?;

        let device = negotiate(&instance, surface.handle(), &options.negotiation, lifecycle)?;

        info!("Vulkan context ready");
        Ok(Self {
            device,
            surface,
            debug,
            instance,
        })
    }

    pub fn device(&self) -> &DeviceContext<AshDevice> {
        &self.device
    }

    pub fn surface(&self) -> vk::SurfaceKHR {
        self.surface.handle()
    }

    pub fn validation_enabled(&self) -> bool {
        self.debug.is_some()
    }

    pub fn instance(&self) -> &AshInstance {
        &self.instance
    }
}
