// SPDX-License-Identifier: CEPL-1.0
//! Vulkan device and presentation-surface negotiation.
//!
//! The decision logic (queue roles, extensions, surface configuration,
//! device selection, chain building) is written against the [`Runtime`] and
//! [`LogicalDevice`] traits; [`AshInstance`] and [`AshDevice`] implement them
//! on top of `ash`.
#![deny(unsafe_op_in_unsafe_fn)]

mod context;
mod debug;
mod device;
mod error;
mod extensions;
mod instance;
mod negotiate;
mod queue;
mod runtime;
mod selection;
mod shader;
mod surface;
mod surface_config;
mod swapchain;

#[cfg(test)]
mod fake;

pub use ash;

pub use context::{ContextOptions, VkContext, DEFAULT_VALIDATION_LAYER};
pub use debug::DebugReporter;
pub use device::AshDevice;
pub use error::{ConfigurationError, Resource, Result, VkError};
pub use extensions::{check_extension_support, missing_extensions, REQUIRED_DEVICE_EXTENSIONS};
pub use instance::{missing_layers, AshInstance, AshSurface};
pub use negotiate::{negotiate, DeviceContext, NegotiationOptions};
pub use queue::{assign_queue_roles, find_queue_roles, QueueRole, QueueRoleAssignment};
pub use runtime::{DeviceRequest, DeviceSummary, LogicalDevice, Runtime};
pub use selection::{
    evaluate_device, is_device_viable, select_physical_device, Rejection, SelectionPolicy,
};
pub use shader::{read_spirv, ShaderPaths, ShaderStages};
pub use surface::SurfaceCapabilitySnapshot;
pub use surface_config::{
    choose_image_count, choose_present_mode, choose_surface_format, extent_from_caps,
    ImageSharing, SurfaceConfig, PREFERRED_FORMAT,
};
pub use swapchain::{image_view_create_info, swapchain_create_info, PresentationChain};
