// SPDX-License-Identifier: CEPL-1.0
//! Device viability scoring and physical device selection.
use std::{ffi::CStr, fmt};

use ash::vk;
use tracing::{debug, info};

use crate::{
    error::{ConfigurationError, Result, VkError},
    extensions::check_extension_support,
    queue::find_queue_roles,
    runtime::Runtime,
    surface::SurfaceCapabilitySnapshot,
};

/// Why a candidate was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    MissingQueueRoles,
    MissingExtensions,
    InadequateSurface,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rejection::MissingQueueRoles => "no graphics or present queue family",
            Rejection::MissingExtensions => "required device extensions missing",
            Rejection::InadequateSurface => "no surface formats or present modes",
        })
    }
}

/// Scores one device against `surface`. Extensions are checked before the
/// surface is probed; a device without them is never probed.
pub fn evaluate_device<R: Runtime + ?Sized>(
    runtime: &R,
    phys: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
    required_extensions: &[&CStr],
) -> std::result::Result<(), Rejection> {
    let roles = find_queue_roles(runtime, phys, surface);
    let supports_extensions = check_extension_support(runtime, phys, required_extensions);

    let adequate_surface = supports_extensions
        && SurfaceCapabilitySnapshot::probe(runtime, phys, surface)
            .map(|snapshot| snapshot.is_adequate())
            .unwrap_or(false);

    if roles.presentation_pair().is_none() {
        Err(Rejection::MissingQueueRoles)
    } else if !supports_extensions {
        Err(Rejection::MissingExtensions)
    } else if !adequate_surface {
        Err(Rejection::InadequateSurface)
    } else {
        Ok(())
    }
}

pub fn is_device_viable<R: Runtime + ?Sized>(
    runtime: &R,
    phys: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
    required_extensions: &[&CStr],
) -> bool {
    evaluate_device(runtime, phys, surface, required_extensions).is_ok()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// First viable device in enumeration order; later devices are not scored.
    #[default]
    FirstFit,
    /// Scores every device; first viable discrete GPU, else first viable.
    PreferDiscrete,
}

pub fn select_physical_device<R: Runtime + ?Sized>(
    runtime: &R,
    surface: vk::SurfaceKHR,
    required_extensions: &[&CStr],
    policy: SelectionPolicy,
) -> Result<vk::PhysicalDevice> {
    let devices = runtime
        .enumerate_physical_devices()
        .map_err(VkError::query("enumerate_physical_devices"))?;

    if devices.is_empty() {
        return Err(ConfigurationError::NoPhysicalDevices.into());
    }

    let viable = |phys: vk::PhysicalDevice| {
        let summary = runtime.device_summary(phys);
        match evaluate_device(runtime, phys, surface, required_extensions) {
            Ok(()) => {
                debug!("{} ({:?}) is viable", summary.name, summary.device_type);
                Some(summary)
            }
            Err(reason) => {
                debug!("rejecting {}: {reason}", summary.name);
                None
            }
        }
    };

    let chosen = match policy {
        SelectionPolicy::FirstFit => devices
            .iter()
            .find_map(|&phys| viable(phys).map(|summary| (phys, summary))),
        SelectionPolicy::PreferDiscrete => {
            let mut candidates: Vec<_> = devices
                .iter()
                .filter_map(|&phys| viable(phys).map(|summary| (phys, summary)))
                .collect();
            let discrete = candidates
                .iter()
                .position(|(_, s)| s.device_type == vk::PhysicalDeviceType::DISCRETE_GPU);
            match discrete {
                Some(i) => Some(candidates.swap_remove(i)),
                None => candidates.into_iter().next(),
            }
        }
    };

    let (phys, summary) = chosen.ok_or(ConfigurationError::NoSuitableDevice)?;
    info!(
        "selected {} ({:?}) out of {} device(s)",
        summary.name,
        summary.device_type,
        devices.len()
    );
    Ok(phys)
}
