// SPDX-License-Identifier: CEPL-1.0
use std::{
    collections::BTreeSet,
    ffi::{CStr, CString},
};

use ash::{khr::swapchain, vk};
use tracing::debug;

use crate::runtime::Runtime;

/// Device extensions every candidate must expose.
pub const REQUIRED_DEVICE_EXTENSIONS: &[&CStr] = &[swapchain::NAME];

/// Required names not present in `available`, in `required` order.
pub fn missing_extensions<'r>(available: &[CString], required: &[&'r CStr]) -> Vec<&'r CStr> {
    let mut remaining: BTreeSet<&CStr> = required.iter().copied().collect();
    for name in available {
        remaining.remove(name.as_c_str());
    }
    required
        .iter()
        .copied()
        .filter(|name| remaining.contains(name))
        .collect()
}

pub fn check_extension_support<R: Runtime + ?Sized>(
    runtime: &R,
    phys: vk::PhysicalDevice,
    required: &[&CStr],
) -> bool {
    let available = runtime.device_extensions(phys).unwrap_or_default();
    let missing = missing_extensions(&available, required);
    if !missing.is_empty() {
        debug!("device {:?} lacks extensions {:?}", phys, missing);
    }
    missing.is_empty()
}
