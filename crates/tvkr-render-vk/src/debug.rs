// SPDX-License-Identifier: CEPL-1.0
use std::{
    borrow::Cow,
    ffi::{c_char, c_void, CStr},
};

use ash::{ext::debug_report, vk, Entry};
use tracing::info;

use crate::error::{Resource, Result, VkError};

fn format_report(layer_prefix: &str, message: &str) -> String {
    format!("[{layer_prefix}]: {message}")
}

unsafe fn lossy<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        Cow::Borrowed("")
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
    }
}

unsafe extern "system" fn debug_callback(
    _flags: vk::DebugReportFlagsEXT,
    _object_type: vk::DebugReportObjectTypeEXT,
    _object: u64,
    _location: usize,
    _code: i32,
    p_layer_prefix: *const c_char,
    p_message: *const c_char,
    _user: *mut c_void,
) -> vk::Bool32 {
    let (prefix, message) = unsafe { (lossy(p_layer_prefix), lossy(p_message)) };
    eprintln!("{}", format_report(&prefix, &message));
    vk::FALSE
}

/// Error and warning reports from the validation layers, written to stderr.
pub struct DebugReporter {
    loader: debug_report::Instance,
    callback: vk::DebugReportCallbackEXT,
}

// VK_EXT_debug_report is deprecated in favour of debug_utils; ash marks its
// entry points accordingly.
#[allow(deprecated)]
impl DebugReporter {
    pub fn new(entry: &Entry, instance: &ash::Instance) -> Result<Self> {
        let loader = debug_report::Instance::new(entry, instance);
        let ci = vk::DebugReportCallbackCreateInfoEXT {
            s_type: vk::StructureType::DEBUG_REPORT_CALLBACK_CREATE_INFO_EXT,
            flags: vk::DebugReportFlagsEXT::ERROR | vk::DebugReportFlagsEXT::WARNING,
            pfn_callback: Some(debug_callback),
            ..Default::default()
        };
        let callback = unsafe { loader.create_debug_report_callback(&ci, None) }
            .map_err(VkError::creation(Resource::DebugCallback))?;
        info!("validation callback attached");
        Ok(Self { loader, callback })
    }
}

#[allow(deprecated)]
impl Drop for DebugReporter {
    fn drop(&mut self) {
        unsafe {
            self.loader
                .destroy_debug_report_callback(self.callback, None)
        };
    }
}
