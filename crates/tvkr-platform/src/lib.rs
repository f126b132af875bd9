// SPDX-License-Identifier: CEPL-1.0
//! Window collaborator: a single fixed-size, non-resizable winit window.
pub use winit;

use anyhow::{Context, Result};
use tracing::info;
use tvkr_core::RenderSize;
use winit::{
    dpi::PhysicalSize,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowSpec {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl WindowSpec {
    pub fn attributes(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width.max(1), self.height.max(1)))
            .with_resizable(false)
    }
}

/// Must be called from `ApplicationHandler::resumed` (winit 0.30).
pub fn create_window(event_loop: &ActiveEventLoop, spec: &WindowSpec) -> Result<Window> {
    let window = event_loop
        .create_window(spec.attributes())
        .with_context(|| format!("create_window \"{}\"", spec.title))?;
    let size = render_size(&window);
    info!(
        "window \"{}\" ready ({}x{})",
        spec.title, size.width, size.height
    );
    Ok(window)
}

/// Current inner size, never zero in either dimension.
pub fn render_size(window: &Window) -> RenderSize {
    let size = window.inner_size();
    RenderSize::new(size.width.max(1), size.height.max(1))
}
