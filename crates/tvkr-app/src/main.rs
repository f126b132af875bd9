// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tvkr_core::{init_tracing, Lifecycle, LifecycleState};
use tvkr_platform::{create_window, render_size};
use tvkr_render_vk::VkContext;

use tvkr_platform::winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

mod config;

use config::{load_cfg, AppCfg, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Enable or disable the validation layers (overrides the config file)
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    validation: Option<bool>,
}

struct App {
    cfg: AppCfg,
    lifecycle: Lifecycle,
    // Declared before `window`: the surface must go first.
    ctx: Option<VkContext>,
    window: Option<Window>,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(cfg: AppCfg) -> Self {
        App {
            cfg,
            lifecycle: Lifecycle::new(),
            ctx: None,
            window: None,
            fatal: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = create_window(event_loop, &self.cfg.window_spec())?;
        self.lifecycle.advance(LifecycleState::WindowReady)?;

        let options = self.cfg.context_options(render_size(&window));
        let ctx = VkContext::new(&window, &window, &options, &mut self.lifecycle)
            .context("Vulkan initialisation failed")?;

        self.lifecycle.advance(LifecycleState::Running)?;
        self.ctx = Some(ctx);
        self.window = Some(window);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.ctx = None;
        self.window = None;
        if self.lifecycle.advance(LifecycleState::CleanedUp).is_ok() {
            info!("cleaned up");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.lifecycle.state().is_terminal() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);
        if let Err(e) = self.start(event_loop) {
            error!("{e:#}");
            self.lifecycle.abort(&e);
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(window) = &self.window {
            if window_id != window.id() {
                return;
            }
        }

        if let WindowEvent::CloseRequested = event {
            info!("CloseRequested");
            self.shutdown();
            event_loop.exit();
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut cfg = load_cfg(&args.config);
    if let Some(validation) = args.validation {
        cfg.vulkan.validation = validation;
    }

    let event_loop: EventLoop<()> = EventLoop::new()?;
    let mut app = App::new(cfg);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.fatal.take() {
        return Err(e);
    }
    app.shutdown();
    Ok(())
}
