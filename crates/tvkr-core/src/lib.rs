// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]

mod lifecycle;

pub use lifecycle::{InvalidTransition, Lifecycle, LifecycleState};

pub const ENGINE_NAME: &str = "TVkR";
pub const ENGINE_VERSION: (u32, u32, u32) = (0, 1, 0);
/// Reported as the application version unless a caller picks another.
pub const APP_VERSION: (u32, u32, u32) = (1, 0, 0);

pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}

/// Window-space size in physical pixels; the preferred extent for negotiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSize {
    pub width: u32,
    pub height: u32,
}

impl RenderSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Name and version the application reports to the graphics runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppIdentity {
    pub name: String,
    pub version: (u32, u32, u32),
}

impl AppIdentity {
    pub fn new(name: impl Into<String>, version: (u32, u32, u32)) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Default window/application title, e.g. `TVkR 0.1.0 Test`.
    pub fn default_title() -> String {
        let (maj, min, pat) = ENGINE_VERSION;
        format!("{ENGINE_NAME} {maj}.{min}.{pat} Test")
    }
}
