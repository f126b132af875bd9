// SPDX-License-Identifier: CEPL-1.0
use thiserror::Error;
use tracing::{error, info};

/// Bootstrap stages, in acquisition order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    Uninitialized,
    WindowReady,
    InstanceReady,
    DebugHookAttached,
    SurfaceReady,
    DeviceSelected,
    LogicalDeviceReady,
    ChainReady,
    ViewsReady,
    PipelineResourcesReleased,
    Running,
    CleanedUp,
    Aborted,
}

impl LifecycleState {
    const ORDER: [LifecycleState; 12] = [
        Self::Uninitialized,
        Self::WindowReady,
        Self::InstanceReady,
        Self::DebugHookAttached,
        Self::SurfaceReady,
        Self::DeviceSelected,
        Self::LogicalDeviceReady,
        Self::ChainReady,
        Self::ViewsReady,
        Self::PipelineResourcesReleased,
        Self::Running,
        Self::CleanedUp,
    ];

    /// Stages that may be passed over on the way forward.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Self::DebugHookAttached | Self::PipelineResourcesReleased
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::CleanedUp | Self::Aborted)
    }

    fn position(self) -> Option<usize> {
        Self::ORDER.iter().position(|&s| s == self)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid lifecycle transition {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Forward-only tracker for the bootstrap sequence.
#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn can_advance_to(&self, next: LifecycleState) -> bool {
        if self.state.is_terminal() || next == LifecycleState::Aborted {
            return !self.state.is_terminal();
        }
        let (Some(from), Some(to)) = (self.state.position(), next.position()) else {
            return false;
        };
        to > from
            && LifecycleState::ORDER[from + 1..to]
                .iter()
                .all(|s| s.is_optional())
    }

    pub fn advance(&mut self, next: LifecycleState) -> Result<(), InvalidTransition> {
        if !self.can_advance_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        info!("lifecycle {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Enters the terminal fatal state. A no-op once terminal.
    pub fn abort(&mut self, reason: &dyn std::fmt::Display) {
        if self.state.is_terminal() {
            return;
        }
        error!("lifecycle aborted in {:?}: {reason}", self.state);
        self.state = LifecycleState::Aborted;
    }
}
