// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle and ownership checks for runtime setters.
//!
//! Every setter on the runtime names the [`Setting`] it touches. The gate
//! looks up the setting's [`GateKind`] and applies, in order:
//!
//! 1. the lifecycle check, for settings that only make sense before
//!    bootstrap (fails once the runtime has left `Uninitialized`),
//! 2. the ownership check, for settings the exit authority owns once the
//!    runtime is initialized.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::caller::Caller;
use crate::error::RuntimeError;
use crate::runtime::state::Lifecycle;

/// Runtime settings reachable through setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    BaseDirectory,
    SecurityEnabled,
    Headless,
    ForksAllowed,
    RedirectStreams,
    VerifySignatures,
    WindowIcon,
    Debug,
    UpdatePolicy,
    LaunchHandler,
    DownloadIndicator,
    ExitAuthority,
    InitialArguments,
}

/// Which check guards a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    /// Settable only before bootstrap begins.
    Lifecycle,
    /// Settable by the exit authority once initialized.
    Ownership,
}

impl Setting {
    pub const ALL: [Setting; 13] = [
        Setting::BaseDirectory,
        Setting::SecurityEnabled,
        Setting::Headless,
        Setting::ForksAllowed,
        Setting::RedirectStreams,
        Setting::VerifySignatures,
        Setting::WindowIcon,
        Setting::Debug,
        Setting::UpdatePolicy,
        Setting::LaunchHandler,
        Setting::DownloadIndicator,
        Setting::ExitAuthority,
        Setting::InitialArguments,
    ];

    pub fn gate(self) -> GateKind {
        match self {
            Setting::BaseDirectory
            | Setting::SecurityEnabled
            | Setting::Headless
            | Setting::ForksAllowed
            | Setting::RedirectStreams
            | Setting::VerifySignatures => GateKind::Lifecycle,
            Setting::WindowIcon
            | Setting::Debug
            | Setting::UpdatePolicy
            | Setting::LaunchHandler
            | Setting::DownloadIndicator
            | Setting::ExitAuthority
            | Setting::InitialArguments => GateKind::Ownership,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Setting::BaseDirectory => "base_directory",
            Setting::SecurityEnabled => "security_enabled",
            Setting::Headless => "headless",
            Setting::ForksAllowed => "forks_allowed",
            Setting::RedirectStreams => "redirect_streams",
            Setting::VerifySignatures => "verify_signatures",
            Setting::WindowIcon => "window_icon",
            Setting::Debug => "debug",
            Setting::UpdatePolicy => "update_policy",
            Setting::LaunchHandler => "launch_handler",
            Setting::DownloadIndicator => "download_indicator",
            Setting::ExitAuthority => "exit_authority",
            Setting::InitialArguments => "initial_arguments",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single caller allowed to terminate the process and to change
/// ownership-gated settings after initialization.
///
/// Unset means unrestricted. Once set it can be replaced but never cleared.
#[derive(Debug, Default)]
pub struct ExitAuthority {
    holder: RwLock<Option<Caller>>,
}

impl ExitAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Caller> {
        self.holder.read().clone()
    }

    pub fn set(&self, caller: Caller) {
        *self.holder.write() = Some(caller);
    }

    /// True when no authority is set, or `caller` is the authority.
    pub fn permits(&self, caller: &Caller) -> bool {
        self.holder.read().as_ref().is_none_or(|held| held == caller)
    }
}

/// One-way switch disabling process termination.
#[derive(Debug, Default)]
pub struct ExitSwitch {
    disabled: AtomicBool,
}

impl ExitSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable exit. Idempotent; there is no way back.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }
}

/// Runtime state the gate decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateContext {
    pub lifecycle: Lifecycle,
    pub security_enabled: bool,
}

/// Guard applied to every runtime mutation.
#[derive(Debug, Default)]
pub struct AuthorizationGate {
    authority: Arc<ExitAuthority>,
    exit: Arc<ExitSwitch>,
}

impl AuthorizationGate {
    pub fn new(
        authority: Arc<ExitAuthority>,
        exit: Arc<ExitSwitch>,
    ) -> Self {
        Self { authority, exit }
    }

    pub fn authority(&self) -> &Arc<ExitAuthority> {
        &self.authority
    }

    pub fn exit_switch(&self) -> &Arc<ExitSwitch> {
        &self.exit
    }

    /// Check whether `caller` may change `setting` in `ctx`.
    pub fn check(
        &self,
        caller: &Caller,
        setting: Setting,
        ctx: GateContext,
    ) -> Result<(), RuntimeError> {
        let result = match setting.gate() {
            GateKind::Lifecycle => Self::check_lifecycle(ctx),
            GateKind::Ownership => self.check_ownership(caller, setting, ctx),
        };
        match &result {
            Ok(()) => tracing::debug!(%setting, caller = %caller, "setting change allowed"),
            Err(e) => tracing::warn!(%setting, caller = %caller, error = %e, "setting change denied"),
        }
        result
    }

    /// Check whether `caller` may terminate the process in `ctx`.
    pub fn check_exit(&self, caller: &Caller, ctx: GateContext) -> Result<(), RuntimeError> {
        if self.exit.is_disabled() {
            tracing::warn!(caller = %caller, "exit denied: disabled");
            return Err(RuntimeError::ExitDisabled);
        }
        self.check_ownership(caller, Setting::ExitAuthority, ctx)
            .inspect_err(|_| tracing::warn!(caller = %caller, "exit denied: not the exit authority"))
    }

    fn check_lifecycle(ctx: GateContext) -> Result<(), RuntimeError> {
        if ctx.lifecycle == Lifecycle::Uninitialized {
            Ok(())
        } else {
            Err(RuntimeError::AlreadyInitialized)
        }
    }

    fn check_ownership(
        &self,
        caller: &Caller,
        setting: Setting,
        ctx: GateContext,
    ) -> Result<(), RuntimeError> {
        if !ctx.security_enabled
            || ctx.lifecycle != Lifecycle::Initialized
            || self.authority.permits(caller)
        {
            return Ok(());
        }
        Err(RuntimeError::NotAuthorized {
            setting,
            caller: caller.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
