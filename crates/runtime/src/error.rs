// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the runtime to embedding code.

use thiserror::Error;

use crate::config::ConfigError;
use crate::permission::{SecurityError, Setting};

/// Failures of runtime lifecycle, gate, and bootstrap operations.
///
/// Lifecycle and ownership failures are always returned to the immediate
/// caller; nothing in the runtime swallows them.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Bootstrap was already attempted, or a lifecycle-only setting was
    /// changed after bootstrap began.
    #[error("runtime already initialized")]
    AlreadyInitialized,

    /// An ownership-gated setting was changed by someone other than the
    /// exit authority while enforcement is active.
    #[error("{caller} is not authorized to change {setting}")]
    NotAuthorized { setting: Setting, caller: String },

    /// The deployment configuration could not be loaded in application mode.
    #[error("fatal configuration error: {0}")]
    FatalConfiguration(#[source] ConfigError),

    /// No base directory could be derived or chosen.
    #[error("{0}")]
    NoBaseDirectory(String),

    /// Process termination was disabled by `disable_exit`.
    #[error("process exit has been disabled")]
    ExitDisabled,

    /// The installed permission policy rejected the caller.
    #[error(transparent)]
    PermissionDenied(#[from] SecurityError),

    /// A fatal step of the security installation failed.
    #[error("security installation failed: {0}")]
    Installation(String),

    /// The security dialog worker thread could not be spawned.
    #[error("failed to start security dialog worker: {0}")]
    DispatcherStart(#[source] std::io::Error),
}
