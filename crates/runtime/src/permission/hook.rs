// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authorization hook consulted for privileged operations.

use std::sync::Arc;

use super::gate::{ExitAuthority, ExitSwitch};
use super::policy::{Permission, PermissionPolicy, SecurityError};
use crate::caller::Caller;

/// Process-wide authorization hook.
///
/// Installed once during bootstrap, after the permission policy. The hook
/// never decides on its own: permissions come from the policy, exit rights
/// from the exit authority and the exit switch.
#[derive(Debug)]
pub struct AuthorizationHook {
    policy: Arc<PermissionPolicy>,
    authority: Arc<ExitAuthority>,
    exit: Arc<ExitSwitch>,
}

impl AuthorizationHook {
    /// Install the hook over an already installed policy.
    ///
    /// Fails with [`SecurityError::PolicyNotInstalled`] when `policy` is
    /// `None`, and with [`SecurityError::Denied`] when `installer` may not
    /// modify the runtime.
    pub fn install(
        policy: Option<Arc<PermissionPolicy>>,
        installer: &Caller,
        authority: Arc<ExitAuthority>,
        exit: Arc<ExitSwitch>,
    ) -> Result<Self, SecurityError> {
        let policy = policy.ok_or(SecurityError::PolicyNotInstalled)?;
        if !policy.implies(installer, &Permission::ModifyRuntime) {
            return Err(SecurityError::Denied {
                caller: installer.to_string(),
                permission: Permission::ModifyRuntime.to_string(),
            });
        }
        tracing::debug!(installer = %installer, "authorization hook installed");
        Ok(Self {
            policy,
            authority,
            exit,
        })
    }

    /// Check that `caller` holds `permission`.
    pub fn check_permission(
        &self,
        caller: &Caller,
        permission: &Permission,
    ) -> Result<(), SecurityError> {
        if self.policy.implies(caller, permission) {
            return Ok(());
        }
        tracing::warn!(caller = %caller, %permission, "permission denied");
        Err(SecurityError::Denied {
            caller: caller.to_string(),
            permission: permission.to_string(),
        })
    }

    /// Check that `caller` may terminate the process.
    ///
    /// Exit is refused once disabled. Otherwise, with an exit authority set
    /// only the authority may exit; with none set anyone may.
    pub fn check_exit(&self, caller: &Caller) -> Result<(), SecurityError> {
        if self.exit.is_disabled() {
            return Err(SecurityError::ExitDisabled);
        }
        if self.authority.permits(caller) {
            return Ok(());
        }
        tracing::warn!(caller = %caller, "exit denied");
        Err(SecurityError::NotExitAuthority {
            caller: caller.to_string(),
        })
    }

    pub fn policy(&self) -> &Arc<PermissionPolicy> {
        &self.policy
    }
}

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;
