// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Permission types and the per-caller permission policy.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::caller::Caller;

/// Security errors raised by the authorization hook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("Permission denied: {caller} lacks {permission}")]
    Denied { caller: String, permission: String },

    #[error("Permission denied: {caller} is not the exit authority")]
    NotExitAuthority { caller: String },

    #[error("Permission denied: process exit has been disabled")]
    ExitDisabled,

    #[error("Authorization hook requires a permission policy to be installed first")]
    PolicyNotInstalled,
}

/// Permissions a caller can hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Implies every other permission.
    All,

    /// Terminate the host process.
    ExitProcess,

    /// Change runtime settings or install security components.
    ModifyRuntime,

    /// Obtain the security dialog dispatcher.
    AccessSecurityDialogs,

    /// Add or remove trusted certificates.
    ManageCertificates,

    /// Connect to a host (`*` or `*.domain` wildcards allowed in grants).
    Network { host: String },

    /// Read a file or, if recursive, a directory tree.
    FileRead { path: PathBuf, recursive: bool },

    /// Write a file or, if recursive, a directory tree.
    FileWrite { path: PathBuf, recursive: bool },
}

impl Permission {
    /// Check if this granted permission allows the requested one.
    pub fn allows(&self, requested: &Permission) -> bool {
        match (self, requested) {
            (Permission::All, _) => true,

            (
                Permission::FileRead {
                    path: allowed,
                    recursive,
                },
                Permission::FileRead {
                    path: requested, ..
                },
            )
            | (
                Permission::FileWrite {
                    path: allowed,
                    recursive,
                },
                Permission::FileWrite {
                    path: requested, ..
                },
            ) => allowed == requested || (*recursive && requested.starts_with(allowed)),

            (Permission::Network { host: allowed }, Permission::Network { host: requested }) => {
                host_matches(allowed, requested)
            }

            (granted, requested) => granted == requested,
        }
    }
}

/// Host grant matching: exact (case-insensitive), `*`, or `*.domain` for
/// the domain itself and its subdomains.
fn host_matches(allowed: &str, requested: &str) -> bool {
    if allowed == "*" || allowed.eq_ignore_ascii_case(requested) {
        return true;
    }
    let Some(domain) = allowed.strip_prefix("*.") else {
        return false;
    };
    let requested = requested.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    requested == domain
        || requested
            .strip_suffix(&domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::All => write!(f, "all permissions"),
            Permission::ExitProcess => write!(f, "exit permission"),
            Permission::ModifyRuntime => write!(f, "runtime modification"),
            Permission::AccessSecurityDialogs => write!(f, "security dialog access"),
            Permission::ManageCertificates => write!(f, "certificate management"),
            Permission::Network { host } => write!(f, "network access to {}", host),
            Permission::FileRead { path, .. } => write!(f, "read access to {}", path.display()),
            Permission::FileWrite { path, .. } => {
                write!(f, "write access to {}", path.display())
            }
        }
    }
}

/// Set of granted permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding [`Permission::All`].
    pub fn all() -> Self {
        let mut set = Self::new();
        set.grant(Permission::All);
        set
    }

    /// Grant a permission
    pub fn grant(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Check if a permission is granted
    pub fn is_granted(&self, requested: &Permission) -> bool {
        self.permissions.iter().any(|p| p.allows(requested))
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Merge permissions from another set
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().cloned());
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

/// Per-caller permission grants.
///
/// Callers without an explicit grant receive the sandbox set, which is
/// empty unless configured otherwise.
#[derive(Debug, Default)]
pub struct PermissionPolicy {
    grants: RwLock<HashMap<u64, PermissionSet>>,
    sandbox: PermissionSet,
}

impl PermissionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy whose ungranted callers receive `sandbox`.
    pub fn with_sandbox(sandbox: PermissionSet) -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
            sandbox,
        }
    }

    /// Grant `permission` to `caller`.
    pub fn grant(&self, caller: &Caller, permission: Permission) {
        self.grants
            .write()
            .entry(caller.id())
            .or_default()
            .grant(permission);
    }

    /// Effective permissions of `caller`.
    pub fn permissions_for(&self, caller: &Caller) -> PermissionSet {
        let mut effective = self.sandbox.clone();
        if let Some(granted) = self.grants.read().get(&caller.id()) {
            effective.merge(granted);
        }
        effective
    }

    /// Whether `caller` holds `permission`.
    pub fn implies(&self, caller: &Caller, permission: &Permission) -> bool {
        if self.sandbox.is_granted(permission) {
            return true;
        }
        self.grants
            .read()
            .get(&caller.id())
            .is_some_and(|set| set.is_granted(permission))
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
