// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authorization for privileged runtime operations.
//!
//! This module provides:
//!
//! - [`AuthorizationGate`] - lifecycle and ownership checks for every setter
//! - [`ExitAuthority`] / [`ExitSwitch`] - who may terminate the process, and whether anyone may
//! - [`PermissionPolicy`] - per-caller permission grants
//! - [`AuthorizationHook`] - the installed enforcement point consulting the policy

pub mod gate;
pub mod hook;
pub mod policy;

pub use gate::{AuthorizationGate, ExitAuthority, ExitSwitch, GateContext, GateKind, Setting};
pub use hook::AuthorizationHook;
pub use policy::{Permission, PermissionPolicy, PermissionSet, SecurityError};
