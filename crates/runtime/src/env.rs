// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All environment variables read by the runtime are defined here.
//! Use these accessors instead of calling `std::env::var()` directly.

use std::path::PathBuf;

/// User's home directory.
pub const HOME: &str = "HOME";
/// Forces headless mode when set to `true`.
pub const JNLP_HEADLESS: &str = "JNLP_HEADLESS";
/// Overrides the directory holding `deployment.json`.
pub const JNLP_CONFIG_DIR: &str = "JNLP_CONFIG_DIR";
/// `tracing` filter directive for the binary.
pub const JNLP_LOG: &str = "JNLP_LOG";

/// `HOME`: User's home directory.
pub fn home() -> Option<PathBuf> {
    std::env::var(HOME)
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// `JNLP_HEADLESS`: `true` (any case) when no windowing should be used.
pub fn headless() -> bool {
    std::env::var(JNLP_HEADLESS).is_ok_and(|v| v.eq_ignore_ascii_case("true"))
}

/// `JNLP_CONFIG_DIR`: Deployment configuration directory override.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var(JNLP_CONFIG_DIR).ok().map(PathBuf::from)
}

/// `JNLP_LOG`: Log filter directive.
pub fn log_filter() -> Option<String> {
    std::env::var(JNLP_LOG).ok()
}
