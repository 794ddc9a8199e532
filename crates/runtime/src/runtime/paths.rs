// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Directory layout under the base directory.

use std::path::{Path, PathBuf};

/// Name of the default base directory under the user's home.
pub const NETX_DIR_NAME: &str = ".netx";
/// Security material under the base directory.
pub const SECURITY_DIR_NAME: &str = "security";
/// Pinned certificate fingerprints under the security directory.
pub const TRUSTED_CERTIFICATES_FILE: &str = "trusted-certs.json";
pub const LOG_DIR_NAME: &str = "log";

/// `$HOME/.netx`
pub fn default_base_dir(home: &Path) -> PathBuf {
    home.join(NETX_DIR_NAME)
}

pub fn security_dir(base: &Path) -> PathBuf {
    base.join(SECURITY_DIR_NAME)
}

pub fn trusted_certificates_path(base: &Path) -> PathBuf {
    security_dir(base).join(TRUSTED_CERTIFICATES_FILE)
}

/// Log directory: the configured one, else `log` under the base directory.
pub fn log_dir(base: Option<&Path>, configured: Option<PathBuf>) -> Option<PathBuf> {
    configured.or_else(|| base.map(|b| b.join(LOG_DIR_NAME)))
}
