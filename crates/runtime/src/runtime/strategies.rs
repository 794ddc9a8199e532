// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pluggable launch strategies held by the runtime.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::output_diagnostic::{print_console, print_error, print_warning};

/// When cached application resources are re-checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    /// Check on every launch.
    #[default]
    Always,
    /// Check once per session.
    Session,
    /// Always download again.
    Force,
    /// Use the cache only.
    Never,
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdatePolicy::Always => "always",
            UpdatePolicy::Session => "session",
            UpdatePolicy::Force => "force",
            UpdatePolicy::Never => "never",
        })
    }
}

/// Receives launch progress and problems.
pub trait LaunchHandler: Send + Sync {
    fn launch_error(&self, message: &str);
    fn launch_warning(&self, message: &str);
    fn launch_completed(&self, application: &str);
}

/// Writes launch events to the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLaunchHandler;

impl LaunchHandler for DefaultLaunchHandler {
    fn launch_error(&self, message: &str) {
        print_error(message);
    }

    fn launch_warning(&self, message: &str) {
        print_warning(message);
    }

    fn launch_completed(&self, application: &str) {
        tracing::info!(application, "launch completed");
    }
}

/// Shows download progress.
pub trait DownloadIndicator: Send + Sync {
    fn download_started(&self, resource: &str);
    fn download_progress(&self, resource: &str, done: u64, total: Option<u64>);
    fn download_finished(&self, resource: &str);
}

/// Prints download progress lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDownloadIndicator;

impl DownloadIndicator for ConsoleDownloadIndicator {
    fn download_started(&self, resource: &str) {
        print_console(format_args!("Downloading {}", resource));
    }

    fn download_progress(&self, resource: &str, done: u64, total: Option<u64>) {
        match total {
            Some(total) if total > 0 => {
                print_console(format_args!("{}: {}%", resource, done.saturating_mul(100) / total))
            }
            _ => print_console(format_args!("{}: {} bytes", resource, done)),
        }
    }

    fn download_finished(&self, resource: &str) {
        print_console(format_args!("Downloaded {}", resource));
    }
}

/// Icon shown on launcher windows.
#[derive(Clone, PartialEq, Eq)]
pub struct WindowIcon {
    pub source: PathBuf,
    pub bytes: Arc<[u8]>,
}

impl fmt::Debug for WindowIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowIcon")
            .field("source", &self.source)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Loads the default window icon.
pub trait IconSource: Send + Sync {
    fn load(&self) -> io::Result<WindowIcon>;
}

/// Icon read from an image file.
#[derive(Debug, Clone)]
pub struct FileIconSource {
    path: PathBuf,
}

impl FileIconSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IconSource for FileIconSource {
    fn load(&self) -> io::Result<WindowIcon> {
        let bytes = std::fs::read(&self.path)?;
        Ok(WindowIcon {
            source: self.path.clone(),
            bytes: bytes.into(),
        })
    }
}

#[cfg(test)]
#[path = "strategies_tests.rs"]
mod tests;
