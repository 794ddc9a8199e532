// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle and settings of a runtime.

use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::strategies::{DownloadIndicator, LaunchHandler, UpdatePolicy, WindowIcon};
use crate::error::RuntimeError;

/// Bootstrap progress. Moves forward only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Initializing,
    Initialized,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Initializing => "initializing",
            Lifecycle::Initialized => "initialized",
        })
    }
}

/// Settings of a runtime.
#[derive(Clone)]
pub struct RuntimeConfig {
    pub base_directory: Option<PathBuf>,
    pub update_policy: UpdatePolicy,
    pub launch_handler: Option<Arc<dyn LaunchHandler>>,
    pub download_indicator: Option<Arc<dyn DownloadIndicator>>,
    pub window_icon: Option<WindowIcon>,
    pub headless: bool,
    pub verify_signatures: bool,
    pub security_enabled: bool,
    pub debug: bool,
    pub redirect_streams: bool,
    pub forks_allowed: bool,
    /// Replaced wholesale, never edited in place.
    pub initial_arguments: Option<Arc<[String]>>,
    /// Set by bootstrap.
    pub is_application: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_directory: None,
            update_policy: UpdatePolicy::default(),
            launch_handler: None,
            download_indicator: None,
            window_icon: None,
            headless: false,
            verify_signatures: true,
            security_enabled: true,
            debug: false,
            redirect_streams: false,
            forks_allowed: true,
            initial_arguments: None,
            is_application: false,
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("base_directory", &self.base_directory)
            .field("update_policy", &self.update_policy)
            .field("launch_handler", &self.launch_handler.is_some())
            .field("download_indicator", &self.download_indicator.is_some())
            .field("window_icon", &self.window_icon)
            .field("headless", &self.headless)
            .field("verify_signatures", &self.verify_signatures)
            .field("security_enabled", &self.security_enabled)
            .field("debug", &self.debug)
            .field("redirect_streams", &self.redirect_streams)
            .field("forks_allowed", &self.forks_allowed)
            .field("initial_arguments", &self.initial_arguments)
            .field("is_application", &self.is_application)
            .finish()
    }
}

#[derive(Debug, Default)]
struct StateInner {
    lifecycle: Lifecycle,
    config: RuntimeConfig,
}

/// Lifecycle plus settings behind one lock, so a setter's gate decision and
/// its write see the same lifecycle.
#[derive(Debug, Default)]
pub struct RuntimeState {
    inner: RwLock<StateInner>,
}

impl RuntimeState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            inner: RwLock::new(StateInner {
                lifecycle: Lifecycle::Uninitialized,
                config,
            }),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.read().lifecycle
    }

    /// Move `Uninitialized → Initializing`.
    ///
    /// Fails with `AlreadyInitialized` from any other state.
    pub fn begin_initialization(&self) -> Result<(), RuntimeError> {
        let mut inner = self.inner.write();
        if inner.lifecycle != Lifecycle::Uninitialized {
            return Err(RuntimeError::AlreadyInitialized);
        }
        inner.lifecycle = Lifecycle::Initializing;
        Ok(())
    }

    /// Move `Initializing → Initialized`.
    pub fn finish_initialization(&self) {
        let mut inner = self.inner.write();
        if inner.lifecycle == Lifecycle::Initializing {
            inner.lifecycle = Lifecycle::Initialized;
        }
    }

    /// Fails with `AlreadyInitialized` once bootstrap has begun.
    pub fn check_not_initialized(&self) -> Result<(), RuntimeError> {
        match self.lifecycle() {
            Lifecycle::Uninitialized => Ok(()),
            _ => Err(RuntimeError::AlreadyInitialized),
        }
    }

    /// Read the settings.
    pub fn read<R>(&self, f: impl FnOnce(&RuntimeConfig) -> R) -> R {
        f(&self.inner.read().config)
    }

    /// Read the settings together with the lifecycle they belong to.
    pub fn read_with_lifecycle<R>(&self, f: impl FnOnce(Lifecycle, &RuntimeConfig) -> R) -> R {
        let inner = self.inner.read();
        f(inner.lifecycle, &inner.config)
    }

    /// Change settings under the write lock, after `f` has approved the
    /// change for the current lifecycle.
    pub fn update<R>(
        &self,
        f: impl FnOnce(Lifecycle, &mut RuntimeConfig) -> Result<R, RuntimeError>,
    ) -> Result<R, RuntimeError> {
        let mut inner = self.inner.write();
        let lifecycle = inner.lifecycle;
        f(lifecycle, &mut inner.config)
    }

    /// Change settings without a gate. Used by bootstrap for defaults.
    pub(crate) fn apply_defaults(&self, f: impl FnOnce(&mut RuntimeConfig)) {
        f(&mut self.inner.write().config);
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
