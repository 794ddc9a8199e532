// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime module: lifecycle, settings, and bootstrap.
//!
//! This module provides:
//! - [`Runtime`] - the launcher runtime, shared by handle
//! - [`RuntimeBuilder`] - Fluent API for constructing Runtime instances
//! - [`RuntimeState`] - lifecycle and settings behind one lock

mod builder;
mod core;
pub mod host;
pub mod paths;
pub mod state;
pub mod strategies;
mod summary;

pub use builder::RuntimeBuilder;
pub use core::Runtime;
pub use host::{NoopStreamRedirector, ProcessTerminator, StreamRedirector, Terminator};
pub use state::{Lifecycle, RuntimeConfig, RuntimeState};
pub use strategies::{
    ConsoleDownloadIndicator, DefaultLaunchHandler, DownloadIndicator, FileIconSource,
    IconSource, LaunchHandler, UpdatePolicy, WindowIcon,
};
pub use summary::{RuntimeSummary, SecuritySummary};
