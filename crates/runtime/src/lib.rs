// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime bootstrap and privileged-mutation guard for a JNLP-style launcher.
//!
//! A [`Runtime`](runtime::Runtime) is built once at process entry with a
//! [`RuntimeBuilder`](runtime::RuntimeBuilder) and shared by handle. Calling
//! [`bootstrap`](runtime::Runtime::bootstrap) moves it through
//! `Uninitialized → Initializing → Initialized`, installing the security
//! layer exactly once and starting the security dialog worker. Afterwards
//! every privileged setter takes an explicit [`Caller`](caller::Caller) and
//! is checked by the [`AuthorizationGate`](permission::AuthorizationGate).
//!
//! ```no_run
//! use jnlp_runtime::caller::Caller;
//! use jnlp_runtime::runtime::RuntimeBuilder;
//!
//! let launcher = Caller::new("launcher");
//! let runtime = RuntimeBuilder::new().build();
//! runtime.set_headless(&launcher, true)?;
//! runtime.set_exit_authority(&launcher, launcher.clone())?;
//! runtime.bootstrap(true)?;
//! assert!(runtime.is_initialized());
//! # Ok::<(), jnlp_runtime::error::RuntimeError>(())
//! ```

pub mod caller;
pub mod cli;
pub mod config;
pub mod dialog;
pub mod env;
pub mod error;
pub mod logging;
pub mod messages;
pub mod output_diagnostic;
pub mod permission;
pub mod runtime;
pub mod security;
