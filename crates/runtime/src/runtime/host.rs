// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Host process collaborators: termination and console redirection.

use std::io;
use std::path::Path;

/// Ends the host process.
pub trait Terminator: Send + Sync {
    /// Terminate with `status`. Implementations other than the process
    /// terminator may return.
    fn terminate(&self, status: i32);
}

/// Calls [`std::process::exit`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn terminate(&self, status: i32) {
        tracing::info!(status, "terminating process");
        std::process::exit(status);
    }
}

/// Redirects the standard streams into the launcher console and logs.
pub trait StreamRedirector: Send + Sync {
    fn redirect(
        &self,
        redirect: bool,
        logging_enabled: bool,
        log_dir: Option<&Path>,
    ) -> io::Result<()>;
}

/// Leaves the streams alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStreamRedirector;

impl StreamRedirector for NoopStreamRedirector {
    fn redirect(
        &self,
        redirect: bool,
        logging_enabled: bool,
        log_dir: Option<&Path>,
    ) -> io::Result<()> {
        tracing::debug!(redirect, logging_enabled, log_dir = ?log_dir, "stream redirection skipped");
        Ok(())
    }
}
