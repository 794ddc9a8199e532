// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command line of the `jnlp-boot` binary.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::caller::Caller;
use crate::error::RuntimeError;
use crate::runtime::{Runtime, UpdatePolicy};

/// Bootstrap the launcher runtime and report its state
#[derive(Parser, Debug, Clone)]
#[command(name = "jnlp-boot", version, about = "Bootstrap the launcher runtime")]
pub struct Cli {
    /// Run without any windowing (no prompts, no download indicator)
    #[arg(long)]
    pub headless: bool,

    /// Disable the security layer
    #[arg(long)]
    pub nosecurity: bool,

    /// Do not verify signatures
    #[arg(long)]
    pub noverify: bool,

    /// Do not allow launching a separate process
    #[arg(long)]
    pub nofork: bool,

    /// Redirect standard streams into the launcher console
    #[arg(long)]
    pub redirect_streams: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Base directory for cache and settings
    #[arg(long, value_name = "DIR")]
    pub basedir: Option<PathBuf>,

    /// Deployment configuration file
    #[arg(long, value_name = "FILE", env = "JNLP_DEPLOYMENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run embedded: configuration errors are not fatal
    #[arg(long)]
    pub applet: bool,

    /// Update policy for cached resources
    #[arg(long, value_enum, default_value = "always")]
    pub update_policy: UpdatePolicy,

    /// Output format for the state report
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Arguments passed on to the application
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Output format of the state report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Whether bootstrap runs in full-application mode.
    pub fn is_application(&self) -> bool {
        !self.applet
    }

    /// Apply the command line to a runtime that has not been bootstrapped,
    /// making `launcher` the exit authority.
    pub fn apply(&self, runtime: &Runtime, launcher: &Caller) -> Result<(), RuntimeError> {
        runtime.set_headless(launcher, self.headless)?;
        runtime.set_security_enabled(launcher, !self.nosecurity)?;
        runtime.set_verify_signatures(launcher, !self.noverify)?;
        runtime.set_forks_allowed(launcher, !self.nofork)?;
        runtime.set_redirect_streams(launcher, self.redirect_streams)?;
        if let Some(dir) = &self.basedir {
            runtime.set_base_directory(launcher, dir.clone())?;
        }
        runtime.set_debug(launcher, self.debug)?;
        runtime.set_update_policy(launcher, self.update_policy)?;
        if !self.args.is_empty() {
            runtime.set_initial_arguments(launcher, self.args.clone())?;
        }
        runtime.set_exit_authority(launcher, launcher.clone())
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
