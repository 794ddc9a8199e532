// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Printable snapshot of a runtime.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::core::Runtime;
use super::state::Lifecycle;
use super::strategies::UpdatePolicy;
use crate::security::InstallStep;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecuritySummary {
    pub installed: Vec<String>,
    pub warnings: Vec<String>,
    pub tls_configured: bool,
}

/// Runtime state as reported by the `jnlp-boot` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeSummary {
    pub lifecycle: Lifecycle,
    pub is_application: bool,
    pub base_directory: Option<PathBuf>,
    pub headless: bool,
    pub security_enabled: bool,
    pub verify_signatures: bool,
    pub debug: bool,
    pub redirect_streams: bool,
    pub forks_allowed: bool,
    pub update_policy: UpdatePolicy,
    pub initial_arguments: Vec<String>,
    pub exit_authority: Option<String>,
    pub exit_disabled: bool,
    pub security: Option<SecuritySummary>,
}

fn step_name(step: InstallStep) -> &'static str {
    match step {
        InstallStep::Policy => "policy",
        InstallStep::Hook => "hook",
        InstallStep::TrustVerifier => "trust-verifier",
        InstallStep::NetworkResolvers => "network-resolvers",
    }
}

impl RuntimeSummary {
    pub fn collect(runtime: &Runtime) -> Self {
        let settings = runtime.settings();
        let security = runtime.security().map(|s| SecuritySummary {
            installed: s.completed.iter().map(|step| step_name(*step).to_string()).collect(),
            warnings: s.warnings.iter().map(ToString::to_string).collect(),
            tls_configured: s.client_config.is_some(),
        });
        Self {
            lifecycle: runtime.lifecycle(),
            is_application: settings.is_application,
            base_directory: settings.base_directory,
            headless: settings.headless,
            security_enabled: settings.security_enabled,
            verify_signatures: settings.verify_signatures,
            debug: settings.debug,
            redirect_streams: settings.redirect_streams,
            forks_allowed: settings.forks_allowed,
            update_policy: settings.update_policy,
            initial_arguments: settings
                .initial_arguments
                .map(|args| args.to_vec())
                .unwrap_or_default(),
            exit_authority: runtime.exit_authority().map(|c| c.to_string()),
            exit_disabled: runtime.is_exit_disabled(),
            security,
        }
    }
}

impl fmt::Display for RuntimeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "lifecycle: {}", self.lifecycle)?;
        writeln!(f, "application: {}", self.is_application)?;
        match &self.base_directory {
            Some(dir) => writeln!(f, "base directory: {}", dir.display())?,
            None => writeln!(f, "base directory: (none)")?,
        }
        writeln!(f, "headless: {}", self.headless)?;
        writeln!(f, "security: {}", self.security_enabled)?;
        writeln!(f, "verify signatures: {}", self.verify_signatures)?;
        writeln!(f, "debug: {}", self.debug)?;
        writeln!(f, "redirect streams: {}", self.redirect_streams)?;
        writeln!(f, "forks allowed: {}", self.forks_allowed)?;
        writeln!(f, "update policy: {}", self.update_policy)?;
        writeln!(f, "arguments: {}", self.initial_arguments.join(" "))?;
        writeln!(
            f,
            "exit authority: {}",
            self.exit_authority.as_deref().unwrap_or("(none)")
        )?;
        if let Some(security) = &self.security {
            writeln!(f, "installed: {}", security.installed.join(", "))?;
            for warning in &security.warnings {
                writeln!(f, "warning: {}", warning)?;
            }
        }
        Ok(())
    }
}
