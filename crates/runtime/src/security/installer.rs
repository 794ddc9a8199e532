// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot installation of the security layer.
//!
//! Steps run in a fixed order:
//!
//! 1. permission policy
//! 2. authorization hook (refuses to install without the policy)
//! 3. trust verifier, handed to the secure transport
//! 4. credential and proxy resolvers
//!
//! A failure in step 3 is reported as an [`InstallationWarning`] and the
//! installation continues without the custom verifier. Any other failure
//! aborts the installation.

use rustls::crypto::CryptoProvider;
use rustls::ClientConfig;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::network::{
    ConfigProxyResolver, CredentialResolver, PromptingCredentialResolver, ProxyResolver,
};
use super::trust::{
    default_provider, RustlsTransport, SecureTransport, TransportError, TrustedCertificates,
    VariableTrustVerifier,
};
use crate::caller::Caller;
use crate::config::DeploymentConfig;
use crate::dialog::SecurityDialogDispatcher;
use crate::error::RuntimeError;
use crate::messages::{Localizer, TRUST_INSTALL_FAILED};
use crate::permission::{
    AuthorizationHook, ExitAuthority, ExitSwitch, Permission, PermissionPolicy, SecurityError,
};

/// Installation steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStep {
    Policy,
    Hook,
    TrustVerifier,
    NetworkResolvers,
}

/// A non-fatal installation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationWarning {
    pub step: InstallStep,
    /// Localized text shown to the user.
    pub message: String,
    /// Underlying error.
    pub cause: String,
}

impl fmt::Display for InstallationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.cause)
    }
}

/// The installed security layer. Created once, never replaced.
pub struct SecurityInstallation {
    pub policy: Arc<PermissionPolicy>,
    pub hook: Arc<AuthorizationHook>,
    pub trust: Arc<VariableTrustVerifier>,
    /// Client configuration from the secure transport, when installed.
    pub client_config: Option<Arc<ClientConfig>>,
    pub credentials: Arc<dyn CredentialResolver>,
    pub proxy: Arc<dyn ProxyResolver>,
    pub completed: Vec<InstallStep>,
    pub warnings: Vec<InstallationWarning>,
}

impl fmt::Debug for SecurityInstallation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityInstallation")
            .field("completed", &self.completed)
            .field("warnings", &self.warnings)
            .field("client_config", &self.client_config.is_some())
            .finish_non_exhaustive()
    }
}

/// Runtime handles the installer wires into the security layer.
pub struct InstallContext<'a> {
    pub authority: Arc<ExitAuthority>,
    pub exit: Arc<ExitSwitch>,
    pub dialogs: Arc<SecurityDialogDispatcher>,
    pub config: &'a DeploymentConfig,
    pub localizer: &'a Localizer,
    /// File of pinned certificate fingerprints to load into the trusted set.
    pub trust_store: Option<&'a Path>,
}

/// Installs the security layer.
pub struct SecuritySubsystemInstaller {
    system: Caller,
    policy: Option<Arc<PermissionPolicy>>,
    trusted: Arc<TrustedCertificates>,
    transport: Arc<dyn SecureTransport>,
    provider: Arc<CryptoProvider>,
    credentials: Option<Arc<dyn CredentialResolver>>,
    proxy: Option<Arc<dyn ProxyResolver>>,
}

impl SecuritySubsystemInstaller {
    /// Installer acting as `system`.
    ///
    /// Unless a policy is supplied, a fresh policy granting `system` every
    /// permission is installed.
    pub fn new(system: Caller) -> Self {
        Self {
            system,
            policy: None,
            trusted: Arc::new(TrustedCertificates::new()),
            transport: Arc::new(RustlsTransport::new()),
            provider: default_provider(),
            credentials: None,
            proxy: None,
        }
    }

    /// Use an existing policy. It must already let the system caller
    /// modify the runtime.
    pub fn with_policy(mut self, policy: Arc<PermissionPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_trusted_certificates(mut self, trusted: Arc<TrustedCertificates>) -> Self {
        self.trusted = trusted;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn SecureTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_credential_resolver(mut self, resolver: Arc<dyn CredentialResolver>) -> Self {
        self.credentials = Some(resolver);
        self
    }

    pub fn with_proxy_resolver(mut self, resolver: Arc<dyn ProxyResolver>) -> Self {
        self.proxy = Some(resolver);
        self
    }

    pub fn system(&self) -> &Caller {
        &self.system
    }

    /// Check `permission` for `caller` before the layer is installed.
    ///
    /// Answers from the supplied policy when there is one, otherwise only
    /// the system caller passes.
    pub fn check_pending(
        &self,
        caller: &Caller,
        permission: &Permission,
    ) -> Result<(), SecurityError> {
        let granted = match &self.policy {
            Some(policy) => policy.implies(caller, permission),
            None => caller == &self.system,
        };
        if granted {
            Ok(())
        } else {
            Err(SecurityError::Denied {
                caller: caller.to_string(),
                permission: permission.to_string(),
            })
        }
    }

    /// Run every installation step.
    pub fn install(&self, ctx: InstallContext<'_>) -> Result<SecurityInstallation, RuntimeError> {
        let mut completed = Vec::with_capacity(4);
        let mut warnings = Vec::new();

        // 1. Policy
        let policy = match &self.policy {
            Some(policy) => Arc::clone(policy),
            None => {
                let policy = Arc::new(PermissionPolicy::new());
                policy.grant(&self.system, Permission::All);
                policy
            }
        };
        completed.push(InstallStep::Policy);
        tracing::debug!("permission policy installed");

        // 2. Hook
        let hook = AuthorizationHook::install(
            Some(Arc::clone(&policy)),
            &self.system,
            ctx.authority,
            ctx.exit,
        )
        .map_err(|e| RuntimeError::Installation(e.to_string()))?;
        completed.push(InstallStep::Hook);

        // 3. Trust verifier (fail-open)
        let trust = Arc::new(VariableTrustVerifier::new(
            Arc::clone(&self.trusted),
            Arc::clone(&self.provider),
        ));
        let installed = self
            .load_trust_store(ctx.trust_store)
            .and_then(|()| self.transport.install(Arc::clone(&trust)));
        let client_config = match installed {
            Ok(()) => {
                completed.push(InstallStep::TrustVerifier);
                tracing::debug!("trust verifier installed");
                self.transport.client_config()
            }
            Err(e) => {
                let warning = InstallationWarning {
                    step: InstallStep::TrustVerifier,
                    message: ctx
                        .localizer
                        .message(TRUST_INSTALL_FAILED)
                        .unwrap_or_default(),
                    cause: e.to_string(),
                };
                tracing::warn!(error = %e, "trust verifier not installed, continuing");
                warnings.push(warning);
                None
            }
        };

        // 4. Network resolvers
        let credentials: Arc<dyn CredentialResolver> = match &self.credentials {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(PromptingCredentialResolver::new(
                Arc::clone(&ctx.dialogs),
                ctx.localizer.clone(),
                &self.system,
            )),
        };
        let proxy: Arc<dyn ProxyResolver> = match &self.proxy {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(ConfigProxyResolver::from_config(ctx.config)),
        };
        completed.push(InstallStep::NetworkResolvers);
        tracing::debug!("credential and proxy resolvers installed");

        Ok(SecurityInstallation {
            policy,
            hook: Arc::new(hook),
            trust,
            client_config,
            credentials,
            proxy,
            completed,
            warnings,
        })
    }
}

impl SecuritySubsystemInstaller {
    fn load_trust_store(&self, path: Option<&Path>) -> Result<(), TransportError> {
        if let Some(path) = path {
            let count = self.trusted.load_from(path)?;
            tracing::debug!(path = %path.display(), count, "loaded pinned certificates");
        }
        Ok(())
    }
}

impl fmt::Debug for SecuritySubsystemInstaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecuritySubsystemInstaller")
            .field("system", &self.system)
            .field("custom_policy", &self.policy.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "installer_tests.rs"]
mod tests;
