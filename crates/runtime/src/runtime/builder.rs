// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! RuntimeBuilder for constructing Runtime with fluent API.

use std::path::PathBuf;
use std::sync::Arc;

use super::core::{Runtime, RuntimeParts};
use super::host::{NoopStreamRedirector, ProcessTerminator, StreamRedirector, Terminator};
use super::strategies::IconSource;
use crate::caller::Caller;
use crate::config::{ConfigStore, FileConfigStore};
use crate::dialog::{DenyingRenderer, PromptRenderer};
use crate::env;
use crate::messages::{Localizer, Messages};
use crate::permission::PermissionPolicy;
use crate::security::{
    CredentialResolver, ProxyResolver, SecureTransport, SecuritySubsystemInstaller,
    TrustedCertificates,
};

/// Builder for constructing Runtime instances.
///
/// Every collaborator has a default, so `RuntimeBuilder::new().build()`
/// yields a runtime reading `deployment.json` from the usual location:
/// ```ignore
/// let runtime = RuntimeBuilder::new()
///     .with_config_store(Arc::new(MemoryConfigStore::default()))
///     .with_renderer(Arc::new(my_renderer))
///     .build();
/// ```
pub struct RuntimeBuilder {
    config_store: Option<Arc<dyn ConfigStore>>,
    messages: Option<Arc<dyn Messages>>,
    renderer: Arc<dyn PromptRenderer>,
    redirector: Arc<dyn StreamRedirector>,
    terminator: Arc<dyn Terminator>,
    icon_source: Option<Arc<dyn IconSource>>,
    system: Caller,
    policy: Option<Arc<PermissionPolicy>>,
    trusted: Option<Arc<TrustedCertificates>>,
    transport: Option<Arc<dyn SecureTransport>>,
    credentials: Option<Arc<dyn CredentialResolver>>,
    proxy: Option<Arc<dyn ProxyResolver>>,
    home: Option<PathBuf>,
    env_headless: bool,
}

impl RuntimeBuilder {
    /// Builder with production defaults read from the environment.
    pub fn new() -> Self {
        Self {
            config_store: None,
            messages: None,
            renderer: Arc::new(DenyingRenderer),
            redirector: Arc::new(NoopStreamRedirector),
            terminator: Arc::new(ProcessTerminator),
            icon_source: None,
            system: Caller::new("jnlp-runtime"),
            policy: None,
            trusted: None,
            transport: None,
            credentials: None,
            proxy: None,
            home: env::home(),
            env_headless: env::headless(),
        }
    }

    pub fn with_config_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn with_messages(mut self, messages: Arc<dyn Messages>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Renderer used by the security dialog worker.
    pub fn with_renderer(mut self, renderer: Arc<dyn PromptRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_stream_redirector(mut self, redirector: Arc<dyn StreamRedirector>) -> Self {
        self.redirector = redirector;
        self
    }

    pub fn with_terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Source of the default window icon, loaded when not headless.
    pub fn with_icon_source(mut self, source: Arc<dyn IconSource>) -> Self {
        self.icon_source = Some(source);
        self
    }

    /// Home directory used to derive the default base directory.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Override headless detection from the environment.
    pub fn with_env_headless(mut self, headless: bool) -> Self {
        self.env_headless = headless;
        self
    }

    pub fn with_policy(mut self, policy: Arc<PermissionPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_trusted_certificates(mut self, trusted: Arc<TrustedCertificates>) -> Self {
        self.trusted = Some(trusted);
        self
    }

    pub fn with_secure_transport(mut self, transport: Arc<dyn SecureTransport>) -> Self {
        self.transport = Some(transport);
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

    /// Act as `system` when installing the security layer. `system` holds
    /// every permission in the default policy.
    pub fn with_system_caller(mut self, system: Caller) -> Self {
        self.system = system;
        self
    }

    pub fn build(self) -> Runtime {
        let config_store: Arc<dyn ConfigStore> = match self.config_store {
            Some(store) => store,
            None => Arc::new(FileConfigStore::resolve()),
        };
        let localizer = self.messages.map(Localizer::new).unwrap_or_default();

        let mut installer = SecuritySubsystemInstaller::new(self.system);
        if let Some(policy) = self.policy {
            installer = installer.with_policy(policy);
        }
        if let Some(trusted) = self.trusted {
            installer = installer.with_trusted_certificates(trusted);
        }
        if let Some(transport) = self.transport {
            installer = installer.with_transport(transport);
        }
        if let Some(resolver) = self.credentials {
            installer = installer.with_credential_resolver(resolver);
        }
        if let Some(resolver) = self.proxy {
            installer = installer.with_proxy_resolver(resolver);
        }

        Runtime::new(RuntimeParts {
            config_store,
            localizer,
            renderer: self.renderer,
            redirector: self.redirector,
            terminator: self.terminator,
            icon_source: self.icon_source,
            installer,
            home: self.home,
            env_headless: self.env_headless,
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
