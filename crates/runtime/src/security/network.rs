// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network credential and proxy resolution.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use crate::config::{
    DeploymentConfig, KEY_PROXY_BYPASS_LIST, KEY_PROXY_BYPASS_LOCAL, KEY_PROXY_HTTPS_HOST,
    KEY_PROXY_HTTPS_PORT, KEY_PROXY_HTTP_HOST, KEY_PROXY_HTTP_PORT, KEY_PROXY_SAME,
    KEY_PROXY_TYPE,
};
use crate::dialog::{Decision, PromptRequest, SecurityDialogDispatcher};
use crate::messages::{Localizer, AUTHENTICATION_PROMPT};

/// Port used when a proxy host is configured without one.
pub const DEFAULT_PROXY_PORT: u16 = 80;

/// An authentication challenge from a server or proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub realm: String,
}

/// Username and password for a challenge.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Answers authentication challenges.
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, challenge: &AuthChallenge) -> Option<Credentials>;
}

/// Asks the user through the security dialog worker.
#[derive(Debug)]
pub struct PromptingCredentialResolver {
    dialogs: Arc<SecurityDialogDispatcher>,
    localizer: Localizer,
    caller: String,
}

impl PromptingCredentialResolver {
    pub fn new(
        dialogs: Arc<SecurityDialogDispatcher>,
        localizer: Localizer,
        caller: impl fmt::Display,
    ) -> Self {
        Self {
            dialogs,
            localizer,
            caller: caller.to_string(),
        }
    }
}

impl CredentialResolver for PromptingCredentialResolver {
    fn resolve(&self, challenge: &AuthChallenge) -> Option<Credentials> {
        let subject = self.localizer.message_with(
            AUTHENTICATION_PROMPT,
            &[&challenge.scheme, &challenge.host, &challenge.realm],
        );
        let request = PromptRequest::credentials(
            subject,
            &self.caller,
            &challenge.scheme,
            &challenge.host,
            &challenge.realm,
        );
        match self.dialogs.submit(request) {
            Decision::Credentials { username, password } => {
                Some(Credentials { username, password })
            }
            _ => {
                tracing::debug!(host = %challenge.host, "authentication declined");
                None
            }
        }
    }
}

/// Where a connection is going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl Destination {
    /// Parse `scheme://host[:port][/path]`. IPv6 hosts use brackets.
    pub fn parse(uri: &str) -> Option<Self> {
        let (scheme, rest) = uri.split_once("://")?;
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let authority = authority.rsplit('@').next().unwrap_or(authority);
        if scheme.is_empty() || authority.is_empty() {
            return None;
        }

        let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
            let (host, tail) = bracketed.split_once(']')?;
            let port = match tail.strip_prefix(':') {
                Some(port) => Some(port.parse().ok()?),
                None => None,
            };
            (host, port)
        } else {
            // IPv6 literals must be bracketed.
            if authority.matches(':').count() > 1 {
                return None;
            }
            match authority.rsplit_once(':') {
                Some((host, port)) => (host, Some(port.parse().ok()?)),
                None => (authority, None),
            }
        };

        Some(Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            port,
        })
    }

    /// Whether the host is the local machine or a bare intranet name.
    pub fn is_local(&self) -> bool {
        if self.host == "localhost" {
            return true;
        }
        match self.host.parse::<IpAddr>() {
            Ok(ip) => ip.is_loopback(),
            Err(_) => !self.host.contains('.'),
        }
    }
}

/// Proxy to use for a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyChoice {
    Direct,
    Http { host: String, port: u16 },
}

/// Chooses a proxy per destination.
pub trait ProxyResolver: Send + Sync {
    fn select(&self, destination: &Destination) -> ProxyChoice;
}

/// Configured proxy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    None,
    Manual,
    /// Auto-config scripts are not evaluated; resolves to direct.
    Auto,
    /// Browser settings are not consulted; resolves to direct.
    Browser,
}

impl ProxyMode {
    fn from_code(code: i64) -> Self {
        match code {
            1 => ProxyMode::Manual,
            2 => ProxyMode::Auto,
            3 => ProxyMode::Browser,
            _ => ProxyMode::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProxyEndpoint {
    host: String,
    port: u16,
}

/// Proxy selection from deployment configuration keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigProxyResolver {
    mode: ProxyMode,
    http: Option<ProxyEndpoint>,
    https: Option<ProxyEndpoint>,
    same: bool,
    bypass: Vec<String>,
    bypass_local: bool,
}

impl ConfigProxyResolver {
    pub fn from_config(config: &DeploymentConfig) -> Self {
        let endpoint = |host_key: &str, port_key: &str| {
            config.get_str(host_key).map(|host| ProxyEndpoint {
                host,
                port: config
                    .get_i64(port_key)
                    .and_then(|p| u16::try_from(p).ok())
                    .unwrap_or(DEFAULT_PROXY_PORT),
            })
        };
        let bypass = config
            .get_str(KEY_PROXY_BYPASS_LIST)
            .map(|list| {
                list.split(',')
                    .map(|h| h.trim().to_ascii_lowercase())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            mode: ProxyMode::from_code(config.get_i64(KEY_PROXY_TYPE).unwrap_or(0)),
            http: endpoint(KEY_PROXY_HTTP_HOST, KEY_PROXY_HTTP_PORT),
            https: endpoint(KEY_PROXY_HTTPS_HOST, KEY_PROXY_HTTPS_PORT),
            same: config.get_bool(KEY_PROXY_SAME).unwrap_or(false),
            bypass,
            bypass_local: config.get_bool(KEY_PROXY_BYPASS_LOCAL).unwrap_or(false),
        }
    }

    pub fn mode(&self) -> ProxyMode {
        self.mode
    }

    fn bypassed(&self, destination: &Destination) -> bool {
        (self.bypass_local && destination.is_local())
            || self.bypass.iter().any(|h| *h == destination.host)
    }
}

impl ProxyResolver for ConfigProxyResolver {
    fn select(&self, destination: &Destination) -> ProxyChoice {
        if self.mode != ProxyMode::Manual || self.bypassed(destination) {
            return ProxyChoice::Direct;
        }
        let endpoint = match destination.scheme.as_str() {
            "http" => self.http.as_ref(),
            "https" if self.same => self.http.as_ref(),
            "https" => self.https.as_ref(),
            _ if self.same => self.http.as_ref(),
            _ => None,
        };
        match endpoint {
            Some(ProxyEndpoint { host, port }) => ProxyChoice::Http {
                host: host.clone(),
                port: *port,
            },
            None => ProxyChoice::Direct,
        }
    }
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
