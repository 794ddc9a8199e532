// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::config::{DeploymentConfig, MemoryConfigStore};
use crate::messages::CONFIGURATION_ERROR;
use crate::security::{Destination, ProxyChoice};
use std::collections::HashMap;

struct FixedMessages(HashMap<&'static str, &'static str>);

impl Messages for FixedMessages {
    fn lookup(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|s| s.to_string())
    }
}

struct AlwaysDirect;

impl ProxyResolver for AlwaysDirect {
    fn select(&self, _destination: &Destination) -> ProxyChoice {
        ProxyChoice::Direct
    }
}

fn builder() -> RuntimeBuilder {
    RuntimeBuilder::new()
        .with_config_store(Arc::new(MemoryConfigStore::new(DeploymentConfig::new())))
        .with_home(Some(PathBuf::from("/nonexistent-home")))
        .with_env_headless(true)
}

#[test]
fn built_runtime_starts_uninitialized() {
    let runtime = builder().build();
    assert!(!runtime.is_initialized());
    assert!(runtime.is_security_enabled());
    assert!(runtime.is_verifying());
    assert!(runtime.forks_allowed());
}

#[test]
fn custom_messages_are_used() {
    let messages = FixedMessages([(CONFIGURATION_ERROR, "Konfigurationsfehler")].into());
    let runtime = builder().with_messages(Arc::new(messages)).build();
    assert_eq!(
        runtime.localizer().message(CONFIGURATION_ERROR).as_deref(),
        Some("Konfigurationsfehler")
    );
}

#[test]
fn custom_proxy_resolver_is_installed() {
    let base = tempfile::TempDir::new().unwrap();
    let runtime = builder().with_proxy_resolver(Arc::new(AlwaysDirect)).build();
    runtime
        .set_base_directory(&Caller::new("launcher"), base.path().to_path_buf())
        .unwrap();
    runtime.bootstrap(false).unwrap();

    let destination = Destination::parse("http://example.com/").unwrap();
    assert_eq!(
        runtime.security().unwrap().proxy.select(&destination),
        ProxyChoice::Direct
    );
}

#[test]
fn shared_trusted_certificates_reach_verifier() {
    let base = tempfile::TempDir::new().unwrap();
    let trusted = Arc::new(TrustedCertificates::new());
    let runtime = builder()
        .with_trusted_certificates(Arc::clone(&trusted))
        .build();
    runtime
        .set_base_directory(&Caller::new("launcher"), base.path().to_path_buf())
        .unwrap();
    runtime.bootstrap(false).unwrap();

    trusted.add_certificate(b"accepted later");
    assert!(runtime
        .security()
        .unwrap()
        .trust
        .trusted()
        .is_pinned(b"accepted later"));
}
