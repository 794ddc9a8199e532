// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::config::{KEY_PROXY_HTTP_HOST, KEY_PROXY_TYPE};
use crate::dialog::DenyingRenderer;
use crate::permission::SecurityError;
use crate::security::network::{Destination, ProxyChoice};
use crate::security::trust::TransportError;
use tempfile::TempDir;

struct FailingTransport;

impl SecureTransport for FailingTransport {
    fn install(&self, _verifier: Arc<VariableTrustVerifier>) -> Result<(), TransportError> {
        Err(TransportError::Unavailable("no socket factory".to_string()))
    }
}

struct Fixture {
    authority: Arc<ExitAuthority>,
    exit: Arc<ExitSwitch>,
    dialogs: Arc<SecurityDialogDispatcher>,
    config: DeploymentConfig,
    localizer: Localizer,
}

impl Fixture {
    fn new() -> Self {
        Self {
            authority: Arc::new(ExitAuthority::new()),
            exit: Arc::new(ExitSwitch::new()),
            dialogs: Arc::new(SecurityDialogDispatcher::start(Arc::new(DenyingRenderer)).unwrap()),
            config: DeploymentConfig::new(),
            localizer: Localizer::default(),
        }
    }

    fn ctx(&self) -> InstallContext<'_> {
        InstallContext {
            authority: Arc::clone(&self.authority),
            exit: Arc::clone(&self.exit),
            dialogs: Arc::clone(&self.dialogs),
            config: &self.config,
            localizer: &self.localizer,
            trust_store: None,
        }
    }
}

#[test]
fn steps_run_in_order() {
    let fixture = Fixture::new();
    let installation = SecuritySubsystemInstaller::new(Caller::new("system"))
        .install(fixture.ctx())
        .unwrap();

    assert_eq!(
        installation.completed,
        vec![
            InstallStep::Policy,
            InstallStep::Hook,
            InstallStep::TrustVerifier,
            InstallStep::NetworkResolvers,
        ]
    );
    assert!(installation.warnings.is_empty());
    assert!(installation.client_config.is_some());
}

#[test]
fn system_caller_holds_all_permissions() {
    let fixture = Fixture::new();
    let system = Caller::new("system");
    let installation = SecuritySubsystemInstaller::new(system.clone())
        .install(fixture.ctx())
        .unwrap();

    assert!(installation
        .hook
        .check_permission(&system, &Permission::AccessSecurityDialogs)
        .is_ok());
    assert!(installation
        .hook
        .check_permission(&Caller::new("applet"), &Permission::ExitProcess)
        .is_err());
}

#[test]
fn hook_shares_exit_authority_and_switch() {
    let fixture = Fixture::new();
    let launcher = Caller::new("launcher");
    let installation = SecuritySubsystemInstaller::new(Caller::new("system"))
        .install(fixture.ctx())
        .unwrap();

    fixture.authority.set(launcher.clone());
    assert!(installation.hook.check_exit(&launcher).is_ok());

    fixture.exit.disable();
    assert_eq!(
        installation.hook.check_exit(&launcher).unwrap_err(),
        SecurityError::ExitDisabled
    );
}

#[test]
fn trust_failure_is_a_warning() {
    let fixture = Fixture::new();
    let installation = SecuritySubsystemInstaller::new(Caller::new("system"))
        .with_transport(Arc::new(FailingTransport))
        .install(fixture.ctx())
        .unwrap();

    assert_eq!(installation.warnings.len(), 1);
    let warning = &installation.warnings[0];
    assert_eq!(warning.step, InstallStep::TrustVerifier);
    assert!(warning.cause.contains("no socket factory"));
    assert!(warning.message.contains("trust verifier"));
    assert!(installation.client_config.is_none());
    assert_eq!(
        installation.completed,
        vec![
            InstallStep::Policy,
            InstallStep::Hook,
            InstallStep::NetworkResolvers,
        ]
    );
}

#[test]
fn supplied_policy_without_system_grant_aborts() {
    let fixture = Fixture::new();
    let result = SecuritySubsystemInstaller::new(Caller::new("system"))
        .with_policy(Arc::new(PermissionPolicy::new()))
        .install(fixture.ctx());

    assert!(matches!(result, Err(RuntimeError::Installation(_))));
}

#[test]
fn supplied_policy_is_used() {
    let fixture = Fixture::new();
    let system = Caller::new("system");
    let applet = Caller::new("applet");
    let policy = Arc::new(PermissionPolicy::new());
    policy.grant(&system, Permission::ModifyRuntime);
    policy.grant(&applet, Permission::AccessSecurityDialogs);

    let installation = SecuritySubsystemInstaller::new(system)
        .with_policy(Arc::clone(&policy))
        .install(fixture.ctx())
        .unwrap();

    assert!(Arc::ptr_eq(&installation.policy, &policy));
    assert!(installation
        .hook
        .check_permission(&applet, &Permission::AccessSecurityDialogs)
        .is_ok());
}

#[test]
fn proxy_resolver_reads_deployment_config() {
    let mut fixture = Fixture::new();
    fixture.config = DeploymentConfig::new()
        .with(KEY_PROXY_TYPE, 1)
        .with(KEY_PROXY_HTTP_HOST, "proxy.corp");

    let installation = SecuritySubsystemInstaller::new(Caller::new("system"))
        .install(fixture.ctx())
        .unwrap();

    let destination = Destination::parse("http://example.com/").unwrap();
    assert_eq!(
        installation.proxy.select(&destination),
        ProxyChoice::Http {
            host: "proxy.corp".to_string(),
            port: 80,
        }
    );
}

#[test]
fn trusted_certificates_are_shared_with_verifier() {
    let fixture = Fixture::new();
    let trusted = Arc::new(TrustedCertificates::new());
    let installation = SecuritySubsystemInstaller::new(Caller::new("system"))
        .with_trusted_certificates(Arc::clone(&trusted))
        .install(fixture.ctx())
        .unwrap();

    trusted.add_certificate(b"leaf");
    assert!(installation.trust.trusted().is_pinned(b"leaf"));
}

#[test]
fn pinned_certificates_load_from_trust_store() {
    let fixture = Fixture::new();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trusted.json");
    let pinned = TrustedCertificates::new();
    pinned.add_certificate(b"leaf");
    pinned.save(&path).unwrap();

    let mut ctx = fixture.ctx();
    ctx.trust_store = Some(&path);
    let installation = SecuritySubsystemInstaller::new(Caller::new("system"))
        .install(ctx)
        .unwrap();

    assert!(installation.trust.trusted().is_pinned(b"leaf"));
    assert!(installation.warnings.is_empty());
}

#[test]
fn corrupt_trust_store_is_a_warning() {
    let fixture = Fixture::new();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trusted.json");
    std::fs::write(&path, "[ not json").unwrap();

    let mut ctx = fixture.ctx();
    ctx.trust_store = Some(&path);
    let installation = SecuritySubsystemInstaller::new(Caller::new("system"))
        .install(ctx)
        .unwrap();

    assert_eq!(installation.warnings.len(), 1);
    assert_eq!(installation.warnings[0].step, InstallStep::TrustVerifier);
    assert!(!installation.completed.contains(&InstallStep::TrustVerifier));
}
