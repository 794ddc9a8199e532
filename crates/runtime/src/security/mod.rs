// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Security layer: installer, trust verification, network resolution.

pub mod installer;
pub mod network;
pub mod trust;

pub use installer::{
    InstallContext, InstallStep, InstallationWarning, SecurityInstallation,
    SecuritySubsystemInstaller,
};
pub use network::{
    AuthChallenge, ConfigProxyResolver, CredentialResolver, Credentials, Destination,
    PromptingCredentialResolver, ProxyChoice, ProxyMode, ProxyResolver,
};
pub use trust::{
    RustlsTransport, SecureTransport, TransportError, TrustedCertificates, VariableTrustVerifier,
};
