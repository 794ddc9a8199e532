// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Trusted certificates and the TLS server certificate verifier over them.
//!
//! The trusted set is mutable after installation: certificates accepted by
//! the user later are honoured by connections opened afterwards.

use parking_lot::RwLock;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{
    CertificateError, ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("TLS configuration failed: {0}")]
    Tls(#[from] rustls::Error),

    #[error("secure transport unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read trusted certificates from {path}: {message}")]
    Store { path: String, message: String },
}

/// Lowercase hex SHA-256 of a DER certificate.
pub fn fingerprint(der: &[u8]) -> String {
    hex::encode(Sha256::digest(der))
}

fn normalize_fingerprint(fingerprint: &str) -> String {
    fingerprint
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .collect::<String>()
        .to_ascii_lowercase()
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCertificates {
    #[serde(default)]
    fingerprints: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct TrustedInner {
    fingerprints: BTreeSet<String>,
    roots: Vec<CertificateDer<'static>>,
}

/// Mutable set of trusted certificates.
///
/// Holds pinned leaf fingerprints and CA roots. Shared by handle with the
/// verifier.
#[derive(Debug, Default)]
pub struct TrustedCertificates {
    inner: RwLock<TrustedInner>,
}

impl TrustedCertificates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load pinned fingerprints from a JSON file. A missing file is an
    /// empty set.
    pub fn load(path: &Path) -> Result<Self, TransportError> {
        let trusted = Self::new();
        trusted.load_from(path)?;
        Ok(trusted)
    }

    /// Add the fingerprints pinned in a JSON file, returning how many were
    /// read. A missing file adds nothing.
    pub fn load_from(&self, path: &Path) -> Result<usize, TransportError> {
        let store_error = |message: String| TransportError::Store {
            path: path.display().to_string(),
            message,
        };
        if !path.exists() {
            return Ok(0);
        }
        let content = std::fs::read_to_string(path).map_err(|e| store_error(e.to_string()))?;
        let stored: StoredCertificates =
            serde_json::from_str(&content).map_err(|e| store_error(e.to_string()))?;
        for fp in &stored.fingerprints {
            self.add_fingerprint(fp);
        }
        Ok(stored.fingerprints.len())
    }

    /// Write pinned fingerprints as JSON.
    pub fn save(&self, path: &Path) -> Result<(), TransportError> {
        let store_error = |message: String| TransportError::Store {
            path: path.display().to_string(),
            message,
        };
        let stored = StoredCertificates {
            fingerprints: self.inner.read().fingerprints.clone(),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(|e| store_error(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| store_error(e.to_string()))?;
        }
        std::fs::write(path, json).map_err(|e| store_error(e.to_string()))
    }

    /// Pin a fingerprint (hex, separators ignored).
    pub fn add_fingerprint(&self, fingerprint: &str) {
        self.inner
            .write()
            .fingerprints
            .insert(normalize_fingerprint(fingerprint));
    }

    /// Pin a leaf certificate.
    pub fn add_certificate(&self, der: &[u8]) {
        self.inner.write().fingerprints.insert(fingerprint(der));
    }

    pub fn remove_fingerprint(&self, fingerprint: &str) -> bool {
        self.inner
            .write()
            .fingerprints
            .remove(&normalize_fingerprint(fingerprint))
    }

    /// Add a CA root. Rejected if it does not parse as a trust anchor.
    pub fn add_root(&self, der: CertificateDer<'static>) -> Result<(), TransportError> {
        let mut scratch = RootCertStore::empty();
        scratch.add(der.clone())?;
        self.inner.write().roots.push(der);
        Ok(())
    }

    pub fn is_pinned(&self, der: &[u8]) -> bool {
        self.inner.read().fingerprints.contains(&fingerprint(der))
    }

    pub fn pinned_count(&self) -> usize {
        self.inner.read().fingerprints.len()
    }

    fn root_store(&self) -> RootCertStore {
        let mut store = RootCertStore::empty();
        for root in &self.inner.read().roots {
            // Roots were validated on insertion.
            let _ = store.add(root.clone());
        }
        store
    }
}

/// Server certificate verifier over a [`TrustedCertificates`] set.
///
/// A pinned leaf is accepted outright. Otherwise the chain is checked by a
/// WebPKI verifier built from the current CA roots; with no roots the
/// certificate is rejected as an unknown issuer.
#[derive(Debug)]
pub struct VariableTrustVerifier {
    trusted: Arc<TrustedCertificates>,
    provider: Arc<CryptoProvider>,
}

impl VariableTrustVerifier {
    pub fn new(trusted: Arc<TrustedCertificates>, provider: Arc<CryptoProvider>) -> Self {
        Self { trusted, provider }
    }

    pub fn trusted(&self) -> &Arc<TrustedCertificates> {
        &self.trusted
    }

    pub fn provider(&self) -> &Arc<CryptoProvider> {
        &self.provider
    }
}

impl ServerCertVerifier for VariableTrustVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        if self.trusted.is_pinned(end_entity) {
            tracing::debug!(server = ?server_name, "accepted pinned certificate");
            return Ok(ServerCertVerified::assertion());
        }
        let roots = self.trusted.root_store();
        if roots.is_empty() {
            return Err(rustls::Error::InvalidCertificate(
                CertificateError::UnknownIssuer,
            ));
        }
        let webpki =
            WebPkiServerVerifier::builder_with_provider(Arc::new(roots), self.provider.clone())
                .build()
                .map_err(|e| rustls::Error::General(e.to_string()))?;
        webpki.verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// Process default for secure socket creation.
pub trait SecureTransport: Send + Sync {
    /// Make `verifier` the default for new secure connections.
    fn install(&self, verifier: Arc<VariableTrustVerifier>) -> Result<(), TransportError>;

    /// The installed client configuration, if this transport builds one.
    fn client_config(&self) -> Option<Arc<ClientConfig>> {
        None
    }
}

/// `rustls` client configuration built around the installed verifier.
#[derive(Debug, Default)]
pub struct RustlsTransport {
    config: RwLock<Option<Arc<ClientConfig>>>,
}

impl RustlsTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureTransport for RustlsTransport {
    fn install(&self, verifier: Arc<VariableTrustVerifier>) -> Result<(), TransportError> {
        let config = ClientConfig::builder_with_provider(verifier.provider().clone())
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_no_client_auth();
        *self.config.write() = Some(Arc::new(config));
        Ok(())
    }

    fn client_config(&self) -> Option<Arc<ClientConfig>> {
        self.config.read().clone()
    }
}

/// Crypto provider used by the runtime.
pub fn default_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

#[cfg(test)]
#[path = "trust_tests.rs"]
mod tests;
