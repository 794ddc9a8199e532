// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use tempfile::TempDir;

const LEAF: &[u8] = b"not really a certificate, but stable bytes";

fn verifier(trusted: Arc<TrustedCertificates>) -> VariableTrustVerifier {
    VariableTrustVerifier::new(trusted, default_provider())
}

fn verify(verifier: &VariableTrustVerifier, der: &[u8]) -> Result<ServerCertVerified, rustls::Error> {
    let name = ServerName::try_from("example.com").unwrap();
    verifier.verify_server_cert(
        &CertificateDer::from(der.to_vec()),
        &[],
        &name,
        &[],
        UnixTime::now(),
    )
}

#[test]
fn fingerprint_is_lowercase_sha256_hex() {
    let fp = fingerprint(b"");
    assert_eq!(
        fp,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn pinned_certificate_is_accepted() {
    let trusted = Arc::new(TrustedCertificates::new());
    trusted.add_certificate(LEAF);

    assert!(verify(&verifier(trusted), LEAF).is_ok());
}

#[test]
fn fingerprint_separators_and_case_are_ignored() {
    let trusted = Arc::new(TrustedCertificates::new());
    let fp = fingerprint(LEAF).to_uppercase();
    let with_colons: Vec<String> = fp
        .as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8(pair.to_vec()).unwrap())
        .collect();
    trusted.add_fingerprint(&with_colons.join(":"));

    assert!(trusted.is_pinned(LEAF));
}

#[test]
fn unknown_certificate_without_roots_is_rejected() {
    let trusted = Arc::new(TrustedCertificates::new());
    let err = verify(&verifier(trusted), LEAF).unwrap_err();
    assert_eq!(
        err,
        rustls::Error::InvalidCertificate(CertificateError::UnknownIssuer)
    );
}

#[test]
fn trust_changes_apply_after_install() {
    let trusted = Arc::new(TrustedCertificates::new());
    let verifier = verifier(trusted.clone());
    assert!(verify(&verifier, LEAF).is_err());

    trusted.add_certificate(LEAF);
    assert!(verify(&verifier, LEAF).is_ok());

    assert!(trusted.remove_fingerprint(&fingerprint(LEAF)));
    assert!(verify(&verifier, LEAF).is_err());
}

#[test]
fn malformed_root_is_rejected() {
    let trusted = TrustedCertificates::new();
    let result = trusted.add_root(CertificateDer::from(b"garbage".to_vec()));
    assert!(result.is_err());
}

#[test]
fn supported_schemes_come_from_provider() {
    let verifier = verifier(Arc::new(TrustedCertificates::new()));
    assert!(!verifier.supported_verify_schemes().is_empty());
}

#[test]
fn rustls_transport_builds_client_config() {
    let transport = RustlsTransport::new();
    assert!(transport.client_config().is_none());

    let verifier = Arc::new(verifier(Arc::new(TrustedCertificates::new())));
    transport.install(verifier).unwrap();

    assert!(transport.client_config().is_some());
}

#[test]
fn fingerprints_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("security").join("trusted.json");

    let trusted = TrustedCertificates::new();
    trusted.add_certificate(LEAF);
    trusted.save(&path).unwrap();

    let loaded = TrustedCertificates::load(&path).unwrap();
    assert!(loaded.is_pinned(LEAF));
    assert_eq!(loaded.pinned_count(), 1);
}

#[test]
fn missing_store_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let loaded = TrustedCertificates::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded.pinned_count(), 0);
}

#[test]
fn corrupt_store_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trusted.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        TrustedCertificates::load(&path),
        Err(TransportError::Store { .. })
    ));
}
