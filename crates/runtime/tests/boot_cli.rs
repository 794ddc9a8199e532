// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! End-to-end tests of the `jnlp-boot` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use rstest::rstest;
use serde_json::Value;
use tempfile::TempDir;

/// Command isolated from the user's environment: fresh home and config dir.
fn boot(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jnlp-boot").unwrap();
    cmd.env("HOME", home.path())
        .env("JNLP_CONFIG_DIR", home.path().join("config"))
        .env_remove("JNLP_HEADLESS")
        .env_remove("JNLP_DEPLOYMENT_CONFIG")
        .env("JNLP_LOG", "off");
    cmd
}

fn json_report(cmd: &mut Command) -> Value {
    let output = cmd.args(["--output-format", "json"]).output().unwrap();
    assert!(output.status.success(), "jnlp-boot failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_boot_reports_initialized_state() {
    let home = TempDir::new().unwrap();
    let base = home.path().join("base");

    boot(&home)
        .args(["--headless", "--basedir"])
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("lifecycle: initialized"))
        .stdout(predicate::str::contains(format!(
            "base directory: {}",
            base.display()
        )))
        .stdout(predicate::str::contains(
            "installed: policy, hook, trust-verifier, network-resolvers",
        ));
}

#[test]
fn test_boot_json_report() {
    let home = TempDir::new().unwrap();

    let report = json_report(boot(&home).args(["--headless", "--", "-verbose", "app.jnlp"]));

    assert_eq!(report["lifecycle"], "initialized");
    assert_eq!(report["is_application"], true);
    assert_eq!(report["headless"], true);
    assert_eq!(
        report["base_directory"],
        home.path().join(".netx").to_string_lossy().as_ref()
    );
    assert_eq!(
        report["initial_arguments"],
        serde_json::json!(["-verbose", "app.jnlp"])
    );
    assert!(report["exit_authority"]
        .as_str()
        .unwrap()
        .starts_with("launcher#"));
    assert_eq!(report["security"]["tls_configured"], true);
}

#[test]
fn test_default_base_directory_is_persisted() {
    let home = TempDir::new().unwrap();

    boot(&home).arg("--headless").assert().success();

    let saved = std::fs::read_to_string(home.path().join("config/deployment.json")).unwrap();
    let saved: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(
        saved["basedir"],
        home.path().join(".netx").to_string_lossy().as_ref()
    );
}

#[test]
fn test_nosecurity_skips_security_layer() {
    let home = TempDir::new().unwrap();

    let report = json_report(boot(&home).args(["--headless", "--nosecurity"]));

    assert_eq!(report["security_enabled"], false);
    assert!(report["security"].is_null());
}

#[rstest]
#[case("--noverify", "verify_signatures", false)]
#[case("--nofork", "forks_allowed", false)]
#[case("--redirect-streams", "redirect_streams", true)]
#[case("--debug", "debug", true)]
fn test_flag_reaches_runtime(#[case] flag: &str, #[case] field: &str, #[case] expected: bool) {
    let home = TempDir::new().unwrap();

    let report = json_report(boot(&home).args(["--headless", flag]));

    assert_eq!(report[field], expected);
}

#[test]
fn test_update_policy_flag() {
    let home = TempDir::new().unwrap();
    let report = json_report(boot(&home).args(["--headless", "--update-policy", "session"]));
    assert_eq!(report["update_policy"], "session");
}

#[test]
fn test_invalid_update_policy_rejected() {
    let home = TempDir::new().unwrap();
    boot(&home)
        .args(["--update-policy", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sometimes"));
}

#[test]
fn test_base_directory_from_config_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("deployment.json");
    let base = home.path().join("configured");
    std::fs::write(
        &config,
        format!(
            "{{\n  // hand-edited\n  basedir: {:?},\n}}\n",
            base.to_string_lossy()
        ),
    )
    .unwrap();

    let report = json_report(boot(&home).arg("--headless").arg("--config").arg(&config));

    assert_eq!(report["base_directory"], base.to_string_lossy().as_ref());
}

#[test]
fn test_broken_config_is_fatal_for_applications() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("deployment.json");
    std::fs::write(&config, "{ not: valid: json").unwrap();

    boot(&home)
        .arg("--headless")
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Fatal error while reading the configuration",
        ));
}

#[test]
fn test_broken_config_tolerated_for_applets() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("deployment.json");
    std::fs::write(&config, "{ not: valid: json").unwrap();

    let report = json_report(
        boot(&home)
            .args(["--headless", "--applet", "--config"])
            .arg(&config),
    );

    assert_eq!(report["lifecycle"], "initialized");
    assert_eq!(report["is_application"], false);
}

#[test]
fn test_no_base_directory_fails_when_headless() {
    let home = TempDir::new().unwrap();

    boot(&home)
        .env_remove("HOME")
        .arg("--headless")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No base directory"));
}
