#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const CREDENTIAL_VARS: &[&str] = &[
    "GOOGLE_API_KEY",
    "GEMINI_API_BASE",
    "IMAGEKIT_PRIVATE_KEY",
    "IMAGEKIT_PUBLIC_KEY",
    "IMAGEKIT_URL_ENDPOINT",
    "IMAGEKIT_UPLOAD_URL",
    "ADGEN_HTTP_TIMEOUT_SECS",
];

/// Runs in an empty directory with every credential variable cleared.
fn adgen_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("adgen"));
    cmd.current_dir(dir.path());
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be a single JSON object")
}

#[test]
fn test_missing_google_key_fails_before_network() {
    let dir = TempDir::new().unwrap();
    let output = adgen_cmd(&dir)
        .args(["--prompt", "sleek running shoe on neon background"])
        .assert()
        .code(1)
        .get_output()
        .clone();

    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["variation_id"], "A");
    assert!(json["error"].as_str().unwrap().contains("GOOGLE_API_KEY"));
}

#[test]
fn test_upload_requires_imagekit_variables() {
    let dir = TempDir::new().unwrap();
    let output = adgen_cmd(&dir)
        .env("GOOGLE_API_KEY", "test-key")
        .env("IMAGEKIT_PUBLIC_KEY", "public_test")
        .args(["--prompt", "p", "--variation", "B", "--upload"])
        .assert()
        .code(1)
        .get_output()
        .clone();

    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["variation_id"], "B");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("IMAGEKIT_PRIVATE_KEY"));
}

#[test]
fn test_invalid_aspect_ratio_is_json_failure() {
    let dir = TempDir::new().unwrap();
    let output = adgen_cmd(&dir)
        .env("GOOGLE_API_KEY", "test-key")
        .args(["--prompt", "p", "--aspect-ratio", "2:1"])
        .assert()
        .code(1)
        .get_output()
        .clone();

    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(json.get("variation_id").is_none());
    assert!(json["error"].as_str().unwrap().starts_with("Invalid argument"));
}

#[test]
fn test_missing_prompt_is_json_failure() {
    let dir = TempDir::new().unwrap();
    adgen_cmd(&dir)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("--prompt"));
}

#[test]
fn test_blank_prompt_is_rejected() {
    let dir = TempDir::new().unwrap();
    adgen_cmd(&dir)
        .env("GOOGLE_API_KEY", "test-key")
        .args(["--prompt", "   "])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("prompt must not be empty"));
}

#[test]
fn test_unreachable_service_reports_generation_failure() {
    let dir = TempDir::new().unwrap();
    let output = adgen_cmd(&dir)
        .env("GOOGLE_API_KEY", "test-key")
        .env("GEMINI_API_BASE", "http://127.0.0.1:9/v1beta")
        .env("ADGEN_HTTP_TIMEOUT_SECS", "5")
        .args(["--prompt", "p"])
        .assert()
        .code(1)
        .get_output()
        .clone();

    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Image generation failed"));
}

#[test]
fn test_help_lists_flags() {
    let dir = TempDir::new().unwrap();
    adgen_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--aspect-ratio"))
        .stdout(predicate::str::contains("--campaign-id"));
}
