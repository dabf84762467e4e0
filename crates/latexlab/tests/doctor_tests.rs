//! Integration tests for doctor command

#![allow(deprecated)] // cargo_bin

use assert_cmd::Command;
use latexlab_testkit::temp_dir_in_workspace;
use std::fs;
use std::path::Path;

fn doctor_json(dir: &Path) -> serde_json::Value {
    let output = Command::cargo_bin("latexlab")
        .unwrap()
        .current_dir(dir)
        .env_remove("LATEXLAB_CONFIG")
        .args(["doctor", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "doctor must always exit 0");
    serde_json::from_slice(&output.stdout).expect("doctor --json must print JSON")
}

fn check<'a>(output: &'a serde_json::Value, id: &str) -> &'a serde_json::Value {
    output["checks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == id)
        .unwrap_or_else(|| panic!("missing check {}", id))
}

#[test]
fn test_doctor_without_config_uses_defaults() {
    let temp = temp_dir_in_workspace();
    let output = doctor_json(temp.path());

    assert_eq!(output["schema_version"], "1.0");
    assert!(output["config"]["path"].is_null());
    assert_eq!(output["config"]["engine"], "pdflatex");
    assert_eq!(check(&output, "config_valid")["status"], "ok");
    assert!(output["checks"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == "engine_available"));
}

#[test]
fn test_doctor_reports_missing_engine() {
    let temp = temp_dir_in_workspace();
    fs::write(
        temp.path().join("latexlab.toml"),
        "[engine]\ndefault = \"latexlab-no-such-engine\"\n",
    )
    .unwrap();

    let output = doctor_json(temp.path());
    assert_eq!(check(&output, "engine_available")["status"], "error");
}

#[test]
fn test_doctor_reports_invalid_config() {
    let temp = temp_dir_in_workspace();
    fs::write(temp.path().join("latexlab.toml"), "[engine\n").unwrap();

    let output = doctor_json(temp.path());
    let config = check(&output, "config_valid");
    assert_eq!(config["status"], "error");
    assert!(config["message"].as_str().unwrap().contains("CONFIG_PARSE_ERROR"));
}

#[cfg(unix)]
#[test]
fn test_doctor_finds_configured_engine() {
    let temp = temp_dir_in_workspace();
    let engine = latexlab_testkit::FakeEngine::builder().build();
    fs::write(
        temp.path().join("latexlab.toml"),
        format!("[engine]\ndefault = \"{}\"\n", engine.command()),
    )
    .unwrap();

    let output = doctor_json(temp.path());
    let engine_check = check(&output, "engine_available");
    assert_eq!(engine_check["status"], "ok");
    assert_eq!(engine_check["details"]["version"], "fakelatex 1.0");
}

#[test]
fn test_doctor_human_readable() {
    let temp = temp_dir_in_workspace();
    Command::cargo_bin("latexlab")
        .unwrap()
        .current_dir(temp.path())
        .env_remove("LATEXLAB_CONFIG")
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicates::str::contains("Environment Health Check"));
}
