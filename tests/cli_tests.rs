//! Integration tests for the AgroBot CLI
//!
//! These run the actual binary and verify output and written files.
//! The interactive dashboard needs a terminal, so only the report and
//! settings subcommands are exercised here.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
fn agrobot_cmd() -> Command {
    Command::cargo_bin("agrobot").unwrap()
}

#[test]
fn test_help_flag() {
    agrobot_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("milking system control dashboard"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("settings"));
}

#[test]
fn test_no_args_requires_subcommand() {
    agrobot_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// Report export
// ============================================================================

#[test]
fn test_report_writes_json() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("report.json");

    agrobot_cmd()
        .args(["report", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["period"], "week");
    assert_eq!(json["format"], "pdf");
    assert_eq!(json["activeRobots"], 1);
    assert_eq!(json["totalYield"], 117.6);
    assert!(json["exportDate"].is_string());

    let weekly = json["weeklyData"].as_array().unwrap();
    assert_eq!(weekly.len(), 7);
    assert_eq!(weekly[0]["day"], "Monday");
    assert_eq!(weekly[0]["yield"], 245);
    assert_eq!(weekly[6]["day"], "Today");
    assert_eq!(weekly[6]["yield"], 118);
}

#[test]
fn test_report_period_and_format_flags() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("report.json");

    agrobot_cmd()
        .args(["report", "--period", "month", "--format", "csv", "--out"])
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["period"], "month");
    assert_eq!(json["format"], "csv");
}

// ============================================================================
// Settings export / import
// ============================================================================

#[test]
fn test_settings_export_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("settings.json");
    let out = temp_dir.path().join("exported.json");

    // No settings file yet: export should fall back to defaults
    agrobot_cmd()
        .args(["settings", "--file"])
        .arg(&file)
        .arg("export")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings exported to"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["milking"]["minInterval"], 6);
    assert_eq!(json["milking"]["minVolume"], 2.5);
    assert_eq!(json["identification"]["rfid"], true);
    assert_eq!(json["notifications"]["dailyReports"], false);
    assert_eq!(json["system"]["backupInterval"], 24);
    assert_eq!(json["system"]["logLevel"], "info");
}

#[test]
fn test_settings_import_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("settings.json");
    let incoming = temp_dir.path().join("incoming.json");

    fs::write(
        &incoming,
        r#"{
            "milking": {"minInterval": 8, "maxSessionTime": 20, "minVolume": 3.0},
            "identification": {"rfid": true, "visual": false, "weight": true},
            "notifications": {
                "systemErrors": true, "maintenance": false,
                "lowQuality": true, "dailyReports": true
            },
            "system": {"autoBackup": false, "backupInterval": 12, "logLevel": "debug"}
        }"#,
    )
    .unwrap();

    agrobot_cmd()
        .args(["settings", "--file"])
        .arg(&file)
        .arg("import")
        .arg(&incoming)
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings imported from"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(json["milking"]["minInterval"], 8);
    assert_eq!(json["identification"]["visual"], false);
    assert_eq!(json["system"]["logLevel"], "debug");
}

#[test]
fn test_settings_import_rejects_malformed_json() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("settings.json");
    let incoming = temp_dir.path().join("broken.json");
    fs::write(&incoming, "{not valid json").unwrap();

    agrobot_cmd()
        .args(["settings", "--file"])
        .arg(&file)
        .arg("import")
        .arg(&incoming)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Fix:"));

    // The store file must stay untouched on a failed import
    assert!(!file.exists());
}

#[test]
fn test_settings_import_rejects_wrong_shape() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("settings.json");
    let incoming = temp_dir.path().join("wrong.json");
    fs::write(&incoming, r#"{"milking": {"minInterval": "six"}}"#).unwrap();

    agrobot_cmd()
        .args(["settings", "--file"])
        .arg(&file)
        .arg("import")
        .arg(&incoming)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    assert!(!file.exists());
}
