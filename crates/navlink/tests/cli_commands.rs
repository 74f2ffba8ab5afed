#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn navlink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_navlink"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .env_remove("NAVLINK_SETTINGS")
        .env_remove("NAVLINK_LEGACY_SCALED1")
        .output()
        .expect("navlink should run")
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be json"))
        .collect()
}

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "navlink-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[test]
fn catalog_check_passes_for_standard_tables() {
    let output = navlink(&["catalog", "--check"]);
    assert!(output.status.success());

    let rows = &json_lines(&output)[0];
    let rows = rows.as_array().expect("catalog prints an array");
    assert_eq!(rows.len(), 19);
    let z2 = rows
        .iter()
        .find(|row| row["code"] == "z2")
        .expect("z2 row present");
    assert_eq!(z2["payload_len"], 27);
    assert_eq!(z2["record_size"], true);
}

#[test]
fn classify_resolves_hex_code() {
    let output = navlink(&["classify", "0x7047"]);
    assert!(output.status.success());

    let out = &json_lines(&output)[0];
    assert_eq!(out["code"], "pG");
    assert_eq!(out["family"], "input");
    assert_eq!(out["kind"], "ping");
}

#[test]
fn classify_unknown_code_exits_data_invalid() {
    let output = navlink(&["classify", "qq"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn classify_malformed_code_exits_usage() {
    let output = navlink(&["classify", "abc"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn session_echoes_request_then_streams() {
    let output = navlink(&[
        "session", "--select", "z1", "--request", "pG", "--ticks", "2",
    ]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["direction"], "rx");
    assert_eq!(lines[1]["code"], "pG");
    assert_eq!(lines[1]["direction"], "tx");
    assert_eq!(lines[2]["code"], "z1");
    assert_eq!(lines[2]["payload_len"], 40);
    assert_eq!(lines[3]["code"], "z1");
}

#[test]
fn session_scaled1_follows_legacy_flag() {
    let fixed = navlink(&["session", "--select", "s1", "--ticks", "1"]);
    assert_eq!(json_lines(&fixed)[0]["payload_len"], 52);

    let legacy = navlink(&["--legacy-scaled1", "session", "--select", "s1", "--ticks", "1"]);
    let line = &json_lines(&legacy)[0];
    assert_eq!(line["payload_len"], 51);
    assert_eq!(line["code"], "a1");
}

#[test]
fn session_apply_persists_selection() {
    let dir = unique_temp_dir("apply");
    let settings = dir.join("settings.json");
    let settings_arg = settings.to_string_lossy().to_string();

    let output = navlink(&["session", "--settings", &settings_arg, "--select", "d2", "--apply"]);
    assert!(output.status.success());
    let stored = std::fs::read_to_string(&settings).expect("settings file written");
    assert!(stored.contains("\"d2\""));

    let output = navlink(&["session", "--settings", &settings_arg, "--ticks", "1"]);
    let line = &json_lines(&output)[0];
    assert_eq!(line["code"], "d2");
    assert_eq!(line["payload_len"], 24);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn session_refuses_stored_settings_outside_allowed_values() {
    use navlink::device::{SettingsFile, UserSettings};

    let dir = unique_temp_dir("invalid");
    let settings = dir.join("settings.json");
    SettingsFile::new(&settings)
        .save(&UserSettings {
            packet_rate: 7,
            ..UserSettings::default()
        })
        .expect("settings file written");

    let settings_arg = settings.to_string_lossy().to_string();
    let output = navlink(&["session", "--settings", &settings_arg, "--ticks", "1"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn session_rejects_input_code_selection() {
    let output = navlink(&["session", "--select", "pG"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn stream_counts_test_packets() {
    let output = navlink(&["stream", "--select", "zT", "--rate", "200", "--count", "3"]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 3);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line["code"], "zT");
        assert_eq!(line["decoded"]["counter"], i as u64);
    }
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_navlink"))
        .arg("version")
        .output()
        .expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with(&format!("navlink {}", env!("CARGO_PKG_VERSION"))));
}
