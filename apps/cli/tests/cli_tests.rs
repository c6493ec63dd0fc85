//! 命令行端到端测试（使用 `--fake-device`，不需要硬件）

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn skreader() -> Command {
    Command::cargo_bin("skreader").unwrap()
}

#[test]
fn test_fake_info() {
    skreader()
        .args(["--fake-device", "info"])
        .assert()
        .success()
        .stdout("Fake device\n");
}

#[test]
fn test_fake_measure_default_output() {
    skreader()
        .args(["-f", "measure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LUX: 1230"))
        .stdout(predicate::str::contains("R9: 12.3"));
}

#[test]
fn test_fake_measure_cri() {
    skreader()
        .args(["--fake", "measure", "--cri"])
        .assert()
        .success()
        .stdout(predicate::str::contains("R15: 74.9"))
        .stdout(predicate::str::contains("R9:").count(1));
}

#[test]
fn test_fake_json() {
    let output = skreader()
        .args(["-f", "json", "--name", "lamp", "--note", "test"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["Device"], "fake-device");
    assert_eq!(json["Measurements"][0]["Name"], "lamp");
    assert_eq!(json["Measurements"][0]["Note"], "test");
    assert_eq!(json["Measurements"][0]["ColorTemperature"]["CCT"], 5000.0);
}

#[test]
fn test_config_init_show_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("skreader.toml");
    let path_arg = path.to_str().unwrap();

    skreader()
        .args(["--config", path_arg, "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skreader.toml"));

    skreader()
        .args(["--config", path_arg, "config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    skreader()
        .args(["--config", path_arg, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    skreader()
        .args(["--config", path_arg, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shutter_speed = \"1/125\""));
}
