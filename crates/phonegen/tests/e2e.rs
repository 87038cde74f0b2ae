//! End-to-end CLI integration tests.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn phonegen() -> Command {
    let mut cmd = Command::cargo_bin("phonegen").expect("binary not found");
    cmd.env_remove("PHONEGEN_COUNT").env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_flag() {
    phonegen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("phone numbers"));
}

#[test]
fn version_flag() {
    phonegen()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("phonegen"));
}

#[test]
fn quiet_prints_only_numbers() {
    let output = phonegen()
        .args(["-n", "20", "-g", "telecom", "--seed", "5", "-q"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 20);
    let telecom = ["133", "153", "180", "189", "177", "173", "199"];
    for line in lines {
        assert_eq!(line.len(), 11);
        assert!(telecom.contains(&&line[..3]), "unexpected prefix in {line}");
    }
}

#[test]
fn seed_makes_output_reproducible() {
    let run = || {
        phonegen()
            .args(["-n", "15", "--seed", "77", "-q"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn count_from_environment() {
    let output = phonegen()
        .env("PHONEGEN_COUNT", "3")
        .args(["-q"])
        .output()
        .unwrap();
    assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 3);
}

#[test]
fn normal_output_has_indexed_list_and_summary() {
    phonegen()
        .args(["-n", "4", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] "))
        .stdout(predicate::str::contains("[4] "))
        .stdout(predicate::str::contains("Operators: All"));
}

#[test]
fn display_limit_truncates() {
    phonegen()
        .args(["-n", "30", "--display-limit", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[10] "))
        .stdout(predicate::str::contains("[11] ").not())
        .stdout(predicate::str::contains("20 more not shown"));
}

#[test]
fn list_groups() {
    phonegen()
        .arg("--list-groups")
        .assert()
        .success()
        .stdout(predicate::str::contains("mobile"))
        .stdout(predicate::str::contains("China Unicom"))
        .stdout(predicate::str::contains("telecom"));
}

#[test]
fn unknown_group_is_config_error() {
    phonegen()
        .args(["-g", "martian"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("martian"));
}

#[test]
fn zero_count_is_config_error() {
    phonegen().args(["-n", "0"]).assert().code(4);
}

#[test]
fn huge_count_requires_force() {
    phonegen()
        .args(["-n", "2000000"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn save_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("numbers.json");

    let generated = phonegen()
        .args(["-n", "12", "-g", "mobile", "--seed", "4", "-q", "--save"])
        .arg(&record)
        .output()
        .unwrap();
    assert!(generated.status.success());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&record).unwrap()).unwrap();
    assert_eq!(json["count"], 12);
    assert_eq!(json["operator"], "China Mobile");
    assert_eq!(json["version"], "1.0");

    let loaded = phonegen()
        .args(["-q", "--load"])
        .arg(&record)
        .output()
        .unwrap();
    assert!(loaded.status.success());

    let mut before: Vec<String> = String::from_utf8(generated.stdout)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    let mut after: Vec<String> = String::from_utf8(loaded.stdout)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn corrupt_record_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("bad.json");
    fs::write(&record, r#"{"numbers": ["13812345678"], "count": 2}"#).unwrap();

    phonegen()
        .arg("--load")
        .arg(&record)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("count"));
}

#[test]
fn export_writes_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("numbers.txt");

    phonegen()
        .args(["-n", "1500", "-q", "--display-limit", "0", "--export"])
        .arg(&export)
        .assert()
        .success();

    let text = fs::read_to_string(&export).unwrap();
    assert!(text.starts_with("Phone Number List\n"));
    assert!(text.contains("Count: 1,500\n"));
    assert!(text.contains("\n1500. "));
}

#[test]
fn bash_completion() {
    phonegen()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phonegen"));
}
