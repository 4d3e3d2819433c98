use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_list_prints_the_rule_catalogue() {
    let mut cmd = Command::cargo_bin("mopup").unwrap();
    cmd.arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available cleanup rules"))
        .stdout(predicate::str::contains("user-caches"))
        .stdout(predicate::str::contains("system-caches"))
        .stdout(predicate::str::contains("time-machine"))
        .stdout(predicate::str::contains("requires administrator access"));
}

#[test]
fn test_list_json_is_a_complete_catalogue() {
    let output = Command::cargo_bin("mopup")
        .unwrap()
        .args(["--list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 10);

    let user_caches = entries
        .iter()
        .find(|entry| entry["rule"] == "user-caches")
        .unwrap();
    assert_eq!(user_caches["needs_elevation"], false);

    let system_caches = entries
        .iter()
        .find(|entry| entry["rule"] == "system-caches")
        .unwrap();
    assert_eq!(system_caches["needs_elevation"], true);
    assert!(system_caches["title"].as_str().unwrap().len() > 0);
}

#[test]
fn test_list_takes_precedence_over_cleanup_flags() {
    let mut cmd = Command::cargo_bin("mopup").unwrap();
    cmd.args(["--list", "--dry-run", "--rule", "trash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Available cleanup rules"));
}
