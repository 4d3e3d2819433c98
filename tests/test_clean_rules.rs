use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn seeded_home() -> TempDir {
    let home = TempDir::new().unwrap();
    let caches = home.path().join("Library/Caches");
    fs::create_dir_all(caches.join("bundle")).unwrap();
    fs::write(caches.join("app.cache"), vec![0u8; 4096]).unwrap();
    fs::write(caches.join("bundle/data.bin"), vec![0u8; 1024]).unwrap();
    home
}

#[test]
fn test_clean_removes_user_caches() {
    let home = seeded_home();
    let output = Command::cargo_bin("mopup")
        .unwrap()
        .env("HOME", home.path())
        .args(["--rule", "user-caches", "--json", "--no-elevation"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["results"][0]["status"]["kind"], "cleaned");
    assert_eq!(report["results"][0]["removed_entries"], 2);
    assert_eq!(report["summary"]["reclaimed_bytes"], 5120);
    assert_eq!(report["summary"]["elevation_used"], false);

    // the cache directory itself survives, its contents do not
    assert!(home.path().join("Library/Caches").exists());
    assert!(!home.path().join("Library/Caches/app.cache").exists());
    assert!(!home.path().join("Library/Caches/bundle").exists());
}

#[test]
fn test_clean_empties_the_trash() {
    let home = TempDir::new().unwrap();
    let trash = home.path().join(".Trash");
    fs::create_dir_all(trash.join("old-project")).unwrap();
    fs::write(trash.join("old-file.txt"), b"gone").unwrap();
    fs::write(trash.join("old-project/main.c"), b"gone").unwrap();

    let mut cmd = Command::cargo_bin("mopup").unwrap();
    cmd.env("HOME", home.path())
        .args(["--rule", "trash", "--quiet", "--no-elevation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleanup Summary:"));

    assert!(home.path().join(".Trash").exists());
    assert_eq!(
        fs::read_dir(home.path().join(".Trash")).unwrap().count(),
        0
    );
}

#[test]
fn test_quiet_run_suppresses_the_header() {
    let home = seeded_home();
    let mut cmd = Command::cargo_bin("mopup").unwrap();
    cmd.env("HOME", home.path())
        .args(["--rule", "user-caches", "--quiet", "--no-elevation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mopup v").not())
        .stdout(predicate::str::contains("Cleanup Summary:"));
}

#[test]
fn test_second_run_finds_nothing_to_clean() {
    let home = seeded_home();

    let mut first = Command::cargo_bin("mopup").unwrap();
    first
        .env("HOME", home.path())
        .args(["--rule", "user-caches", "--quiet", "--no-elevation"])
        .assert()
        .success();

    let output = Command::cargo_bin("mopup")
        .unwrap()
        .env("HOME", home.path())
        .args(["--rule", "user-caches", "--json", "--no-elevation"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["results"][0]["status"]["kind"], "skipped");
    assert_eq!(report["results"][0]["status"]["detail"], "nothing to clean");
    assert_eq!(report["summary"]["reclaimed_bytes"], 0);
}
