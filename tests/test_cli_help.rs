use predicates::prelude::*;

#[test]
fn test_help_includes_required_options() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("mopup");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--rule"))
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--status"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--no-elevation"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--quiet"))
        .stdout(predicate::str::contains("--version"))
        .stdout(predicate::str::contains("--help"));
}

#[test]
fn test_help_describes_dry_run() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("mopup");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("without deleting"));
}

#[test]
fn test_help_describes_rule_selection() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("mopup");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("glob pattern"))
        .stdout(predicate::str::contains("ID"));
}
