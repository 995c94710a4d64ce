use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("adminform");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("--form"))
        .stdout(contains("--log-file"));
}

#[test]
fn requires_a_form_or_schema() {
    let mut cmd = cargo::cargo_bin_cmd!("adminform");
    cmd.assert()
        .failure()
        .stderr(contains("provide --form or --schema"));
}

#[test]
fn reports_missing_form_file() {
    let mut cmd = cargo::cargo_bin_cmd!("adminform");
    cmd.args(["--form", "definitely-missing.json"])
        .assert()
        .failure()
        .stderr(contains("definitely-missing.json"));
}
