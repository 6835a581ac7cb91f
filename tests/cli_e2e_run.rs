//! End-to-end tests for the `addons-filter` CLI
//!
//! These invoke the actual binary and validate its behavior from a user's
//! perspective. They stop at configuration-level failures so no aggregation
//! tool or network is needed.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Test that --help shows the tool description
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_help() {
    let mut cmd = cargo_bin_cmd!("addons-filter");

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Filter curated addon modules out of aggregated repositories",
        ));
}

/// Test that --version succeeds
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_version() {
    let mut cmd = cargo_bin_cmd!("addons-filter");

    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("addons-filter"));
}

/// Test that a missing repos.y[a]ml produces a configuration error
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_missing_repos_config() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("addons-filter");

    cmd.arg("--input-path")
        .arg(temp.path())
        .arg("--output-path")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("repos.y[a]ml"));
}

/// Test that a missing addons.y[a]ml produces a configuration error
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_missing_addons_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("repos.yml")
        .write_str("acme:\n  merges: [\"origin main\"]\n")
        .unwrap();

    let mut cmd = cargo_bin_cmd!("addons-filter");

    cmd.arg("--input-path")
        .arg(temp.path())
        .arg("--output-path")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("addons.y[a]ml"));
}

/// Test that malformed YAML is reported with the parser detail
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_malformed_repos_yaml() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("repos.yml").write_str("acme: [unclosed").unwrap();

    let mut cmd = cargo_bin_cmd!("addons-filter");

    cmd.arg("--input-path")
        .arg(temp.path())
        .arg("--output-path")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YAML content"));
}

/// Test that --clean and --no-clean are a valid overriding pair
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_clean_flags_override_each_other() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("addons-filter");

    // Both flags parse; the run still stops at the missing configuration,
    // not at a usage error
    cmd.arg("--input-path")
        .arg(temp.path())
        .arg("--output-path")
        .arg(temp.path().join("out"))
        .arg("--no-clean")
        .arg("--clean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("repos.y[a]ml"));
}

/// Test that the short -c form is accepted
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_clean_short_flag() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("addons-filter");

    cmd.arg("-c")
        .arg("--input-path")
        .arg(temp.path())
        .arg("--output-path")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("repos.y[a]ml"));
}

/// Test that CI mode without the CI variables fails before any work
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_gitlab_ci_without_env() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("repos.yml")
        .write_str("acme:\n  merges: [\"origin main\"]\n")
        .unwrap();
    temp.child("addons.yml")
        .write_str("acme: [\"acme_*\"]\n")
        .unwrap();

    let mut cmd = cargo_bin_cmd!("addons-filter");

    cmd.env_remove("CI_JOB_TOKEN")
        .env_remove("CI_SERVER_HOST")
        .arg("--input-path")
        .arg(temp.path())
        .arg("--output-path")
        .arg(temp.path().join("out"))
        .arg("--gitlab-ci")
        .assert()
        .failure()
        .stderr(predicate::str::contains("CI_JOB_TOKEN"));
}

/// Test that an undefined env-file variable is a configuration error
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_undefined_env_variable() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("repos.yml")
        .write_str("acme:\n  remotes:\n    origin: https://$MISSING/acme.git\n")
        .unwrap();
    temp.child("repos.env").write_str("OTHER=x\n").unwrap();

    let mut cmd = cargo_bin_cmd!("addons-filter");

    cmd.arg("--input-path")
        .arg(temp.path())
        .arg("--output-path")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined variable $MISSING"));
}
