//! CLI integration tests using assert_cmd
//!
//! Every test points HOSTBOOK_HOME at its own temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the hostbook binary
fn hostbook_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hostbook").expect("Failed to find hostbook binary");
    cmd.env("HOSTBOOK_HOME", home.path()).env_remove("HOSTBOOK_LOG");
    cmd
}

/// Create an http profile without credentials
fn create_profile(home: &TempDir, name: &str) {
    hostbook_cmd(home)
        .args(["profile", "create", name, "--type", "http"])
        .write_stdin("example.com:8443\n\n\n\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Profile {name} was created.")));
}

#[test]
fn test_help_command() {
    let home = TempDir::new().expect("Failed to create temp dir");
    hostbook_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("connection profile manager"));
}

#[test]
fn test_version_command() {
    let home = TempDir::new().expect("Failed to create temp dir");
    hostbook_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hostbook"));
}

#[test]
fn test_types_lists_builtin_types() {
    let home = TempDir::new().expect("Failed to create temp dir");
    hostbook_cmd(&home)
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("http"))
        .stdout(predicate::str::contains("ssh"))
        .stdout(predicate::str::contains("ftp"))
        .stdout(predicate::str::contains("port : number (default 443)"));
}

#[test]
fn test_profile_list_empty() {
    let home = TempDir::new().expect("Failed to create temp dir");
    hostbook_cmd(&home)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles found."));
}

#[test]
fn test_profile_show_not_found() {
    let home = TempDir::new().expect("Failed to create temp dir");
    hostbook_cmd(&home)
        .args(["profile", "show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_profile_create_then_list_and_show() {
    let home = TempDir::new().expect("Failed to create temp dir");
    create_profile(&home, "dev");

    hostbook_cmd(&home)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dev"))
        .stdout(predicate::str::contains("example.com:8443"));

    hostbook_cmd(&home)
        .args(["profile", "show", "dev", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"dev\""));
}

#[test]
fn test_profile_create_masks_password_on_show() {
    let home = TempDir::new().expect("Failed to create temp dir");
    hostbook_cmd(&home)
        .args(["profile", "create", "secure", "--type", "http"])
        .write_stdin("example.com\n\nalice\nhunter2\n\n\n\n")
        .assert()
        .success();

    hostbook_cmd(&home)
        .args(["profile", "show", "secure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_profile_create_duplicate_name_fails_once() {
    let home = TempDir::new().expect("Failed to create temp dir");
    create_profile(&home, "dev");

    hostbook_cmd(&home)
        .args(["profile", "create", "Dev", "--type", "http"])
        .write_stdin("example.com\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("Error:").not());
}

#[test]
fn test_profile_create_cancelled_on_empty_input() {
    let home = TempDir::new().expect("Failed to create temp dir");
    hostbook_cmd(&home)
        .args(["profile", "create", "dev", "--type", "http"])
        .write_stdin("")
        .assert()
        .failure();

    hostbook_cmd(&home)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles found."));
}

#[test]
fn test_profile_delete_requires_confirmation() {
    let home = TempDir::new().expect("Failed to create temp dir");
    create_profile(&home, "dev");

    hostbook_cmd(&home)
        .args(["profile", "delete", "dev"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation cancelled."));

    hostbook_cmd(&home)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dev"));
}

#[test]
fn test_profile_delete_cascades_into_trees() {
    let home = TempDir::new().expect("Failed to create temp dir");
    create_profile(&home, "dev");
    create_profile(&home, "prod");

    hostbook_cmd(&home)
        .args(["tree", "add", "datasets", "dev", "--favorite", "USER.DATA"])
        .assert()
        .success();
    hostbook_cmd(&home)
        .args(["tree", "add", "datasets", "prod"])
        .assert()
        .success();

    hostbook_cmd(&home)
        .args(["--yes", "profile", "delete", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile dev was deleted."));

    hostbook_cmd(&home)
        .args(["tree", "list", "datasets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("dev").not());
}

#[test]
fn test_set_default_and_toggle_validation() {
    let home = TempDir::new().expect("Failed to create temp dir");
    create_profile(&home, "dev");

    hostbook_cmd(&home)
        .args(["profile", "set-default", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default http profile: dev"));

    hostbook_cmd(&home)
        .args(["profile", "disable-validation", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation disabled for dev"));

    hostbook_cmd(&home)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dev *"))
        .stdout(predicate::str::contains("validate=off"));
}

#[test]
fn test_validate_disabled_profile_is_unverified() {
    let home = TempDir::new().expect("Failed to create temp dir");
    create_profile(&home, "dev");

    hostbook_cmd(&home)
        .args(["profile", "disable-validation", "dev"])
        .assert()
        .success();

    hostbook_cmd(&home)
        .args(["profile", "validate", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dev: unverified"));
}

#[test]
fn test_tree_add_rejects_unknown_domain() {
    let home = TempDir::new().expect("Failed to create temp dir");
    create_profile(&home, "dev");

    hostbook_cmd(&home)
        .args(["tree", "add", "printers", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown domain"));
}

#[test]
fn test_invalid_config_file_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    fs::write(home.path().join("config.json"), "{ not json").expect("Failed to write config");

    hostbook_cmd(&home)
        .args(["profile", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
