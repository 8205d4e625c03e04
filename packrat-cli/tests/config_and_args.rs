//! CLI integration tests that never touch the network: config lifecycle and
//! argument validation. Each test gets an isolated $HOME.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn packrat(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("packrat").expect("packrat binary");
    cmd.env("HOME", home.path())
        .env("USERPROFILE", home.path())
        .env_remove("PACKRAT_TOKEN");
    cmd
}

#[test]
fn config_init_then_show_roundtrips_and_masks_token() {
    let home = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();

    packrat(&home)
        .args(["config", "init", "--folder", "PhotoBackups", "--keep", "5"])
        .arg("--source")
        .arg(source.path())
        .arg("--token")
        .arg("super-secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));

    packrat(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PhotoBackups"))
        .stdout(predicate::str::contains("retention: 5"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("super-secret").not());
}

#[test]
fn sync_without_config_or_flags_fails_with_guidance() {
    let home = TempDir::new().unwrap();

    packrat(&home)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--source"));
}

#[test]
fn sync_without_token_fails_before_any_remote_call() {
    let home = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();

    packrat(&home)
        .arg("sync")
        .arg("--source")
        .arg(source.path())
        .args(["--folder", "Backups"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing API token"));
}

#[test]
fn keep_zero_is_rejected_at_parse_time() {
    let home = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();

    packrat(&home)
        .arg("backup")
        .arg("--source")
        .arg(source.path())
        .args(["--folder", "Backups", "--keep", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn config_show_without_config_fails() {
    let home = TempDir::new().unwrap();

    packrat(&home)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}
