//! Integration tests for the `syncbox` CLI binary.
//!
//! Cover argument parsing, help output, completions, config handling and
//! error exit codes without a sync box on the network.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `syncbox` binary with its config under `home`.
///
/// Clears every `SYNCBOX_*` variable so the user's environment never leaks in.
fn syncbox_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("syncbox");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1");
    for var in [
        "SYNCBOX_PROFILE",
        "SYNCBOX_HOST",
        "SYNCBOX_ID",
        "SYNCBOX_PORT",
        "SYNCBOX_TOKEN",
        "SYNCBOX_CA_CERT",
        "SYNCBOX_OUTPUT",
        "SYNCBOX_TIMEOUT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_config(home: &Path, contents: &str) {
    let dir = home.join(".config").join("syncbox");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const LIVING_ROOM: &str = r#"
default_profile = "living"

[profiles.living]
host = "192.168.1.20"
id = "C43212345678"
token = "very-secret"
registration_id = "7"
"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = syncbox_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("HDMI sync box")
            .and(predicate::str::contains("register"))
            .and(predicate::str::contains("execution"))
            .and(predicate::str::contains("hue")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("syncbox"));
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .arg("disco")
        .assert()
        .failure()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("syncbox"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_status_without_config_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = syncbox_cmd(home.path()).arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("No sync box configured"), "{text}");
}

#[test]
fn test_host_without_id_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .args(["--host", "192.168.1.20", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("id"));
}

#[test]
fn test_config_path_points_into_config_dir() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("syncbox").and(predicate::str::contains("config.toml")));
}

#[test]
fn test_config_profiles_empty() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No profiles configured"));
}

#[test]
fn test_config_show_masks_token() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), LIVING_ROOM);

    syncbox_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.living]")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("very-secret").not()),
        );
}

#[test]
fn test_config_profiles_marks_default() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), LIVING_ROOM);

    syncbox_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("living *"));
}

#[test]
fn test_config_use_does_not_persist_env_overrides() {
    let home = tempfile::tempdir().unwrap();
    let two_profiles = format!(
        "{LIVING_ROOM}\n[profiles.office]\nhost = \"192.168.1.21\"\nid = \"001788123456\"\n"
    );
    write_config(home.path(), &two_profiles);

    syncbox_cmd(home.path())
        .env("SYNCBOX_PROFILES__LIVING__HOST", "10.9.9.9")
        .env("SYNCBOX_PROFILES__GARAGE__ID", "AABBCCDDEEFF")
        .args(["config", "use", "office"])
        .assert()
        .success();

    let path = home.path().join(".config").join("syncbox").join("config.toml");
    let saved = std::fs::read_to_string(path).unwrap();
    assert!(saved.contains(r#"default_profile = "office""#), "{saved}");
    assert!(saved.contains("192.168.1.20"), "{saved}");
    assert!(!saved.contains("10.9.9.9"), "{saved}");
    assert!(!saved.contains("garage"), "{saved}");
}

#[test]
fn test_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), LIVING_ROOM);

    let output = syncbox_cmd(home.path())
        .args(["-p", "garage", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("garage"), "{text}");
    assert!(text.contains("living"), "{text}");
}

// ── Validation before any request ───────────────────────────────────

#[test]
fn test_invalid_mode_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .args([
            "--host",
            "127.0.0.1",
            "--id",
            "C43212345678",
            "execution",
            "set",
            "--mode",
            "disco",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("disco"));
}

#[test]
fn test_brightness_step_out_of_range() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .args([
            "--host",
            "127.0.0.1",
            "--id",
            "C43212345678",
            "execution",
            "brightness",
            "-300",
        ])
        .assert()
        .code(2);
}

// ── Transport failures ──────────────────────────────────────────────

#[test]
fn test_unreachable_box_is_a_connection_error() {
    let home = tempfile::tempdir().unwrap();
    syncbox_cmd(home.path())
        .args([
            "--host",
            "127.0.0.1",
            "--port",
            "1",
            "--id",
            "C43212345678",
            "--timeout",
            "5",
            "status",
        ])
        .assert()
        .code(7);
}
