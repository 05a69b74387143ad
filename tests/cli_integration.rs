//! Integration tests for the rollmill binary.
//!
//! These tests drive the built binary end-to-end in isolated temporary
//! directories. `ROLLMILL_CONFIG_DIR` points the global layer and shell
//! history away from the real user directory.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Per-test fixture: a working directory and an isolated app directory.
struct Fixture {
    work: TempDir,
    app: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            work: TempDir::new().expect("failed to create work dir"),
            app: TempDir::new().expect("failed to create app dir"),
        }
    }

    fn rollmill(&self) -> Command {
        let mut cmd = Command::cargo_bin("rollmill").expect("binary should build");
        cmd.current_dir(self.work.path())
            .env("ROLLMILL_CONFIG_DIR", self.app.path());
        cmd
    }
}

#[test]
fn create_input_then_input_then_solve_succeeds() {
    let fx = Fixture::new();
    fx.rollmill()
        .args(["create-input", "input", "solve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished solution process"));
}

#[test]
fn solve_without_loaded_data_exits_nonzero() {
    let fx = Fixture::new();
    fx.rollmill()
        .args(["solve"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No pass sequence loaded"));
}

#[test]
fn solve_failure_aborts_before_later_commands() {
    let fx = Fixture::new();
    // `solve` precondition failure terminates the process: the trailing
    // `create-input` must never run.
    fx.rollmill()
        .args(["solve", "create-input"])
        .assert()
        .failure();
    assert!(!fx.work.path().join("input.toml").exists());
}

#[test]
fn declined_overwrite_leaves_file_unchanged() {
    let fx = Fixture::new();
    let target = fx.work.path().join("config.toml");
    fs::write(&target, "# sentinel\n").unwrap();

    fx.rollmill()
        .args(["create-config"])
        .write_stdin("n\n")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&target).unwrap(), "# sentinel\n");
}

#[test]
fn confirmed_overwrite_replaces_file() {
    let fx = Fixture::new();
    let target = fx.work.path().join("config.toml");
    fs::write(&target, "# sentinel\n").unwrap();

    fx.rollmill()
        .args(["create-config"])
        .write_stdin("y\n")
        .assert()
        .success();

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("[rollmill]"));
}

#[test]
fn create_project_materializes_config_and_input() {
    let fx = Fixture::new();
    fx.rollmill()
        .args(["create-project", "-d", "proj"])
        .assert()
        .success();

    assert!(fx.work.path().join("proj/config.toml").exists());
    assert!(fx.work.path().join("proj/input.toml").exists());
}

#[test]
fn unknown_plugin_is_a_setup_failure() {
    let fx = Fixture::new();
    fx.rollmill()
        .args(["-p", "rollmill.bogus", "create-input"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rollmill.bogus"));
    // Setup failed before any subcommand ran.
    assert!(!fx.work.path().join("input.toml").exists());
}

#[test]
fn unknown_command_is_a_failure() {
    let fx = Fixture::new();
    fx.rollmill().args(["frobnicate"]).assert().failure();
}

#[test]
fn local_config_constants_propagate_into_core_registry() {
    let fx = Fixture::new();
    // The local layer overrides the core plugin's iteration cap; the value
    // must be visible on the registry that create-config snapshots.
    fs::write(
        fx.work.path().join("config.toml"),
        "[rollmill.core]\nDEFAULT_MAX_ITERATION_COUNT = 50\n",
    )
    .unwrap();

    fx.rollmill()
        .args(["create-config", "-f", "out.toml"])
        .assert()
        .success();

    let written = fs::read_to_string(fx.work.path().join("out.toml")).unwrap();
    assert!(written.contains("DEFAULT_MAX_ITERATION_COUNT = 50"));
}

#[test]
fn global_config_is_created_on_first_use() {
    let fx = Fixture::new();
    fx.rollmill().args(["create-input"]).assert().success();
    assert!(fx.app.path().join("config.toml").exists());
}

#[test]
fn no_global_config_flag_skips_materialization() {
    let fx = Fixture::new();
    fx.rollmill()
        .args(["--no-global-config", "create-input"])
        .assert()
        .success();
    assert!(!fx.app.path().join("config.toml").exists());
}

#[test]
fn malformed_local_config_aborts_startup() {
    let fx = Fixture::new();
    fs::write(fx.work.path().join("config.toml"), "rollmill = [broken").unwrap();
    fx.rollmill().args(["create-input"]).assert().failure();
    assert!(!fx.work.path().join("input.toml").exists());
}

#[test]
fn shell_exits_on_exit_command() {
    let fx = Fixture::new();
    fx.rollmill()
        .args(["shell"])
        .write_stdin("exit\n")
        .assert()
        .success();
}

#[test]
fn shell_state_persists_between_lines() {
    let fx = Fixture::new();
    // Line 1 scaffolds and loads, line 2 solves against the same session.
    fx.rollmill()
        .args(["shell"])
        .write_stdin("create-input input\nsolve\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished solution process"));
}

#[test]
fn failed_line_does_not_end_the_shell() {
    let fx = Fixture::new();
    fx.rollmill()
        .args(["shell"])
        .write_stdin("input -f missing.toml\ncreate-input\nexit\n")
        .assert()
        .success();
    // The loop survived the failure and ran the next line.
    assert!(fx.work.path().join("input.toml").exists());
}

#[test]
fn dir_flag_changes_working_directory() {
    let fx = Fixture::new();
    fx.rollmill()
        .args(["-d", "sub", "create-input"])
        .assert()
        .success();
    assert!(fx.work.path().join("sub/input.toml").exists());
}

#[test]
fn empty_invocation_prints_command_overview() {
    let fx = Fixture::new();
    fx.rollmill()
        .assert()
        .success()
        .stdout(predicate::str::contains("solve"))
        .stdout(predicate::str::contains("shell"));
}
