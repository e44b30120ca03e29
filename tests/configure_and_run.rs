mod common;

use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

use common::Workspace;

#[test]
fn configure_without_inet_writes_own_paths() {
    let ws = Workspace::new();
    ws.cmd("veins_configure")
        .arg("--no-makemake")
        .assert()
        .success()
        .stdout(contains("Configure done"));

    let config = fs::read_to_string(ws.config_file()).unwrap();
    assert!(config.contains("run_libs = [\"src/veins\"]"));
    assert!(config.contains("run_imgs = [\"images\"]"));
}

#[test]
fn configure_with_inet_prepends_its_paths() {
    let ws = Workspace::new().with_inet("inet-4.2.1");
    ws.cmd("veins_configure")
        .args(["--no-makemake", "--with-inet", "../inet"])
        .assert()
        .success()
        .stdout(contains("-DWITH_INET"))
        .stdout(contains("-KINET_PROJ=../../inet"));

    let config = fs::read_to_string(ws.config_file()).unwrap();
    assert!(config.contains("run_libs = [\"../inet/src/INET\",\"src/veins\"]"));
    assert!(config.contains("run_neds = [\"../inet/src\",\"src/veins\"]"));
}

#[test]
fn configure_is_idempotent() {
    let ws = Workspace::new().with_inet("inet-4.2.1");
    let run = || {
        ws.cmd("veins_configure")
            .args(["--no-makemake", "--with-inet", "../inet"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    let first = run();
    let first_config = fs::read_to_string(ws.config_file()).unwrap();
    assert_eq!(first, run());
    assert_eq!(first_config, fs::read_to_string(ws.config_file()).unwrap());
}

#[test]
fn unreadable_inet_version_fails() {
    let ws = Workspace::new();
    fs::create_dir_all(&ws.inet).unwrap();
    ws.cmd("veins_configure")
        .args(["--no-makemake", "--with-inet", "../inet"])
        .assert()
        .code(1)
        .stderr(contains("could not determine INET version"));
    assert!(!ws.config_file().exists());
}

#[test]
fn version_mismatch_warns_unless_strict() {
    let ws = Workspace::new().with_inet("inet-3.6.0");
    ws.cmd("veins_configure")
        .args(["--no-makemake", "--with-inet", "../inet"])
        .env("RUST_LOG", "warn")
        .assert()
        .success()
        .stderr(contains("Unsupported INET version"));

    ws.cmd("veins_configure")
        .args(["--no-makemake", "--with-inet", "../inet", "--strict-version"])
        .assert()
        .code(1)
        .stderr(contains("unsupported INET version"));
}

#[test]
fn run_without_configuration_points_to_configure() {
    let ws = Workspace::new();
    ws.cmd("veins_run")
        .arg("--dry-run")
        .assert()
        .code(1)
        .stderr(contains("veins_configure"));
}

#[test]
fn run_assembles_tool_debug_and_passthrough_flags() {
    let ws = Workspace::new();
    ws.cmd("veins_configure").arg("--no-makemake").assert().success();

    ws.cmd("veins_run")
        .args(["--dry-run", "-d", "-t", "gdb", "--", "-u", "Cmdenv", "-c", "Default"])
        .assert()
        .success()
        .stdout(contains("\"gdb\" \"--args\" \"opp_run_dbg\""))
        .stdout(contains("/src/veins\" \"-n"))
        .stdout(contains("\"-u\" \"Cmdenv\" \"-c\" \"Default\""))
        .stdout(contains("\"--\"").not());
}

#[test]
fn run_rejects_unknown_tool() {
    let ws = Workspace::new();
    ws.cmd("veins_run")
        .args(["-t", "perf"])
        .assert()
        .code(2)
        .stderr(contains("invalid value"));
}
