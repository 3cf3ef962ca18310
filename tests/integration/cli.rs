#[path = "common/mod.rs"]
mod common;

use std::fs;

use common::FakeHost;
use predicates::prelude::*;

#[test]
fn backend_is_legacy_without_runtime_dir() {
    let host = FakeHost::new();

    host.debsvc()
        .arg("backend")
        .assert()
        .success()
        .stdout("legacy\n");
}

#[test]
fn backend_is_unit_manager_when_systemd_booted() {
    let host = FakeHost::new();
    host.boot_systemd();

    host.debsvc()
        .arg("backend")
        .assert()
        .success()
        .stdout("unit-manager\n");
}

#[test]
fn missing_required_command_stops_startup() {
    let host = FakeHost::new();
    fs::remove_file(host.path("bin/invoke-rc.d")).expect("failed to remove invoke-rc.d");

    host.debsvc()
        .arg("backend")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Required command 'invoke_rc' not found"));
}

#[test]
fn optional_systemctl_may_be_missing() {
    let host = FakeHost::new();
    host.boot_systemd();
    fs::remove_file(host.path("bin/systemctl")).expect("failed to remove systemctl");

    host.debsvc()
        .arg("backend")
        .assert()
        .success()
        .stdout("legacy\n");
}

#[test]
fn unsupported_config_version_is_rejected() {
    let host = FakeHost::new();
    fs::write(host.config_path(), "version: \"2\"\n").expect("failed to write config");

    host.debsvc()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported config version '2'"));
}

#[test]
fn invalid_service_name_is_rejected_before_running_anything() {
    let host = FakeHost::new();

    host.debsvc()
        .args(["start", "../etc/passwd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid service name"));
    assert!(host.calls().is_empty());
}

#[test]
fn option_like_service_name_is_rejected() {
    let host = FakeHost::new();
    host.boot_systemd().command("systemctl", "exit 0");

    host.debsvc()
        .args(["disable", "--", "--global"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid service name '--global'"));
    assert!(host.calls().is_empty());
}

#[test]
fn classify_reports_shim_over_script() {
    let host = FakeHost::new();
    host.boot_systemd().init_script("foo").command(
        "systemctl",
        &format!(
            "[ \"$1\" = show ] && echo 'SourcePath={}' && exit 0\nexit 1",
            host.path("etc/init.d/foo").display()
        ),
    );

    host.debsvc()
        .args(["classify", "foo"])
        .assert()
        .success()
        .stdout("shim-over-script\n");
    assert_eq!(host.calls(), vec!["systemctl show -pSourcePath foo"]);
}

#[test]
fn classify_without_unit_manager_exits_two() {
    let host = FakeHost::new();

    host.debsvc()
        .args(["classify", "foo"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no unit manager"));
}

#[test]
fn log_level_flag_emits_diagnostics_on_stderr() {
    let host = FakeHost::new();
    host.init_script("bar");

    host.debsvc()
        .args(["--log-level", "debug", "list"])
        .assert()
        .success()
        .stdout("bar\n")
        .stderr(predicate::str::contains("Inventory holds 1 services"));
}
