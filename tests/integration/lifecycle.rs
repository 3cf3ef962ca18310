#[path = "common/mod.rs"]
mod common;

use common::FakeHost;
use predicates::prelude::*;

#[test]
fn start_and_stop_go_through_service() {
    let host = FakeHost::new();
    host.init_script("baz");

    host.debsvc().args(["start", "baz"]).assert().success();
    host.debsvc().args(["stop", "baz"]).assert().success();

    assert_eq!(host.calls(), vec!["service baz start", "service baz stop"]);
}

#[test]
fn failed_start_reports_command_output() {
    let host = FakeHost::new();
    host.command("service", "echo 'baz: cannot bind port' >&2; exit 1");

    host.debsvc()
        .args(["start", "baz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed with exit code 1"))
        .stderr(predicate::str::contains("baz: cannot bind port"));
}

#[test]
fn restart_without_native_support_stops_then_starts() {
    let host = FakeHost::new();
    host.init_script("baz");

    host.debsvc().args(["restart", "baz"]).assert().success();

    assert_eq!(host.calls(), vec!["service baz stop", "service baz start"]);
}

#[test]
fn restart_with_native_support_runs_restart() {
    let host = FakeHost::new();
    host.init_script("baz");

    host.debsvc()
        .args(["restart", "baz", "--has-restart"])
        .assert()
        .success();

    assert_eq!(host.calls(), vec!["service baz restart"]);
}

#[test]
fn fallback_restart_stops_at_a_failed_stop() {
    let host = FakeHost::new();
    host.command("service", "[ \"$2\" = stop ] && exit 1\nexit 0");

    host.debsvc().args(["restart", "baz"]).assert().failure();

    assert_eq!(host.calls(), vec!["service baz stop"]);
}

#[test]
fn status_maps_to_lsb_exit_codes() {
    let host = FakeHost::new();
    host.command("service", "[ \"$1\" = running ] && exit 0\nexit 3");

    host.debsvc()
        .args(["status", "running"])
        .assert()
        .success()
        .stdout("running\n");
    host.debsvc()
        .args(["status", "baz"])
        .assert()
        .code(3)
        .stdout("stopped\n");
}

#[test]
fn status_without_native_support_is_unknown() {
    let host = FakeHost::new();

    host.debsvc()
        .args(["status", "baz", "--no-status"])
        .assert()
        .code(4)
        .stdout("unknown\n");
    assert!(host.calls().is_empty());
}

#[test]
fn boot_toggles_use_update_rc_on_sysvinit() {
    let host = FakeHost::new();
    host.init_script("baz");

    host.debsvc().args(["enable", "baz"]).assert().success();
    host.debsvc().args(["disable", "baz"]).assert().success();

    assert_eq!(
        host.calls(),
        vec!["update-rc.d baz enable", "update-rc.d baz disable"]
    );
}

#[test]
fn boot_toggles_use_systemctl_under_systemd() {
    let host = FakeHost::new();
    host.boot_systemd().command("systemctl", "exit 0");

    host.debsvc().args(["enable", "baz"]).assert().success();
    host.debsvc().args(["disable", "baz"]).assert().success();

    assert_eq!(
        host.calls(),
        vec!["systemctl enable baz", "systemctl disable baz"]
    );
}

#[test]
fn rejected_boot_toggle_fails() {
    let host = FakeHost::new();
    host.command("update-rc.d", "echo 'update-rc.d: error: baz Default-Start contains no runlevels' >&2; exit 1");

    host.debsvc()
        .args(["enable", "baz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Default-Start contains no runlevels"));
}
