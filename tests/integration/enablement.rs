#[path = "common/mod.rs"]
mod common;

use common::FakeHost;
use predicates::prelude::*;

/// A `systemctl` that reports `foo` as generated from its init script and
/// everything else as native, enabled only for `ssh`.
fn unit_manager(host: &FakeHost) -> String {
    format!(
        r#"case "$1" in
  show)
    if [ "$3" = foo ]; then echo 'SourcePath={}'; else echo 'SourcePath='; fi
    ;;
  is-enabled)
    [ "$2" = ssh ] && {{ echo enabled; exit 0; }}
    echo disabled; exit 1
    ;;
  *) exit 1 ;;
esac"#,
        host.path("etc/init.d/foo").display()
    )
}

#[test]
fn native_unit_is_answered_by_the_unit_manager() {
    let host = FakeHost::new();
    host.boot_systemd().command("systemctl", &unit_manager(&host));

    host.debsvc()
        .args(["is-enabled", "ssh"])
        .assert()
        .success()
        .stdout("enabled\n");
    assert_eq!(
        host.calls(),
        vec!["systemctl show -pSourcePath ssh", "systemctl is-enabled ssh"]
    );
}

#[test]
fn disabled_native_unit_exits_one() {
    let host = FakeHost::new();
    host.boot_systemd().command("systemctl", &unit_manager(&host));

    host.debsvc()
        .args(["is-enabled", "cron", "--explain"])
        .assert()
        .code(1)
        .stdout("disabled\nsystemctl is-enabled exited with 1\n");
}

#[test]
fn script_backed_unit_uses_legacy_policy() {
    let host = FakeHost::new();
    host.boot_systemd()
        .command("systemctl", &unit_manager(&host))
        .command("invoke-rc.d", "exit 104")
        .init_script("foo");

    host.debsvc()
        .args(["is-enabled", "foo"])
        .assert()
        .success()
        .stdout("enabled\n");

    let calls = host.calls();
    assert_eq!(
        calls,
        vec![
            "systemctl show -pSourcePath foo",
            "invoke-rc.d --quiet --query foo start",
        ]
    );
}

#[test]
fn four_start_links_enable_an_unanswered_query() {
    let host = FakeHost::new();
    host.command("invoke-rc.d", "exit 105")
        .init_script("bar")
        .start_links("bar", &["2", "3", "4", "5"]);

    host.debsvc()
        .args(["is-enabled", "bar", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("enabled\n"))
        .stdout(predicate::str::contains("4 start link(s)"));
}

#[test]
fn three_start_links_are_not_enough() {
    let host = FakeHost::new();
    host.command("invoke-rc.d", "exit 105")
        .init_script("bar")
        .start_links("bar", &["2", "3", "4"]);

    host.debsvc()
        .args(["is-enabled", "bar"])
        .assert()
        .code(1)
        .stdout("disabled\n");
}

#[test]
fn start_links_of_similar_names_are_not_counted() {
    let host = FakeHost::new();
    host.command("invoke-rc.d", "exit 105")
        .init_script("bar")
        .init_script("bar-extra")
        .start_links("bar", &["2", "3", "4"])
        .start_links("bar-extra", &["2", "3", "4", "5"]);

    host.debsvc()
        .args(["is-enabled", "bar"])
        .assert()
        .code(1)
        .stdout("disabled\n");
}

#[test]
fn fallback_status_counts_as_enabled() {
    let host = FakeHost::new();
    host.command("invoke-rc.d", "exit 106").init_script("bar");

    host.debsvc()
        .args(["is-enabled", "bar"])
        .assert()
        .success()
        .stdout("enabled\n");
}

#[test]
fn forbidding_policy_reports_disabled() {
    let host = FakeHost::new();
    host.command("invoke-rc.d", "exit 101").init_script("bar");

    host.debsvc()
        .args(["is-enabled", "bar", "--explain"])
        .assert()
        .code(1)
        .stdout("disabled\ninvoke-rc.d query exited with 101\n");
}

#[test]
fn failed_classification_is_an_error() {
    let host = FakeHost::new();
    host.boot_systemd();

    host.debsvc()
        .args(["is-enabled", "ssh"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("failed with exit code 1"));
}
