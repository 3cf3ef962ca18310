#[path = "common/mod.rs"]
mod common;

use common::FakeHost;
use serde_json::Value;

const UNIT_LISTING: &str = r#"case "$1" in
  list-unit-files)
    printf 'UNIT FILE STATE VENDOR PRESET\n'
    printf 'foo.service enabled enabled\n'
    printf 'native.service disabled enabled\n'
    printf 'static-thing.service static -\n'
    printf 'getty@.service enabled enabled\n'
    printf '\n4 unit files listed.\n'
    ;;
  *) exit 1 ;;
esac"#;

fn stdout_lines(host: &FakeHost, args: &[&str]) -> Vec<String> {
    let output = host.debsvc().args(args).output().expect("failed to run debsvc");
    assert!(output.status.success(), "debsvc {args:?} failed: {output:?}");
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn units_and_scripts_are_merged_without_duplicates() {
    let host = FakeHost::new();
    host.boot_systemd()
        .command("systemctl", UNIT_LISTING)
        .init_script("foo")
        .init_script("bar");

    assert_eq!(
        stdout_lines(&host, &["list"]),
        vec!["bar", "foo", "getty@", "native"]
    );
    assert_eq!(
        host.calls(),
        vec!["systemctl list-unit-files --type service --full --all --no-pager"]
    );
}

#[test]
fn rejected_unit_listing_still_lists_scripts() {
    let host = FakeHost::new();
    host.boot_systemd().init_script("bar");

    assert_eq!(stdout_lines(&host, &["list"]), vec!["bar"]);
}

#[test]
fn legacy_host_never_asks_the_unit_manager() {
    let host = FakeHost::new();
    host.command("systemctl", UNIT_LISTING).init_script("bar");

    assert_eq!(stdout_lines(&host, &["list"]), vec!["bar"]);
    assert!(host.calls().is_empty());
}

#[test]
fn helpers_and_excluded_scripts_are_skipped() {
    let host = FakeHost::new();
    host.init_script("bar")
        .init_script("rcS")
        .init_script("halt")
        .init_script("local-only")
        .write_config(Some("exclude:\n  - local-only\n"));
    std::fs::write(host.path("etc/init.d/README"), "not a script\n")
        .expect("failed to write readme");

    assert_eq!(stdout_lines(&host, &["list"]), vec!["bar"]);
}

#[test]
fn json_listing_carries_origins() {
    let host = FakeHost::new();
    host.boot_systemd()
        .command("systemctl", UNIT_LISTING)
        .init_script("foo")
        .init_script("bar");

    let output = stdout_lines(&host, &["list", "--json"]).join("\n");
    let services: Value = serde_json::from_str(&output).expect("invalid json");
    let services = services.as_array().expect("expected an array");

    assert_eq!(services.len(), 4);
    assert_eq!(services[0]["name"], "bar");
    assert_eq!(services[0]["origin"]["kind"], "init-script");
    assert_eq!(services[1]["name"], "foo");
    assert_eq!(services[1]["origin"]["kind"], "unit-file");
    assert_eq!(services[1]["origin"]["state"], "enabled");
    assert_eq!(services[3]["origin"]["state"], "disabled");
}
