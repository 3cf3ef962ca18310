#![allow(dead_code)]

use std::{
    fs,
    os::unix::fs::{PermissionsExt, symlink},
    path::{Path, PathBuf},
};

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway Debian-like host rooted in a temporary directory.
///
/// Every management command is a shell script that appends its own name and
/// arguments to `calls.log` before running the body a test supplies. The guard
/// serializes tests within a binary so no freshly written script is still open
/// for writing in a forked child when another test executes it.
pub struct FakeHost {
    temp: TempDir,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl FakeHost {
    /// A sysvinit host whose commands all succeed silently, except `systemctl`
    /// and `invoke-rc.d`, which fail until a test scripts them.
    pub fn new() -> Self {
        let lock = debsvc::test_utils::env_lock();
        let temp = tempfile::tempdir().expect("failed to create tempdir");
        let host = Self { temp, _lock: lock };

        for dir in ["bin", "etc/init.d", "run"] {
            fs::create_dir_all(host.path(dir)).expect("failed to create host dir");
        }
        host.command("systemctl", "exit 1");
        host.command("update-rc.d", "exit 0");
        host.command("invoke-rc.d", "exit 100");
        host.command("service", "exit 0");
        host.write_config(None);
        host
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Marks systemd as the running init.
    pub fn boot_systemd(&self) -> &Self {
        fs::create_dir_all(self.path("run/systemd/system")).expect("failed to create runtime dir");
        self
    }

    /// Replaces the body of a fake management command.
    pub fn command(&self, name: &str, body: &str) -> &Self {
        let log = self.path("calls.log");
        let script = format!(
            "#!/bin/sh\necho \"${{0##*/}} $*\" >> '{}'\n{body}\n",
            log.display()
        );
        write_executable(&self.path(&format!("bin/{name}")), &script);
        self
    }

    /// Installs an executable init script.
    pub fn init_script(&self, name: &str) -> &Self {
        write_executable(
            &self.path(&format!("etc/init.d/{name}")),
            "#!/bin/sh\nexit 0\n",
        );
        self
    }

    /// Adds an `S20<name>` start link in each listed run level.
    pub fn start_links(&self, name: &str, levels: &[&str]) -> &Self {
        let target = self.path(&format!("etc/init.d/{name}"));
        for level in levels {
            let dir = self.path(&format!("etc/rc{level}.d"));
            fs::create_dir_all(&dir).expect("failed to create rc dir");
            symlink(&target, dir.join(format!("S20{name}"))).expect("failed to create link");
        }
        self
    }

    /// Writes the configuration, with optional extra YAML appended.
    pub fn write_config(&self, extra: Option<&str>) -> &Self {
        let root = self.root().display();
        let mut config = format!(
            r#"version: "1"
commands:
  systemctl:
    path: "{root}/bin/systemctl"
  update_rc:
    path: "{root}/bin/update-rc.d"
  invoke_rc:
    path: "{root}/bin/invoke-rc.d"
  service:
    path: "{root}/bin/service"
paths:
  unit_runtime_dir: "{root}/run/systemd/system"
  script_dirs:
    - "{root}/etc/init.d"
  rc_dirs: "{root}/etc/rc*.d"
"#
        );
        if let Some(extra) = extra {
            config.push_str(extra);
        }
        fs::write(self.config_path(), config).expect("failed to write config");
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.path("debsvc.yaml")
    }

    /// The binary, pointed at this host's configuration.
    pub fn debsvc(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("debsvc"));
        cmd.arg("--config").arg(self.config_path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Every management command invocation so far, in order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.path("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

pub fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).expect("failed to write executable");
    let mut perms = fs::metadata(path).expect("failed to stat executable").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("failed to chmod executable");
}
