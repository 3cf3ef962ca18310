//! Detection of the init system running on the host.
use std::{path::PathBuf, sync::OnceLock};

use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::debug;

use crate::probe::FilesystemProbe;

/// Which mechanism answers boot-enablement questions for native services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Backend {
    /// systemd is running and its CLI is installed.
    UnitManager,
    /// Only sysvinit tooling is usable.
    Legacy,
}

/// Decides once whether systemd is present and operable.
///
/// The answer is computed on first use and never invalidated: the running init
/// does not change underneath a single process.
#[derive(Debug)]
pub struct BackendDetector {
    runtime_dir: PathBuf,
    manager_cli_available: bool,
    cached: OnceLock<bool>,
}

impl BackendDetector {
    pub fn new(runtime_dir: impl Into<PathBuf>, manager_cli_available: bool) -> Self {
        Self {
            runtime_dir: runtime_dir.into(),
            manager_cli_available,
            cached: OnceLock::new(),
        }
    }

    pub fn supports_unit_manager(&self, probe: &dyn FilesystemProbe) -> bool {
        *self.cached.get_or_init(|| {
            let runtime_present = probe.exists(&self.runtime_dir);
            debug!(
                "Unit manager runtime dir {} present: {runtime_present}, CLI available: {}",
                self.runtime_dir.display(),
                self.manager_cli_available
            );
            runtime_present && self.manager_cli_available
        })
    }

    pub fn backend(&self, probe: &dyn FilesystemProbe) -> Backend {
        if self.supports_unit_manager(probe) {
            Backend::UnitManager
        } else {
            Backend::Legacy
        }
    }
}
