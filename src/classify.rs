//! Classification of systemd units as native or generated from an init script.
use std::path::{Path, PathBuf};

use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::debug;

use crate::{
    config::CommandKind,
    constants::{INSTANCE_SEPARATOR, SOURCE_PATH_PROPERTY},
    error::ServiceError,
    host::Host,
};

/// What backs a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UnitSourceKind {
    /// A unit file written for systemd.
    Native,
    /// A unit the sysv generator produced from an init script.
    ShimOverScript,
    /// The unit manager reported no source path at all.
    Unknown,
}

/// Asks the unit manager where a unit came from.
pub struct UnitSourceClassifier<'a> {
    host: &'a Host,
}

impl<'a> UnitSourceClassifier<'a> {
    pub fn new(host: &'a Host) -> Self {
        Self { host }
    }

    /// Classifies the unit behind `name`.
    ///
    /// Only meaningful once the unit manager is known to be present: a failing
    /// `systemctl show` is returned as an error.
    pub fn source_kind(&self, name: &str) -> Result<UnitSourceKind, ServiceError> {
        let unit = unit_query_name(name);
        let property = format!("-p{SOURCE_PATH_PROPERTY}");
        let output = self
            .host
            .execute(CommandKind::Systemctl, &["show", &property, &unit])?;

        let kind = classify_source_path(
            parse_source_path(&output.stdout),
            &self.host.paths().script_dirs,
        );
        debug!("Unit '{unit}' classified as {}", kind.as_ref());
        Ok(kind)
    }

    /// Whether `name` is a generated wrapper around a legacy init script.
    pub fn is_script_backed(&self, name: &str) -> Result<bool, ServiceError> {
        Ok(self.source_kind(name)? == UnitSourceKind::ShimOverScript)
    }
}

/// Template instances report the template's source path, so the instance
/// separator is dropped before querying.
fn unit_query_name(name: &str) -> String {
    name.replace(INSTANCE_SEPARATOR, "")
}

/// Extracts the `SourcePath=` value from `systemctl show` output.
fn parse_source_path(stdout: &str) -> Option<&str> {
    stdout.lines().find_map(|line| {
        line.trim()
            .strip_prefix(SOURCE_PATH_PROPERTY)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::trim)
    })
}

fn classify_source_path(source: Option<&str>, script_dirs: &[PathBuf]) -> UnitSourceKind {
    let Some(source) = source else {
        return UnitSourceKind::Unknown;
    };

    let source = Path::new(source);
    let under_script_dir = script_dirs
        .iter()
        .any(|dir| source != dir && source.starts_with(dir));

    if under_script_dir {
        UnitSourceKind::ShimOverScript
    } else {
        UnitSourceKind::Native
    }
}
