//! Enumeration of every service the host knows about.
//!
//! Units listed by systemd come first; init scripts only fill in names systemd did
//! not report. A script with a generated unit therefore appears once, as the unit.
use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
};

use regex::Regex;
use tracing::{debug, warn};

use crate::{
    config::CommandKind,
    constants::{DEFAULT_SCRIPT_EXCLUDES, UPSTART_JOB_WRAPPER},
    error::ServiceError,
    host::Host,
    probe::DirEntryInfo,
    service::{Service, UnitFileState},
};

/// Deduplicated set of services keyed by name. Iteration order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct ServiceInventory {
    services: HashMap<String, Service>,
}

impl ServiceInventory {
    /// Enumerates both backends and merges them.
    ///
    /// A unit listing the manager refuses to produce counts as empty; it never
    /// aborts the enumeration.
    pub fn collect(host: &Host) -> Self {
        let units = if host.supports_unit_manager() {
            list_unit_files(host).unwrap_or_else(|err| {
                warn!("Unit file listing failed, continuing with init scripts only: {err}");
                HashMap::new()
            })
        } else {
            HashMap::new()
        };

        let scripts = list_init_scripts(host);
        let inventory = Self::merge(units, scripts);
        debug!("Inventory holds {} services", inventory.len());
        inventory
    }

    /// Inserts script-derived services whose names the unit listing lacks.
    pub fn merge(units: HashMap<String, Service>, scripts: Vec<Service>) -> Self {
        let mut services = units;
        for script in scripts {
            services
                .entry(script.name().to_string())
                .or_insert(script);
        }
        Self { services }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    /// Services ordered by name, for display.
    pub fn sorted(&self) -> Vec<&Service> {
        let mut services: Vec<_> = self.services.values().collect();
        services.sort_by(|a, b| a.name().cmp(b.name()));
        services
    }

    pub fn into_services(self) -> Vec<Service> {
        self.services.into_values().collect()
    }
}

/// Lists unit files of the configured type with their enabled/disabled state.
pub fn list_unit_files(host: &Host) -> Result<HashMap<String, Service>, ServiceError> {
    let unit_type = host.paths().unit_type.as_str();
    let output = host.execute(
        CommandKind::Systemctl,
        &[
            "list-unit-files",
            "--type",
            unit_type,
            "--full",
            "--all",
            "--no-pager",
        ],
    )?;

    let mut services = HashMap::new();
    for (name, state) in parse_unit_listing(&output.stdout, unit_type)? {
        match Service::from_unit_file(name.clone(), state) {
            Ok(service) => {
                services.insert(name, service);
            }
            Err(err) => warn!("Skipping unit listed by the unit manager: {err}"),
        }
    }
    Ok(services)
}

/// Extracts `(name, state)` pairs from `systemctl list-unit-files` output.
///
/// Only `enabled` and `disabled` rows count; static, masked, generated and similar
/// units are not boot-toggleable services. A trailing vendor-preset column is
/// tolerated.
pub fn parse_unit_listing(
    output: &str,
    unit_type: &str,
) -> Result<Vec<(String, UnitFileState)>, ServiceError> {
    let pattern = format!(
        r"(?im)^(\S+)\.{}[ \t]+(disabled|enabled)(?:[ \t]+\S+)?[ \t]*$",
        regex::escape(unit_type)
    );
    let re = Regex::new(&pattern)
        .map_err(|_| ServiceError::InvalidUnitType(unit_type.to_string()))?;

    Ok(re
        .captures_iter(output)
        .filter_map(|caps| {
            let state = UnitFileState::from_str(&caps[2]).ok()?;
            Some((caps[1].to_string(), state))
        })
        .collect())
}

/// Scans the configured init script directories.
pub fn list_init_scripts(host: &Host) -> Vec<Service> {
    let probe = host.probe();
    let mut seen = HashSet::new();
    let mut services = Vec::new();

    for dir in &host.paths().script_dirs {
        if !probe.is_dir(dir) {
            debug!("Init script directory {} does not exist", dir.display());
            continue;
        }

        let entries = match probe.list_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Failed to read init script directory {}: {err}", dir.display());
                continue;
            }
        };

        for entry in entries {
            if !is_init_script(&entry, host.excludes()) || !seen.insert(entry.name.clone()) {
                continue;
            }
            match Service::from_init_script(entry.name, dir.clone()) {
                Ok(service) => services.push(service),
                Err(err) => warn!("Skipping init script in {}: {err}", dir.display()),
            }
        }
    }

    services
}

/// Whether a directory entry is a manageable init script.
fn is_init_script(entry: &DirEntryInfo, extra_excludes: &[String]) -> bool {
    if entry.name.starts_with('.')
        || DEFAULT_SCRIPT_EXCLUDES.contains(&entry.name.as_str())
        || extra_excludes.iter().any(|name| *name == entry.name)
        || entry.is_dir
        || !entry.executable
    {
        return false;
    }

    entry
        .link_target
        .as_deref()
        .is_none_or(|target| target != std::path::Path::new(UPSTART_JOB_WRAPPER))
}
