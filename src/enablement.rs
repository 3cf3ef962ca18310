//! Boot-enablement resolution.
//!
//! Native units are asked through `systemctl is-enabled`. Everything else (hosts
//! without systemd, and units systemd generated from an init script) goes through
//! `invoke-rc.d --query`, whose exit status carries the answer:
//!
//! | status | meaning                                 | verdict                       |
//! |--------|-----------------------------------------|-------------------------------|
//! | 104    | action would run                        | enabled                       |
//! | 105    | script cannot answer                    | enabled iff >= 4 start links  |
//! | 106    | policy layer supplied a fallback action | enabled                       |
//! | other  |                                         | disabled                      |
use std::fmt;

use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::{debug, warn};

use crate::{
    classify::UnitSourceClassifier,
    config::CommandKind,
    constants::{
        INVOKE_RC_QUERY_ENABLED, INVOKE_RC_QUERY_FALLBACK, INVOKE_RC_QUERY_UNKNOWN,
        START_LINK_PREFIX, START_LINK_THRESHOLD,
    },
    error::ServiceError,
    host::Host,
    probe::glob_escape,
    service::Service,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EnablementStatus {
    Enabled,
    Disabled,
}

impl EnablementStatus {
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

/// How a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Basis {
    /// `systemctl is-enabled` answered; `code` is absent when it was killed by a signal.
    UnitManager { code: Option<i32> },
    /// `invoke-rc.d` answered with a policy status (104 or 106).
    LegacyPolicy { code: i32 },
    /// The script could not answer (105); start links were counted instead.
    StartLinks { count: usize },
    /// Any other legacy outcome, including a query that could not run.
    Unresolved { code: Option<i32> },
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::UnitManager { code: Some(code) } => {
                write!(f, "systemctl is-enabled exited with {code}")
            }
            Basis::UnitManager { code: None } => {
                write!(f, "systemctl is-enabled did not exit normally")
            }
            Basis::LegacyPolicy { code } => write!(f, "invoke-rc.d query exited with {code}"),
            Basis::StartLinks { count } => write!(
                f,
                "invoke-rc.d could not answer; {count} start link(s), {START_LINK_THRESHOLD} needed"
            ),
            Basis::Unresolved { code: Some(code) } => {
                write!(f, "invoke-rc.d query exited with {code}")
            }
            Basis::Unresolved { code: None } => write!(f, "invoke-rc.d query did not exit normally"),
        }
    }
}

/// Enablement answer plus the evidence behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub status: EnablementStatus,
    pub basis: Basis,
}

impl Verdict {
    fn new(enabled: bool, basis: Basis) -> Self {
        let status = if enabled {
            EnablementStatus::Enabled
        } else {
            EnablementStatus::Disabled
        };
        Self { status, basis }
    }
}

/// Answers "does this service start at boot" using the strategy its backend needs.
///
/// Nothing is cached; each call reads the live host.
pub struct EnablementResolver<'a> {
    host: &'a Host,
}

impl<'a> EnablementResolver<'a> {
    pub fn new(host: &'a Host) -> Self {
        Self { host }
    }

    /// Resolves the enablement of `service`.
    ///
    /// A failing query exit status degrades to disabled, as does any failure of the
    /// legacy query. A failed unit classification, or a `systemctl` that cannot
    /// run, is returned as an error.
    pub fn resolve(&self, service: &Service) -> Result<Verdict, ServiceError> {
        let name = service.name();
        let verdict = if self.host.supports_unit_manager()
            && !UnitSourceClassifier::new(self.host).is_script_backed(name)?
        {
            self.query_unit_manager(name)?
        } else {
            self.query_legacy(name)
        };

        debug!(
            "Service '{name}' is {}: {}",
            verdict.status.as_ref(),
            verdict.basis
        );
        Ok(verdict)
    }

    pub fn is_enabled(&self, service: &Service) -> Result<bool, ServiceError> {
        Ok(self.resolve(service)?.status.is_enabled())
    }

    /// systemd reports "disabled" and "not-found" through a failing exit status.
    /// A `systemctl` that cannot run at all is an error, not a verdict.
    fn query_unit_manager(&self, name: &str) -> Result<Verdict, ServiceError> {
        let output = self.host.run(CommandKind::Systemctl, &["is-enabled", name])?;
        Ok(Verdict::new(
            output.success(),
            Basis::UnitManager { code: output.code },
        ))
    }

    /// Only the exit status is consulted; the query prints nothing reliable.
    fn query_legacy(&self, name: &str) -> Verdict {
        match self
            .host
            .run(CommandKind::InvokeRc, &["--quiet", "--query", name, "start"])
        {
            Ok(output) => interpret_legacy_status(output.code, || self.count_start_links(name)),
            Err(err) => {
                warn!("Could not query legacy policy for '{name}': {err}");
                Verdict::new(false, Basis::Unresolved { code: None })
            }
        }
    }

    /// Counts `S??<name>` entries across the run-level directories.
    pub fn count_start_links(&self, name: &str) -> usize {
        let pattern = start_link_pattern(&self.host.paths().rc_dirs, name);
        match self.host.probe().glob(&pattern) {
            Ok(matches) => matches.len(),
            Err(err) => {
                warn!("Could not count start links for '{name}': {err}");
                0
            }
        }
    }
}

fn start_link_pattern(rc_dirs: &str, name: &str) -> String {
    format!(
        "{}/{START_LINK_PREFIX}{}",
        rc_dirs.trim_end_matches('/'),
        glob_escape(name)
    )
}

/// Maps an `invoke-rc.d --query` exit status to a verdict. `start_links` is only
/// evaluated for the "cannot answer" status.
pub fn interpret_legacy_status(
    code: Option<i32>,
    start_links: impl FnOnce() -> usize,
) -> Verdict {
    match code {
        Some(code @ (INVOKE_RC_QUERY_ENABLED | INVOKE_RC_QUERY_FALLBACK)) => {
            Verdict::new(true, Basis::LegacyPolicy { code })
        }
        Some(INVOKE_RC_QUERY_UNKNOWN) => {
            let count = start_links();
            Verdict::new(count >= START_LINK_THRESHOLD, Basis::StartLinks { count })
        }
        code => Verdict::new(false, Basis::Unresolved { code }),
    }
}
