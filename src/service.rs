//! Service handles.
use std::path::PathBuf;

use serde::Serialize;
use strum_macros::{AsRefStr, EnumString};

use crate::error::ServiceError;

/// Enablement column of a unit file listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UnitFileState {
    Enabled,
    Disabled,
}

/// Where a service was discovered. Discovery metadata only; never consulted for
/// live state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Origin {
    /// Listed by the unit manager, with the state it reported at listing time.
    UnitFile { state: UnitFileState },
    /// Found as an init script in `dir`.
    InitScript { dir: PathBuf },
    /// Named directly by the caller.
    Declared,
}

/// A host service identified by name.
///
/// A handle, not a cache: every query re-derives state from the live host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    name: String,
    origin: Origin,
}

impl Service {
    /// A service named by the caller.
    pub fn new(name: impl Into<String>) -> Result<Self, ServiceError> {
        Self::with_origin(name, Origin::Declared)
    }

    pub fn from_unit_file(
        name: impl Into<String>,
        state: UnitFileState,
    ) -> Result<Self, ServiceError> {
        Self::with_origin(name, Origin::UnitFile { state })
    }

    pub fn from_init_script(
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Result<Self, ServiceError> {
        Self::with_origin(name, Origin::InitScript { dir: dir.into() })
    }

    fn with_origin(name: impl Into<String>, origin: Origin) -> Result<Self, ServiceError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self { name, origin })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

/// Rejects names that cannot be handed to the host tools as a single positional
/// argument or joined onto a directory.
fn validate_name(name: &str) -> Result<(), ServiceError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.starts_with('-')
        || name.contains('/')
        || name.chars().any(|c| c.is_whitespace() || c == '\0');

    if invalid {
        return Err(ServiceError::InvalidServiceName(name.to_string()));
    }
    Ok(())
}
