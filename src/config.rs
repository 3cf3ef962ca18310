//! Configuration management for debsvc.
use regex::Regex;
use serde::Deserialize;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter};

use crate::constants::{
    CONFIG_VERSION, DEFAULT_INIT_SCRIPT_DIR, DEFAULT_INVOKE_RC_PATH, DEFAULT_RC_DIRS,
    DEFAULT_SERVICE_PATH, DEFAULT_SYSTEMCTL_PATH, DEFAULT_UNIT_RUNTIME_DIR,
    DEFAULT_UNIT_TYPE, DEFAULT_UPDATE_RC_PATH,
};
use crate::error::ServiceError;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{?([A-Za-z_][A-Za-z0-9_]*)\}?").expect("env var pattern is valid")
});

/// External commands the core knows how to drive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    /// The systemd control CLI.
    Systemctl,
    /// Legacy enable/disable front end (`update-rc.d`).
    UpdateRc,
    /// Legacy policy-aware query front end (`invoke-rc.d`).
    InvokeRc,
    /// Generic start/stop front end (`service`).
    Service,
}

impl CommandKind {
    /// Conventional Debian location of the executable.
    pub fn default_path(self) -> &'static str {
        match self {
            Self::Systemctl => DEFAULT_SYSTEMCTL_PATH,
            Self::UpdateRc => DEFAULT_UPDATE_RC_PATH,
            Self::InvokeRc => DEFAULT_INVOKE_RC_PATH,
            Self::Service => DEFAULT_SERVICE_PATH,
        }
    }

    /// Only systemctl is optional: its absence just means the host runs sysvinit.
    pub fn required_by_default(self) -> bool {
        !matches!(self, Self::Systemctl)
    }
}

/// One row of the command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Symbolic command name.
    pub name: CommandKind,
    /// Executable path.
    pub path: PathBuf,
    /// Whether startup fails when the executable is missing.
    pub required: bool,
}

/// Per-command overrides as written in the config file.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CommandOverride {
    /// Replacement executable path.
    pub path: Option<String>,
    /// Replacement required flag.
    pub required: Option<bool>,
}

/// Host filesystem layout consulted by the core.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory that exists only while systemd is the running init.
    pub unit_runtime_dir: PathBuf,
    /// Directories scanned for legacy init scripts, in priority order.
    pub script_dirs: Vec<PathBuf>,
    /// Glob matching every run-level directory.
    pub rc_dirs: String,
    /// Unit type listed by the inventory (`service`).
    pub unit_type: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            unit_runtime_dir: PathBuf::from(DEFAULT_UNIT_RUNTIME_DIR),
            script_dirs: vec![PathBuf::from(DEFAULT_INIT_SCRIPT_DIR)],
            rc_dirs: DEFAULT_RC_DIRS.to_string(),
            unit_type: DEFAULT_UNIT_TYPE.to_string(),
        }
    }
}

/// Represents the structure of the configuration file.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Configuration version.
    pub version: String,
    /// Overrides for the command table.
    #[serde(default)]
    pub commands: HashMap<CommandKind, CommandOverride>,
    /// Filesystem layout.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Extra init script names the inventory ignores.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            commands: HashMap::new(),
            paths: PathsConfig::default(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Builds the full command table, applying overrides on top of the defaults.
    pub fn command_specs(&self) -> Vec<CommandSpec> {
        CommandKind::iter()
            .map(|name| {
                let overrides = self.commands.get(&name);
                CommandSpec {
                    name,
                    path: overrides
                        .and_then(|o| o.path.as_deref())
                        .unwrap_or(name.default_path())
                        .into(),
                    required: overrides
                        .and_then(|o| o.required)
                        .unwrap_or(name.required_by_default()),
                }
            })
            .collect()
    }
}

/// Expands `$VAR` and `${VAR}` references; every referenced variable must be set.
fn expand_env_vars(input: &str) -> Result<String, ServiceError> {
    if let Some(missing) = ENV_VAR_PATTERN
        .captures_iter(input)
        .map(|caps| caps[1].to_string())
        .find(|name| env::var(name).is_err())
    {
        return Err(ServiceError::MissingEnvVar(missing));
    }

    let result = ENV_VAR_PATTERN.replace_all(input, |caps: &regex::Captures| {
        env::var(&caps[1]).unwrap_or_default()
    });
    Ok(result.into_owned())
}

/// Loads and parses the configuration file, expanding environment variables.
///
/// Without a path the built-in Debian defaults are returned.
pub fn load_config(config_path: Option<&str>) -> Result<Config, ServiceError> {
    let Some(config_path) = config_path.map(Path::new) else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(config_path).map_err(|e| {
        ServiceError::ConfigReadError(std::io::Error::new(
            e.kind(),
            format!("{} ({})", e, config_path.display()),
        ))
    })?;

    let expanded_content = expand_env_vars(&content)?;
    let config: Config = serde_yaml::from_str(&expanded_content)
        .map_err(ServiceError::ConfigParseError)?;

    if config.version != CONFIG_VERSION {
        return Err(ServiceError::UnsupportedVersion(config.version));
    }

    Ok(config)
}
