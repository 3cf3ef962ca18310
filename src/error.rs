//! Error handling for debsvc.
use std::path::PathBuf;

use thiserror::Error;

/// Defines all possible errors raised while querying or changing host services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Error reading or accessing a configuration file.
    #[error("Failed to read config file: {0}")]
    ConfigReadError(#[from] std::io::Error),

    /// Error parsing YAML configuration.
    #[error("Invalid YAML format: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// The configuration references an environment variable that is not set.
    #[error("Missing environment variable referenced in config: {0}")]
    MissingEnvVar(String),

    /// The configuration declares a schema version this build does not understand.
    #[error("Unsupported config version '{0}'")]
    UnsupportedVersion(String),

    /// A command marked as required does not exist on this host.
    #[error("Required command '{command}' not found at {}", .path.display())]
    RequiredCommandMissing {
        /// Symbolic command name from the command table.
        command: String,
        /// Path that was probed.
        path: PathBuf,
    },

    /// A command is needed but is not available on this host.
    #[error("Command '{command}' is not available on this host")]
    CommandUnavailable {
        /// Symbolic command name or path of the missing executable.
        command: String,
    },

    /// Error spawning an external command.
    #[error("Failed to execute '{command}': {source}")]
    CommandSpawnError {
        /// The command line that could not be spawned.
        command: String,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },

    /// An external command finished unsuccessfully where success was required.
    #[error("Command '{command}' failed with {status}{}", format_output(.output))]
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// Human-readable termination status (`exit code 1`, `signal SIGKILL`).
        status: String,
        /// Captured output of the failed command.
        output: String,
    },

    /// A service name that cannot be passed safely to the host tools.
    #[error("Invalid service name '{0}'")]
    InvalidServiceName(String),

    /// The configured unit type cannot be matched in a unit listing.
    #[error("Unit type '{0}' cannot be used to match unit listings")]
    InvalidUnitType(String),

    /// A filesystem glob pattern could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern {
        /// The offending pattern.
        pattern: String,
        /// Why the pattern was rejected.
        reason: String,
    },
}

fn format_output(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
