//! Command-line interface for debsvc.
use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

/// Wrapper around `LevelFilter` so clap can parse log levels from either
/// string names ("info", "debug", etc.) or numeric shorthands (0-5).
#[derive(Clone, Copy, Debug)]
pub struct LogLevelArg(LevelFilter);

impl LogLevelArg {
    /// String representation suitable for `RUST_LOG`.
    pub fn as_str(&self) -> &'static str {
        match self.0 {
            LevelFilter::OFF => "off",
            LevelFilter::ERROR => "error",
            LevelFilter::WARN => "warn",
            LevelFilter::INFO => "info",
            LevelFilter::DEBUG => "debug",
            LevelFilter::TRACE => "trace",
        }
    }
}

impl FromStr for LogLevelArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("log level cannot be empty".into());
        }

        if let Ok(number) = trimmed.parse::<u8>() {
            let level = match number {
                0 => LevelFilter::OFF,
                1 => LevelFilter::ERROR,
                2 => LevelFilter::WARN,
                3 => LevelFilter::INFO,
                4 => LevelFilter::DEBUG,
                5 => LevelFilter::TRACE,
                _ => {
                    return Err(format!(
                        "unsupported log level number '{number}' (expected 0-5)"
                    ));
                }
            };

            return Ok(LogLevelArg(level));
        }

        let level = match trimmed.to_ascii_lowercase().as_str() {
            "off" => Some(LevelFilter::OFF),
            "error" | "err" => Some(LevelFilter::ERROR),
            "warn" | "warning" => Some(LevelFilter::WARN),
            "info" | "information" => Some(LevelFilter::INFO),
            "debug" => Some(LevelFilter::DEBUG),
            "trace" => Some(LevelFilter::TRACE),
            _ => None,
        }
        .ok_or_else(|| format!("invalid log level '{trimmed}'"))?;

        Ok(LogLevelArg(level))
    }
}

/// Command-line interface for debsvc.
#[derive(Parser)]
#[command(name = "debsvc", version, author)]
#[command(
    about = "Query and control Debian services under systemd or sysvinit",
    long_about = None
)]
pub struct Cli {
    /// Path to a YAML configuration file (defaults to the Debian layout).
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Override the logging verbosity for this invocation only.
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for debsvc.
#[derive(Subcommand)]
pub enum Commands {
    /// Print which backend manages services on this host.
    Backend,

    /// List every service known to the host.
    List {
        /// Emit machine-readable JSON output instead of names.
        #[arg(long)]
        json: bool,
    },

    /// Show whether a unit is native or generated from an init script.
    Classify {
        /// Service name.
        name: String,
    },

    /// Report whether a service starts at boot (exit 0 enabled, 1 disabled).
    IsEnabled {
        /// Service name.
        name: String,

        /// Also print how the answer was reached.
        #[arg(long)]
        explain: bool,
    },

    /// Enable a service at boot.
    Enable {
        /// Service name.
        name: String,
    },

    /// Disable a service at boot.
    Disable {
        /// Service name.
        name: String,
    },

    /// Start a service.
    Start {
        /// Service name.
        name: String,
    },

    /// Stop a service.
    Stop {
        /// Service name.
        name: String,
    },

    /// Restart a service, falling back to stop then start without `--has-restart`.
    Restart {
        /// Service name.
        name: String,

        /// The service script implements `restart`.
        #[arg(long)]
        has_restart: bool,
    },

    /// Report the run state (exit 0 running, 3 stopped, 4 unknown).
    Status {
        /// Service name.
        name: String,

        /// The service script has no `status` action.
        #[arg(long)]
        no_status: bool,
    },
}

/// Parses command-line arguments and returns a `Cli` struct.
pub fn parse_args() -> Cli {
    Cli::parse()
}
