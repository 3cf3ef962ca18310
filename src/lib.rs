//! debsvc determines and changes whether Debian services start at boot, and drives
//! their start/stop/restart/status actions, on hosts running systemd, sysvinit, or
//! systemd with generated units wrapping legacy init scripts.

/// Detection of the running init system.
pub mod backend;

/// Unit source classification.
pub mod classify;

/// CLI interface.
pub mod cli;

/// Configuration management.
pub mod config;

/// Fixed host conventions.
pub mod constants;

/// Boot-enablement resolution.
pub mod enablement;

/// Error handling.
pub mod error;

/// Resolved commands and probes for one host.
pub mod host;

/// Service enumeration.
pub mod inventory;

/// Lifecycle and boot toggling.
pub mod lifecycle;

/// Filesystem probing.
pub mod probe;

/// External command execution.
pub mod runner;

/// Service handles.
pub mod service;

#[doc(hidden)]
pub mod test_utils;
