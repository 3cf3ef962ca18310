//! Start, stop, restart, status and boot toggling.
//!
//! Run-state actions always go through `service(8)`, which dispatches to systemd or
//! the init script as appropriate. Boot toggling picks `systemctl` or `update-rc.d`
//! depending on the detected backend.
use std::fmt;

use strum_macros::{AsRefStr, EnumString};
use tracing::info;

use crate::{
    config::CommandKind, error::ServiceError, host::Host, runner::CommandLine,
    service::Service,
};

/// Actions dispatched through the generic service front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum LifecycleAction {
    Start,
    Stop,
    Restart,
    Status,
}

/// Boot toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum BootAction {
    Enable,
    Disable,
}

/// What the caller declares its service script supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub has_restart: bool,
    pub has_status: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            has_restart: false,
            has_status: true,
        }
    }
}

/// Result of a restart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    Restarted,
    /// No restart command exists; the caller should stop and then start.
    NoNativeRestart,
}

/// Result of a status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Running,
    Stopped,
    /// No status command exists; the caller should use its own detection.
    NoNativeStatus,
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusOutcome::Running => write!(f, "running"),
            StatusOutcome::Stopped => write!(f, "stopped"),
            StatusOutcome::NoNativeStatus => write!(f, "unknown"),
        }
    }
}

/// Uniform lifecycle dispatch over both backends.
pub struct LifecycleController<'a> {
    host: &'a Host,
}

impl<'a> LifecycleController<'a> {
    pub fn new(host: &'a Host) -> Self {
        Self { host }
    }

    /// The command line for `action`, or `None` when the declared capabilities
    /// leave no native command for it.
    pub fn command_line(
        &self,
        action: LifecycleAction,
        service: &Service,
        capabilities: Capabilities,
    ) -> Result<Option<CommandLine>, ServiceError> {
        let native = match action {
            LifecycleAction::Start | LifecycleAction::Stop => true,
            LifecycleAction::Restart => capabilities.has_restart,
            LifecycleAction::Status => capabilities.has_status,
        };
        if !native {
            return Ok(None);
        }

        self.host
            .command_line(CommandKind::Service, &[service.name(), action.as_ref()])
            .map(Some)
    }

    /// The command line that enables or disables `service` at boot.
    pub fn boot_command_line(
        &self,
        action: BootAction,
        service: &Service,
    ) -> Result<CommandLine, ServiceError> {
        if self.host.supports_unit_manager() {
            self.host
                .command_line(CommandKind::Systemctl, &[action.as_ref(), service.name()])
        } else {
            self.host
                .command_line(CommandKind::UpdateRc, &[service.name(), action.as_ref()])
        }
    }

    pub fn start(&self, service: &Service) -> Result<(), ServiceError> {
        self.run_required(LifecycleAction::Start, service)
    }

    pub fn stop(&self, service: &Service) -> Result<(), ServiceError> {
        self.run_required(LifecycleAction::Stop, service)
    }

    /// Restarts natively when `has_restart`; otherwise runs nothing.
    pub fn restart(
        &self,
        service: &Service,
        has_restart: bool,
    ) -> Result<RestartOutcome, ServiceError> {
        let capabilities = Capabilities {
            has_restart,
            ..Capabilities::default()
        };
        let Some(command) =
            self.command_line(LifecycleAction::Restart, service, capabilities)?
        else {
            return Ok(RestartOutcome::NoNativeRestart);
        };

        info!("Restarting service '{}'", service.name());
        self.host.execute_line(&command)?;
        Ok(RestartOutcome::Restarted)
    }

    /// Queries the run state when `has_status`; otherwise runs nothing.
    ///
    /// Exit status 0 means running and anything else stopped, per the LSB status
    /// convention. Only a command that cannot run is an error.
    pub fn status(
        &self,
        service: &Service,
        has_status: bool,
    ) -> Result<StatusOutcome, ServiceError> {
        let capabilities = Capabilities {
            has_status,
            ..Capabilities::default()
        };
        if self
            .command_line(LifecycleAction::Status, service, capabilities)?
            .is_none()
        {
            return Ok(StatusOutcome::NoNativeStatus);
        }

        let output = self
            .host
            .run(CommandKind::Service, &[service.name(), "status"])?;
        Ok(if output.success() {
            StatusOutcome::Running
        } else {
            StatusOutcome::Stopped
        })
    }

    pub fn enable(&self, service: &Service) -> Result<(), ServiceError> {
        self.toggle(BootAction::Enable, service)
    }

    pub fn disable(&self, service: &Service) -> Result<(), ServiceError> {
        self.toggle(BootAction::Disable, service)
    }

    fn toggle(&self, action: BootAction, service: &Service) -> Result<(), ServiceError> {
        let command = self.boot_command_line(action, service)?;
        info!("Running {} for service '{}': `{command}`", action.as_ref(), service.name());
        self.host.execute_line(&command)?;
        Ok(())
    }

    fn run_required(
        &self,
        action: LifecycleAction,
        service: &Service,
    ) -> Result<(), ServiceError> {
        let command = self
            .host
            .command_line(CommandKind::Service, &[service.name(), action.as_ref()])?;

        info!("Running {} for service '{}'", action.as_ref(), service.name());
        self.host.execute_line(&command)?;
        Ok(())
    }
}
