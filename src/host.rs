//! The host the core operates on: resolved commands, probes and layout.
use std::{collections::BTreeMap, path::Path, sync::Arc};

use tracing::debug;

use crate::{
    backend::{Backend, BackendDetector},
    config::{CommandKind, CommandSpec, Config, PathsConfig},
    error::ServiceError,
    probe::{FilesystemProbe, HostProbe},
    runner::{CommandLine, CommandOutput, CommandRunner, SystemRunner},
};

/// A command table entry after its path has been checked.
#[derive(Debug, Clone)]
pub struct ResolvedCommand {
    /// The configured entry.
    pub spec: CommandSpec,
    /// Whether the executable exists.
    pub available: bool,
}

/// Command table resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: BTreeMap<CommandKind, ResolvedCommand>,
}

impl CommandTable {
    /// Checks every command path. Missing required commands fail resolution; missing
    /// optional ones are recorded as unavailable.
    pub fn resolve(
        specs: Vec<CommandSpec>,
        probe: &dyn FilesystemProbe,
    ) -> Result<Self, ServiceError> {
        let mut commands = BTreeMap::new();
        for spec in specs {
            let available = probe.exists(&spec.path);
            if !available {
                if spec.required {
                    return Err(ServiceError::RequiredCommandMissing {
                        command: spec.name.as_ref().to_string(),
                        path: spec.path,
                    });
                }
                debug!(
                    "Optional command '{}' not found at {}; dependent features disabled",
                    spec.name.as_ref(),
                    spec.path.display()
                );
            }
            commands.insert(spec.name, ResolvedCommand { spec, available });
        }
        Ok(Self { commands })
    }

    pub fn is_available(&self, kind: CommandKind) -> bool {
        self.commands.get(&kind).is_some_and(|c| c.available)
    }

    pub fn get(&self, kind: CommandKind) -> Option<&ResolvedCommand> {
        self.commands.get(&kind)
    }

    /// Path of an available command.
    pub fn path(&self, kind: CommandKind) -> Result<&Path, ServiceError> {
        match self.commands.get(&kind) {
            Some(command) if command.available => Ok(command.spec.path.as_path()),
            _ => Err(ServiceError::CommandUnavailable {
                command: kind.as_ref().to_string(),
            }),
        }
    }
}

/// Everything the components need to talk to one host.
pub struct Host {
    runner: Arc<dyn CommandRunner>,
    probe: Arc<dyn FilesystemProbe>,
    commands: CommandTable,
    paths: PathsConfig,
    excludes: Vec<String>,
    backend: BackendDetector,
}

impl Host {
    /// Builds a host from configuration, resolving the command table.
    pub fn from_config(
        config: &Config,
        runner: Arc<dyn CommandRunner>,
        probe: Arc<dyn FilesystemProbe>,
    ) -> Result<Self, ServiceError> {
        let commands = CommandTable::resolve(config.command_specs(), probe.as_ref())?;
        let backend = BackendDetector::new(
            config.paths.unit_runtime_dir.clone(),
            commands.is_available(CommandKind::Systemctl),
        );

        Ok(Self {
            runner,
            probe,
            commands,
            paths: config.paths.clone(),
            excludes: config.exclude.clone(),
            backend,
        })
    }

    /// Host backed by the local machine.
    pub fn local(config: &Config) -> Result<Self, ServiceError> {
        Self::from_config(config, Arc::new(SystemRunner), Arc::new(HostProbe))
    }

    pub fn supports_unit_manager(&self) -> bool {
        self.backend.supports_unit_manager(self.probe.as_ref())
    }

    pub fn backend(&self) -> Backend {
        self.backend.backend(self.probe.as_ref())
    }

    pub fn probe(&self) -> &dyn FilesystemProbe {
        self.probe.as_ref()
    }

    pub fn paths(&self) -> &PathsConfig {
        &self.paths
    }

    /// Script names excluded by configuration, on top of the built-in list.
    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Builds the command line for `kind` with `args`.
    pub fn command_line(
        &self,
        kind: CommandKind,
        args: &[&str],
    ) -> Result<CommandLine, ServiceError> {
        Ok(CommandLine::new(
            self.commands.path(kind)?,
            args.iter().copied(),
        ))
    }

    /// Runs a command and returns its status without judging it.
    pub fn run(&self, kind: CommandKind, args: &[&str]) -> Result<CommandOutput, ServiceError> {
        let command = self.command_line(kind, args)?;
        self.runner.run(&command)
    }

    /// Runs a command that must succeed.
    pub fn execute(
        &self,
        kind: CommandKind,
        args: &[&str],
    ) -> Result<CommandOutput, ServiceError> {
        let command = self.command_line(kind, args)?;
        self.runner.run(&command)?.into_result(&command)
    }

    /// Runs an already built command line that must succeed.
    pub fn execute_line(&self, command: &CommandLine) -> Result<CommandOutput, ServiceError> {
        self.runner.run(command)?.into_result(command)
    }
}
