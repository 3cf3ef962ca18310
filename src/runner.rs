//! External command execution.
use std::{
    fmt,
    io::ErrorKind,
    os::unix::process::ExitStatusExt,
    path::PathBuf,
    process::{Command, Stdio},
};

use nix::sys::signal::Signal;
use tracing::debug;

use crate::error::ServiceError;

/// A fully resolved command line: executable path plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Executable to run.
    pub program: PathBuf,
    /// Arguments passed verbatim, without a shell.
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The argument vector with the program first, as tests and logs see it.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Termination status and captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, absent when the process was killed by a signal.
    pub code: Option<i32>,
    /// Terminating signal number, if any.
    pub signal: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a process that exited normally.
    pub fn exited(code: i32, stdout: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Output of a process terminated by `signal`.
    pub fn killed(signal: i32) -> Self {
        Self {
            signal: Some(signal),
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Renders the termination status as `exit code N` or `signal NAME`.
    pub fn describe_status(&self) -> String {
        match (self.code, self.signal) {
            (Some(code), _) => format!("exit code {code}"),
            (None, Some(signal)) => match Signal::try_from(signal) {
                Ok(signal) => format!("signal {}", signal.as_str()),
                Err(_) => format!("signal {signal}"),
            },
            (None, None) => "unknown status".to_string(),
        }
    }

    /// Converts a non-zero exit into [`ServiceError::CommandFailed`].
    pub fn into_result(self, command: &CommandLine) -> Result<Self, ServiceError> {
        if self.success() {
            return Ok(self);
        }

        let output = [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Err(ServiceError::CommandFailed {
            command: command.to_string(),
            status: self.describe_status(),
            output,
        })
    }
}

/// Runs external commands on behalf of the core.
///
/// Implementations never retry; timeouts and cancellation are theirs to decide.
pub trait CommandRunner: Send + Sync {
    /// Runs `command` to completion and captures its status and output.
    ///
    /// A missing executable is reported as [`ServiceError::CommandUnavailable`];
    /// a non-zero exit is *not* an error at this layer.
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, ServiceError>;
}

/// Runs commands directly on the local host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, ServiceError> {
        debug!("Executing command: `{command}`");

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => ServiceError::CommandUnavailable {
                    command: command.program.display().to_string(),
                },
                _ => ServiceError::CommandSpawnError {
                    command: command.to_string(),
                    source: err,
                },
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            signal: output.status.signal(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("`{command}` finished with {}", result.describe_status());

        Ok(result)
    }
}
