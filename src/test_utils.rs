//! Scripted collaborators shared by unit and integration tests.
use std::{
    collections::{HashMap, HashSet},
    io,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

use crate::{
    error::ServiceError,
    probe::{DirEntryInfo, FilesystemProbe},
    runner::{CommandLine, CommandOutput, CommandRunner},
};

/// Global lock for tests that touch process-wide state (environment variables,
/// freshly written executables).
pub static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone)]
enum Reply {
    Output(CommandOutput),
    Unavailable,
}

/// Command runner that answers from a table keyed by argv and records every call.
///
/// Commands without a scripted reply behave like a missing executable.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: HashMap<Vec<String>, Reply>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts an exit code and stdout for the exact argv.
    pub fn reply(mut self, argv: &[&str], code: i32, stdout: &str) -> Self {
        self.replies.insert(
            to_owned(argv),
            Reply::Output(CommandOutput::exited(code, stdout)),
        );
        self
    }

    /// Scripts a full output (signals, stderr) for the exact argv.
    pub fn reply_with(mut self, argv: &[&str], output: CommandOutput) -> Self {
        self.replies.insert(to_owned(argv), Reply::Output(output));
        self
    }

    /// Scripts the executable as missing for the exact argv.
    pub fn unavailable(mut self, argv: &[&str]) -> Self {
        self.replies.insert(to_owned(argv), Reply::Unavailable);
        self
    }

    /// Every argv run so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, ServiceError> {
        let argv = command.argv();
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(argv.clone());

        match self.replies.get(&argv) {
            Some(Reply::Output(output)) => Ok(output.clone()),
            Some(Reply::Unavailable) | None => Err(ServiceError::CommandUnavailable {
                command: command.program.display().to_string(),
            }),
        }
    }
}

fn to_owned(argv: &[&str]) -> Vec<String> {
    argv.iter().map(|arg| arg.to_string()).collect()
}

/// In-memory filesystem view.
#[derive(Debug, Default)]
pub struct FakeProbe {
    paths: HashSet<PathBuf>,
    dirs: HashMap<PathBuf, Vec<DirEntryInfo>>,
    globs: HashMap<String, Vec<PathBuf>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `path` as existing.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(path.into());
        self
    }

    /// Marks several paths as existing.
    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds an entry to a directory, creating the directory if needed.
    pub fn with_entry(mut self, dir: impl Into<PathBuf>, entry: DirEntryInfo) -> Self {
        self.dirs.entry(dir.into()).or_default().push(entry);
        self
    }

    /// Adds an executable init script to a directory.
    pub fn with_script(self, dir: impl Into<PathBuf>, name: &str) -> Self {
        self.with_entry(dir, script_entry(name))
    }

    /// Scripts the result of one exact glob pattern.
    pub fn with_glob<I, P>(mut self, pattern: &str, matches: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.globs.insert(
            pattern.to_string(),
            matches.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl FilesystemProbe for FakeProbe {
    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path) || self.dirs.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains_key(path)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, ServiceError> {
        Ok(self.globs.get(pattern).cloned().unwrap_or_default())
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        self.dirs.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{}", path.display()))
        })
    }
}

/// An executable regular file.
pub fn script_entry(name: &str) -> DirEntryInfo {
    DirEntryInfo {
        name: name.to_string(),
        is_dir: false,
        executable: true,
        link_target: None,
    }
}
