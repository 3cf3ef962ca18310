//! Filesystem probing: existence checks, glob matching and directory listings.
use std::{
    fs, io,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use regex::Regex;

use crate::error::ServiceError;

/// Metadata about one directory entry, as needed by init script discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// File name of the entry.
    pub name: String,
    /// Whether the entry is (or links to) a directory.
    pub is_dir: bool,
    /// Whether the entry is (or links to) a regular file with any execute bit set.
    pub executable: bool,
    /// Target of the entry when it is a symlink.
    pub link_target: Option<PathBuf>,
}

/// Read-only view of the host filesystem.
pub trait FilesystemProbe: Send + Sync {
    /// Returns whether `path` exists. Never fails: unreadable means absent.
    fn exists(&self, path: &Path) -> bool;

    /// Returns whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Expands a shell-style glob into the sorted list of matching paths.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, ServiceError>;

    /// Lists the entries of a directory.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;
}

/// Probes the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl FilesystemProbe for HostProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, ServiceError> {
        let segments = compile_glob(pattern)?;
        let root = if pattern.starts_with('/') {
            PathBuf::from("/")
        } else {
            PathBuf::new()
        };

        let mut candidates = vec![root];
        for segment in &segments {
            let mut next = Vec::new();
            for base in &candidates {
                match segment {
                    Segment::Literal(name) => {
                        let path = base.join(name);
                        if fs::symlink_metadata(&path).is_ok() {
                            next.push(path);
                        }
                    }
                    Segment::Pattern { regex, dotfiles } => {
                        let dir = if base.as_os_str().is_empty() {
                            Path::new(".")
                        } else {
                            base.as_path()
                        };
                        let Ok(entries) = fs::read_dir(dir) else {
                            continue;
                        };
                        for entry in entries.filter_map(Result::ok) {
                            let name = entry.file_name();
                            let Some(name) = name.to_str() else {
                                continue;
                            };
                            if name.starts_with('.') && !dotfiles {
                                continue;
                            }
                            if regex.is_match(name) {
                                next.push(base.join(name));
                            }
                        }
                    }
                }
            }
            candidates = next;
        }

        candidates.sort();
        Ok(candidates)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let full_path = entry.path();
            let metadata = fs::metadata(&full_path).ok();

            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: metadata.as_ref().is_some_and(|m| m.is_dir()),
                executable: metadata
                    .as_ref()
                    .is_some_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0),
                link_target: fs::read_link(&full_path).ok(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Escapes glob metacharacters so `value` only matches itself.
pub fn glob_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One path component of a compiled glob.
#[derive(Debug)]
enum Segment {
    Literal(String),
    Pattern { regex: Regex, dotfiles: bool },
}

fn compile_glob(pattern: &str) -> Result<Vec<Segment>, ServiceError> {
    if pattern.is_empty() {
        return Err(invalid(pattern, "empty pattern"));
    }

    pattern
        .split('/')
        .filter(|component| !component.is_empty())
        .map(|component| compile_component(pattern, component))
        .collect()
}

fn compile_component(pattern: &str, component: &str) -> Result<Segment, ServiceError> {
    let mut regex = String::from("^");
    let mut literal = String::new();
    let mut wildcard = false;
    let mut chars = component.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| invalid(pattern, "trailing escape character"))?;
                regex.push_str(&regex::escape(&escaped.to_string()));
                literal.push(escaped);
            }
            '*' => {
                wildcard = true;
                regex.push_str(".*");
            }
            '?' => {
                wildcard = true;
                regex.push('.');
            }
            '[' => {
                wildcard = true;
                regex.push('[');
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    regex.push('^');
                }
                let mut first = true;
                loop {
                    let c = chars
                        .next()
                        .ok_or_else(|| invalid(pattern, "unterminated character class"))?;
                    match c {
                        ']' if !first => break,
                        '-' if !first => regex.push('-'),
                        '\\' => {
                            let escaped = chars.next().ok_or_else(|| {
                                invalid(pattern, "trailing escape character")
                            })?;
                            regex.push_str(&regex::escape(&escaped.to_string()));
                        }
                        other => regex.push_str(&regex::escape(&other.to_string())),
                    }
                    first = false;
                }
                regex.push(']');
            }
            other => {
                regex.push_str(&regex::escape(&other.to_string()));
                literal.push(other);
            }
        }
    }
    regex.push('$');

    if !wildcard {
        return Ok(Segment::Literal(literal));
    }

    let regex = Regex::new(&regex).map_err(|err| invalid(pattern, &err.to_string()))?;
    Ok(Segment::Pattern {
        regex,
        dotfiles: component.starts_with('.'),
    })
}

fn invalid(pattern: &str, reason: &str) -> ServiceError {
    ServiceError::InvalidGlobPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}
