//! Resource-cache and file-system boundary.
//!
//! [`ResourceCache`] resolves logical resource names; [`FileSystem`] covers
//! raw file queries, directory creation and synchronous process execution.
//! Host implementations backed by `std` are provided for both.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::UNIX_EPOCH;

use crate::errors::{PrismError, Result};

/// Result of a synchronous external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit status; zero means success
    pub exit_code: i32,
    /// Captured stdout followed by stderr
    pub output: String,
}

impl ProcessOutput {
    #[inline]
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Resource lookup by logical name.
///
/// Names may be relative to the resource directories or absolute paths.
pub trait ResourceCache: Send + Sync {
    fn exists(&self, name: &str) -> bool;

    /// Reads the whole resource.
    fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Absolute path of the file backing a resource, or `None` when the
    /// resource does not come from a plain file (e.g. a package).
    fn resource_file_name(&self, name: &str) -> Option<PathBuf>;
}

/// Raw file-system and process access.
pub trait FileSystem: Send + Sync {
    fn file_exists(&self, path: &Path) -> bool;

    fn dir_exists(&self, path: &Path) -> bool;

    /// Creates a directory and any missing parents.
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Modification time in seconds since the Unix epoch, or 0 if unknown.
    fn last_modified_time(&self, path: &Path) -> u64;

    /// Directory of the running program.
    fn program_dir(&self) -> PathBuf;

    /// Reads a whole file.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Runs a command to completion on the calling thread, capturing its output.
    fn system_command(&self, program: &Path, args: &[String]) -> Result<ProcessOutput>;
}

// ─── Host implementations ────────────────────────────────────────────────────

/// [`FileSystem`] over `std::fs` and `std::process`.
#[derive(Debug, Clone)]
pub struct HostFileSystem {
    program_dir: PathBuf,
}

impl Default for HostFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFileSystem {
    /// Uses the directory of the current executable as program directory.
    #[must_use]
    pub fn new() -> Self {
        let program_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self { program_dir }
    }

    /// Overrides the program directory used to locate the shader compiler.
    #[must_use]
    pub fn with_program_dir(program_dir: impl Into<PathBuf>) -> Self {
        Self {
            program_dir: program_dir.into(),
        }
    }
}

impl FileSystem for HostFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    fn last_modified_time(&self, path: &Path) -> u64 {
        std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_secs())
    }

    fn program_dir(&self) -> PathBuf {
        self.program_dir.clone()
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn system_command(&self, program: &Path, args: &[String]) -> Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| PrismError::CompilerLaunch {
                executable: program.to_path_buf(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ProcessOutput {
            // Killed by a signal: no code, report as failure
            exit_code: output.status.code().unwrap_or(-1),
            output: text,
        })
    }
}

/// [`ResourceCache`] over an ordered list of resource directories.
///
/// Relative names are searched in each directory in order; absolute names
/// are used as-is.
#[derive(Debug, Clone, Default)]
pub struct DirectoryResourceCache {
    resource_dirs: Vec<PathBuf>,
}

impl DirectoryResourceCache {
    #[must_use]
    pub fn new(resource_dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            resource_dirs: resource_dirs.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn resource_dirs(&self) -> &[PathBuf] {
        &self.resource_dirs
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        let path = Path::new(name);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        self.resource_dirs
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
    }
}

impl ResourceCache for DirectoryResourceCache {
    fn exists(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self
            .locate(name)
            .ok_or_else(|| PrismError::ResourceNotFound(name.to_string()))?;
        Ok(std::fs::read(path)?)
    }

    fn resource_file_name(&self, name: &str) -> Option<PathBuf> {
        self.locate(name)
    }
}
