//! Loading cached bytecode.

use std::path::Path;

use super::cache_key;
use crate::errors::Result;
use crate::renderer::core::FileSystem;

/// Outcome of looking up a cached artifact.
///
/// Only [`Loaded`](Self::Loaded) carries bytecode; every other outcome sends
/// the caller down the compile path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BytecodeLoad {
    Loaded(Vec<u8>),
    /// No artifact at the path.
    NotFound,
    /// Artifact is older than the source.
    Stale,
    /// Artifact exists but has zero length.
    Empty,
}

impl BytecodeLoad {
    #[must_use]
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Loaded(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Reads a cached artifact if it exists and is fresh.
///
/// Artifacts go through [`FileSystem`], the boundary the compiler output is
/// written with.
pub fn load_bytecode(
    fs: &dyn FileSystem,
    path: &Path,
    source_timestamp: u64,
) -> Result<BytecodeLoad> {
    if !fs.file_exists(path) {
        return Ok(BytecodeLoad::NotFound);
    }
    if !cache_key::is_valid(fs, path, source_timestamp) {
        return Ok(BytecodeLoad::Stale);
    }

    let bytes = fs.read_file(path)?;
    if bytes.is_empty() {
        log::error!("{} has zero length bytecode", path.display());
        return Ok(BytecodeLoad::Empty);
    }
    Ok(BytecodeLoad::Loaded(bytes))
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;
    use crate::renderer::core::HostFileSystem;

    fn set_mtime(path: &Path, secs: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
    }

    #[test]
    fn outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let fs = HostFileSystem::new();
        let path = dir.path().join("a_00000000.vs");

        assert_eq!(load_bytecode(&fs, &path, 1000).unwrap(), BytecodeLoad::NotFound);

        std::fs::write(&path, [9u8, 8, 7]).unwrap();
        set_mtime(&path, 500);
        assert_eq!(load_bytecode(&fs, &path, 1000).unwrap(), BytecodeLoad::Stale);
        assert_eq!(
            load_bytecode(&fs, &path, 0).unwrap(),
            BytecodeLoad::Loaded(vec![9, 8, 7])
        );

        set_mtime(&path, 1000);
        assert_eq!(
            load_bytecode(&fs, &path, 1000).unwrap().into_bytes(),
            Some(vec![9, 8, 7])
        );

        std::fs::write(&path, b"").unwrap();
        assert_eq!(load_bytecode(&fs, &path, 0).unwrap(), BytecodeLoad::Empty);
    }
}
