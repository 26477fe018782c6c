//! Cache key derivation and freshness.
//!
//! A variation's artifacts live at
//! `<cache_dir>/<backend_subdir>/<shader_stem>_<defines_hash><suffix><ext>`
//! where the suffix is empty for the binary and `intermediate` for the
//! preprocessed source. The defines hash covers the whole define string.

use std::path::{Path, PathBuf};

use crate::renderer::core::{FileSystem, ShaderStage};
use crate::renderer::settings::ShaderBuildSettings;
use crate::utils::StringHash;

const INTERMEDIATE_SUFFIX: &str = "intermediate";

/// On-disk locations for one variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    /// Backend cache directory
    pub dir: PathBuf,
    /// Compiled bytecode
    pub binary: PathBuf,
    /// Preprocessed source handed to the compiler
    pub intermediate: PathBuf,
}

impl CacheKey {
    /// Derives the artifact paths. Pure function of its inputs.
    #[must_use]
    pub fn derive(
        settings: &ShaderBuildSettings,
        shader_name: &str,
        stage: ShaderStage,
        defines: &str,
    ) -> Self {
        Self::derive_in(Path::new(""), settings, shader_name, stage, defines)
    }

    /// Like [`derive`](Self::derive), with a relative `cache_dir` anchored at
    /// `base`. An absolute `cache_dir` ignores `base`.
    #[must_use]
    pub fn derive_in(
        base: &Path,
        settings: &ShaderBuildSettings,
        shader_name: &str,
        stage: ShaderStage,
        defines: &str,
    ) -> Self {
        let dir = base.join(settings.backend_cache_dir());
        let stem = shader_stem(shader_name);
        let hash = StringHash::new(defines);
        let ext = stage.extension();

        Self {
            binary: dir.join(format!("{stem}_{hash}{ext}")),
            intermediate: dir.join(format!("{stem}_{hash}{INTERMEDIATE_SUFFIX}{ext}")),
            dir,
        }
    }
}

/// Derives only the binary artifact path.
#[must_use]
pub fn derive_path(
    settings: &ShaderBuildSettings,
    shader_name: &str,
    stage: ShaderStage,
    defines: &str,
) -> PathBuf {
    CacheKey::derive(settings, shader_name, stage, defines).binary
}

/// File name of a resource without directory and extension.
#[must_use]
pub fn shader_stem(shader_name: &str) -> &str {
    Path::new(shader_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(shader_name)
}

/// Freshness rule. A zero source timestamp means the source is packaged and
/// any existing artifact is valid; otherwise the artifact must not be older.
#[inline]
#[must_use]
pub fn is_fresh(artifact_mtime: u64, source_timestamp: u64) -> bool {
    source_timestamp == 0 || artifact_mtime >= source_timestamp
}

/// Checks that a cached artifact exists and is not older than its source.
#[must_use]
pub fn is_valid(fs: &dyn FileSystem, path: &Path, source_timestamp: u64) -> bool {
    if !fs.file_exists(path) {
        return false;
    }
    source_timestamp == 0 || is_fresh(fs.last_modified_time(path), source_timestamp)
}
