//! Shader Build Settings
//!
//! [`ShaderBuildSettings`] is the explicit configuration consumed by every
//! stage of the variation build: which backend bytecode is produced for, where
//! the cache lives, which platform the offline compiler targets and whether
//! this is a debug or release build.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use prism::renderer::{Backend, ShaderBuildSettings};
//!
//! let settings = ShaderBuildSettings {
//!     backend: Backend::Vulkan,
//!     cache_dir: "Data/ShaderCache".into(),
//!     ..Default::default()
//! };
//!
//! // Or from a JSON file:
//! let settings = ShaderBuildSettings::load("shader_build.json")?;
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::backend::Backend;
use crate::errors::Result;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Platform token passed to the offline compiler (`--platform`).
///
/// Fixed per build target; it is not derived from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Osx,
    Linux,
}

impl Default for Platform {
    #[inline]
    fn default() -> Self {
        Self::current()
    }
}

impl Platform {
    /// Platform this crate was compiled for.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Osx
        } else {
            Self::Linux
        }
    }

    #[inline]
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Osx => "osx",
            Self::Linux => "linux",
        }
    }

    /// File name of the compiler executable.
    #[inline]
    #[must_use]
    pub fn compiler_name(self) -> &'static str {
        match self {
            Self::Windows => "shaderc.exe",
            Self::Osx | Self::Linux => "shaderc",
        }
    }
}

// ---------------------------------------------------------------------------
// BuildMode
// ---------------------------------------------------------------------------

/// Debug builds emit debug info and check for unused defines; release builds
/// optimize at the highest level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Debug,
    Release,
}

impl Default for BuildMode {
    #[inline]
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

impl BuildMode {
    #[inline]
    #[must_use]
    pub fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

// ---------------------------------------------------------------------------
// ShaderBuildSettings
// ---------------------------------------------------------------------------

/// Configuration for building shader variations.
///
/// | Field        | Description                                   | Default              |
/// |--------------|-----------------------------------------------|----------------------|
/// | `backend`    | Target graphics backend                       | `OpenGL`             |
/// | `platform`   | Compiler platform token                       | compile target       |
/// | `build_mode` | Debug / release compiler flags                | `debug_assertions`   |
/// | `cache_dir`  | Root of the on-disk bytecode cache            | `ShaderCache`        |
/// | `force_gl2`  | Keep OpenGL shaders on the legacy profile     | `false`              |
/// | `max_bones`  | Skinning bone limit compiled into shaders     | `64`                 |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderBuildSettings {
    /// Backend bytecode is produced for. Selects the cache subdirectory and
    /// the compiler profile.
    pub backend: Backend,

    pub platform: Platform,

    pub build_mode: BuildMode,

    /// Root of the bytecode cache. Each backend gets its own subdirectory.
    /// Relative paths are resolved against the program directory.
    pub cache_dir: PathBuf,

    /// When `false`, OpenGL shaders are compiled with the `GL3` define.
    pub force_gl2: bool,

    /// Value of the `BGFX_CONFIG_MAX_BONES` define.
    pub max_bones: u32,
}

impl Default for ShaderBuildSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            platform: Platform::default(),
            build_mode: BuildMode::default(),
            cache_dir: PathBuf::from("ShaderCache"),
            force_gl2: false,
            max_bones: 64,
        }
    }
}

impl ShaderBuildSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Backend-specific cache directory, e.g. `<cache_dir>/spirv`.
    #[inline]
    #[must_use]
    pub fn backend_cache_dir(&self) -> PathBuf {
        self.cache_dir.join(self.backend.profile().cache_subdir)
    }
}
