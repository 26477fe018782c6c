//! Boundary types shared by the build pipeline:
//! - [`ShaderStage`]: vertex / fragment
//! - handles: sentinel-guarded GPU handles and variation identity
//! - [`GraphicsDevice`]: device/context collaborator
//! - [`ResourceCache`] / [`FileSystem`]: resource and file-system collaborators

pub mod device;
pub mod handle;
pub mod io;

pub use device::{GraphicsDevice, UniformInfo, UniformType};
pub use handle::{ShaderHandle, UniformHandle, VariationId};
pub use io::{DirectoryResourceCache, FileSystem, HostFileSystem, ProcessOutput, ResourceCache};

/// Compilation unit of a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    /// Extension of the cached artifacts (`.vs` / `.fs`).
    #[inline]
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Vertex => ".vs",
            Self::Fragment => ".fs",
        }
    }

    /// Value of the compiler's `--type` argument.
    #[inline]
    #[must_use]
    pub fn compiler_type(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }

    /// Define marking which stage is being compiled.
    #[inline]
    #[must_use]
    pub fn compile_define(self) -> &'static str {
        match self {
            Self::Vertex => "COMPILEVS",
            Self::Fragment => "COMPILEPS",
        }
    }

    /// Stage name used in log and diagnostic text.
    #[inline]
    #[must_use]
    pub fn debug_name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "pixel",
        }
    }

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Vertex => 0,
            Self::Fragment => 1,
        }
    }
}
