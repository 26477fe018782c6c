#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod errors;
pub mod renderer;
pub mod resources;
pub mod utils;

pub use errors::{PrismError, Result};
pub use renderer::core::{
    DirectoryResourceCache, FileSystem, GraphicsDevice, HostFileSystem, ResourceCache,
    ShaderHandle, ShaderStage, UniformHandle,
};
pub use renderer::pipeline::{ShaderParameter, ShaderVariation, VariationState};
pub use renderer::{Backend, BuildMode, Platform, ShaderBuildSettings};
pub use resources::{Shader, ShaderDefines, ShaderSource};
pub use utils::StringHash;
