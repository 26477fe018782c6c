//! Shader build configuration, device/file-system boundaries and the
//! variation pipeline.

pub mod backend;
pub mod core;
pub mod pipeline;
pub mod settings;

pub use backend::{Backend, BackendProfile, ShaderProfile};
pub use settings::{BuildMode, Platform, ShaderBuildSettings};
