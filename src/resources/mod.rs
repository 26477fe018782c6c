//! Shader resources:
//! - Shader: logical shader source and its variation registry
//! - ShaderDefines: define strings selecting a variation

pub mod shader;
pub mod shader_defines;

pub use shader::{SharedVariation, Shader, ShaderSource};
pub use shader_defines::ShaderDefines;
