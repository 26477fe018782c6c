//! Graphics device boundary.
//!
//! The pipeline never talks to a driver directly. Everything it needs from
//! the device (build configuration, shader/uniform object lifetime, reflected
//! uniform info, bind state) goes through [`GraphicsDevice`].

use crate::renderer::pipeline::reflect::standard_texture_unit;
use crate::renderer::settings::ShaderBuildSettings;

use super::ShaderStage;
use super::handle::{ShaderHandle, UniformHandle, VariationId};

/// Backend-specific uniform type tag, passed through untouched.
///
/// Only [`UniformType::SAMPLER`] is interpreted: uniforms of that type are
/// integer sampler slots and get a texture unit resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformType(pub u32);

impl UniformType {
    /// Integer sampler slot.
    pub const SAMPLER: UniformType = UniformType(0);
    pub const VEC4: UniformType = UniformType(2);

    #[inline]
    #[must_use]
    pub fn is_sampler(self) -> bool {
        self == Self::SAMPLER
    }
}

/// Reflected description of one uniform in a compiled shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformInfo {
    /// Name as reported by the compiler, including its two-character prefix (`u_`, `s_`)
    pub name: String,
    pub uniform_type: UniformType,
}

/// Device/context collaborator.
///
/// Methods take `&self`; implementations own whatever interior mutability
/// their driver binding needs.
pub trait GraphicsDevice: Send + Sync {
    /// Build configuration for the active backend.
    fn settings(&self) -> &ShaderBuildSettings;

    /// Creates a shader object from bytecode. Returns [`ShaderHandle::INVALID`]
    /// when the driver rejects it.
    fn create_shader(&self, byte_code: &[u8]) -> ShaderHandle;

    fn destroy_shader(&self, handle: ShaderHandle);

    /// Uniform handles referenced by a shader object.
    fn shader_uniforms(&self, handle: ShaderHandle) -> Vec<UniformHandle>;

    fn uniform_info(&self, handle: UniformHandle) -> UniformInfo;

    fn destroy_uniform(&self, handle: UniformHandle);

    /// Named texture unit lookup. Defaults to the standard unit names.
    fn texture_unit(&self, name: &str) -> Option<u32> {
        standard_texture_unit(name)
    }

    /// Variation currently bound for `stage`, if any.
    fn bound_shader(&self, stage: ShaderStage) -> Option<VariationId>;

    /// Unbinds both the vertex and the fragment shader.
    fn clear_shaders(&self);

    /// Drops linked programs that reference `variation`.
    fn cleanup_shader_programs(&self, variation: VariationId);
}
