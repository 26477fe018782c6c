//! Shader variation lifecycle.
//!
//! A [`ShaderVariation`] is one stage of a logical shader compiled under one
//! exact define string. It owns the GPU shader object and the uniform handles
//! reflected from it.
//!
//! ```text
//! Uncompiled ──create()──► Ready | Failed
//!      │                       │
//!      └──────release()────────┴──► Released ──create()──► ...
//! ```
//!
//! Every `create()` starts with a full `release()`. Failures never panic or
//! propagate: `create()` returns `false` and [`ShaderVariation::compiler_output`]
//! holds the diagnostic.

use std::sync::{Arc, Weak};

use rustc_hash::FxHashMap;

use super::builder::VariationBuilder;
use super::cache_key::shader_stem;
use super::reflect::{MAX_TEXTURE_UNITS, ShaderParameter, TextureUnitMask, reflect};
use crate::errors::{PrismError, Result};
use crate::renderer::core::{GraphicsDevice, ShaderHandle, ShaderStage, VariationId};
use crate::resources::{ShaderDefines, ShaderSource};
use crate::utils::StringHash;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariationState {
    #[default]
    Uncompiled,
    /// Shader object valid, parameters reflected
    Ready,
    /// Build or creation failed; diagnostic set
    Failed,
    Released,
}

pub struct ShaderVariation {
    id: VariationId,
    owner: Weak<dyn ShaderSource>,
    device: Option<Arc<dyn GraphicsDevice>>,
    stage: ShaderStage,
    name: String,
    defines: ShaderDefines,

    object: ShaderHandle,
    byte_code: Vec<u8>,
    compiler_output: String,
    parameters: FxHashMap<StringHash, ShaderParameter>,
    use_texture_units: TextureUnitMask,
    element_hash: u64,
    state: VariationState,
}

impl ShaderVariation {
    /// Creates an uncompiled variation. The name defaults to the owner's file stem.
    #[must_use]
    pub fn new(
        owner: Weak<dyn ShaderSource>,
        device: Option<Arc<dyn GraphicsDevice>>,
        stage: ShaderStage,
    ) -> Self {
        let name = owner
            .upgrade()
            .map(|owner| shader_stem(owner.name()).to_string())
            .unwrap_or_default();

        Self {
            id: VariationId::next(),
            owner,
            device,
            stage,
            name,
            defines: ShaderDefines::new(),
            object: ShaderHandle::INVALID,
            byte_code: Vec::new(),
            compiler_output: String::new(),
            parameters: FxHashMap::default(),
            use_texture_units: [false; MAX_TEXTURE_UNITS],
            element_hash: 0,
            state: VariationState::Uncompiled,
        }
    }

    /// Builds the bytecode (cached or freshly compiled) and creates the GPU
    /// shader object. Returns `true` when the variation is ready to bind.
    pub fn create(&mut self) -> bool {
        self.release();

        match self.try_create() {
            Ok(()) => {
                self.state = VariationState::Ready;
                true
            }
            Err(err @ (PrismError::NoDevice | PrismError::OwnerExpired)) => {
                self.compiler_output = err.to_string();
                false
            }
            Err(err) => {
                log::error!(
                    "Failed to create {} shader {}: {err}",
                    self.stage.debug_name(),
                    self.full_name()
                );
                self.compiler_output = err.to_string();
                self.state = VariationState::Failed;
                false
            }
        }
    }

    fn try_create(&mut self) -> Result<()> {
        let device = self.device.clone().ok_or(PrismError::NoDevice)?;
        let owner = self.owner.upgrade().ok_or(PrismError::OwnerExpired)?;

        let full_name = self.full_name();
        self.byte_code = VariationBuilder::new(
            device.settings(),
            owner.as_ref(),
            self.stage,
            &self.defines,
            &full_name,
        )
        .build()?;

        if self.byte_code.is_empty() {
            return Err(PrismError::EmptyBytecode { stage: self.stage });
        }

        let object = device.create_shader(&self.byte_code);
        if !object.is_valid() {
            return Err(PrismError::ShaderCreation { stage: self.stage });
        }
        self.object = object;

        let reflection = reflect(device.as_ref(), object, self.stage);
        self.parameters = reflection.parameters;
        self.use_texture_units = reflection.texture_units;
        Ok(())
    }

    /// Destroys the GPU objects and clears all derived state. Safe to call
    /// repeatedly.
    pub fn release(&mut self) {
        if self.object.is_valid() {
            if let Some(device) = &self.device {
                device.cleanup_shader_programs(self.id);
                if device.bound_shader(self.stage) == Some(self.id) {
                    device.clear_shaders();
                }
                for parameter in self.parameters.values() {
                    if parameter.handle.is_valid() {
                        device.destroy_uniform(parameter.handle);
                    }
                }
                device.destroy_shader(self.object);
            } else {
                log::warn!(
                    "Releasing {} shader {} without a graphics device",
                    self.stage.debug_name(),
                    self.full_name()
                );
            }
            self.object = ShaderHandle::INVALID;
        }

        self.compiler_output.clear();
        self.use_texture_units = [false; MAX_TEXTURE_UNITS];
        self.parameters.clear();
        self.byte_code.clear();
        self.element_hash = 0;
        self.state = VariationState::Released;
    }

    /// Shader objects survive device loss on this backend.
    pub fn on_device_lost(&mut self) {}

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Takes effect on the next [`create`](Self::create).
    pub fn set_defines(&mut self, defines: &str) {
        self.defines = ShaderDefines::parse(defines);
    }

    pub fn set_element_hash(&mut self, hash: u64) {
        self.element_hash = hash;
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn id(&self) -> VariationId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> VariationState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn owner(&self) -> Option<Arc<dyn ShaderSource>> {
        self.owner.upgrade()
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn defines(&self) -> &ShaderDefines {
        &self.defines
    }

    /// `<name>(<defines>)`, used in logs.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}({})", self.name, self.defines)
    }

    #[inline]
    #[must_use]
    pub fn gpu_object(&self) -> ShaderHandle {
        self.object
    }

    #[inline]
    #[must_use]
    pub fn byte_code(&self) -> &[u8] {
        &self.byte_code
    }

    /// Diagnostic of the last failed `create()`; empty on success.
    #[inline]
    #[must_use]
    pub fn compiler_output(&self) -> &str {
        &self.compiler_output
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &FxHashMap<StringHash, ShaderParameter> {
        &self.parameters
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ShaderParameter> {
        self.parameters.get(&StringHash::new(name))
    }

    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    #[inline]
    #[must_use]
    pub fn use_texture_units(&self) -> &TextureUnitMask {
        &self.use_texture_units
    }

    #[must_use]
    pub fn has_texture_unit(&self, unit: u32) -> bool {
        self.use_texture_units
            .get(unit as usize)
            .copied()
            .unwrap_or(false)
    }

    #[inline]
    #[must_use]
    pub fn element_hash(&self) -> u64 {
        self.element_hash
    }
}

impl Drop for ShaderVariation {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ShaderVariation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderVariation")
            .field("id", &self.id)
            .field("stage", &self.stage)
            .field("name", &self.name)
            .field("defines", &self.defines.as_str())
            .field("object", &self.object)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
