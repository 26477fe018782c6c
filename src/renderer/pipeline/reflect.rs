//! Uniform reflection.
//!
//! After a shader object is created the device reports the uniforms it
//! references. Each one becomes a [`ShaderParameter`] keyed by the hash of
//! its name (with the two-character `u_`/`s_` prefix stripped); samplers also
//! get a texture unit.

use rustc_hash::FxHashMap;

use crate::renderer::core::{GraphicsDevice, ShaderHandle, ShaderStage, UniformHandle, UniformType};
use crate::utils::StringHash;

/// Hardware texture unit limit.
pub const MAX_TEXTURE_UNITS: usize = 16;

/// Texture units in use by a variation.
pub type TextureUnitMask = [bool; MAX_TEXTURE_UNITS];

/// One reflected uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderParameter {
    /// Name without the two-character prefix
    pub name: String,
    pub stage: ShaderStage,
    pub uniform_type: UniformType,
    pub handle: UniformHandle,
    /// Texture unit for samplers; `None` for other uniforms or unresolved samplers
    pub texture_unit: Option<u32>,
}

/// Parameter table plus texture unit usage.
#[derive(Debug, Clone, Default)]
pub struct Reflection {
    pub parameters: FxHashMap<StringHash, ShaderParameter>,
    pub texture_units: TextureUnitMask,
}

/// Standard sampler names and their units.
const STANDARD_UNITS: [(&str, u32); 19] = [
    ("diffMap", 0),
    ("albedoBuffer", 0),
    ("normalMap", 1),
    ("normalBuffer", 1),
    ("specMap", 2),
    ("emissiveMap", 3),
    ("envMap", 4),
    ("volumeMap", 5),
    ("customMap1", 6),
    ("customMap2", 7),
    ("lightRampMap", 8),
    ("lightSpotMap", 9),
    ("shadowMap", 10),
    ("faceSelectCubeMap", 11),
    ("indirectionCubeMap", 12),
    ("depthBuffer", 13),
    ("lightBuffer", 14),
    ("zoneCubeMap", 15),
    ("zoneVolumeMap", 15),
];

/// Looks a sampler name up in the standard unit table.
#[must_use]
pub fn standard_texture_unit(name: &str) -> Option<u32> {
    STANDARD_UNITS
        .iter()
        .find(|(unit_name, _)| *unit_name == name)
        .map(|&(_, unit)| unit)
}

/// Parses the first run of decimal digits in `name`.
#[must_use]
pub fn number_postfix(name: &str) -> Option<u32> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits = &name[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Drops the two-character implementation prefix (`u_`, `s_`).
#[must_use]
pub fn strip_prefix(name: &str) -> &str {
    name.char_indices().nth(2).map_or("", |(i, _)| &name[i..])
}

/// Resolves a sampler's texture unit: named lookup first, then the first
/// digit run in the name. Units at or beyond the limit are rejected.
#[must_use]
pub fn resolve_texture_unit(device: &dyn GraphicsDevice, name: &str) -> Option<u32> {
    device
        .texture_unit(name)
        .filter(|&unit| (unit as usize) < MAX_TEXTURE_UNITS)
        .or_else(|| number_postfix(name))
        .filter(|&unit| (unit as usize) < MAX_TEXTURE_UNITS)
}

/// Builds the parameter table for a created shader object.
#[must_use]
pub fn reflect(device: &dyn GraphicsDevice, shader: ShaderHandle, stage: ShaderStage) -> Reflection {
    let mut reflection = Reflection::default();

    for handle in device.shader_uniforms(shader) {
        let info = device.uniform_info(handle);
        let name = strip_prefix(&info.name).to_string();

        let texture_unit = if info.uniform_type.is_sampler() {
            resolve_texture_unit(device, &name)
        } else {
            None
        };
        if let Some(unit) = texture_unit {
            reflection.texture_units[unit as usize] = true;
        }

        reflection.parameters.insert(
            StringHash::new(&name),
            ShaderParameter {
                name,
                stage,
                uniform_type: info.uniform_type,
                handle,
                texture_unit,
            },
        );
    }

    reflection
}
