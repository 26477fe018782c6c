//! Backend strategy table.
//!
//! Everything that varies per graphics backend lives in one
//! [`BackendProfile`] row: the cache subdirectory, an implied define and the
//! compiler profile rule. Cache-path derivation and compiler invocation both
//! read from this table.

use serde::{Deserialize, Serialize};

use crate::renderer::core::ShaderStage;
use crate::renderer::settings::Platform;

/// Target graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Noop,
    Direct3D9,
    Direct3D11,
    Direct3D12,
    Gnm,
    Metal,
    #[default]
    OpenGL,
    OpenGLES,
    Vulkan,
}

/// How the `--profile` argument is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderProfile {
    /// No `--profile` argument.
    Default,
    /// Per-stage HLSL shader model, passed only when compiling on Windows.
    ShaderModel {
        vertex: &'static str,
        fragment: &'static str,
    },
    /// Fixed legacy GLSL profile; `modern_define` is added unless legacy GL is forced.
    Glsl {
        version: &'static str,
        modern_define: &'static str,
    },
}

/// Per-backend build rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendProfile {
    pub backend: Backend,
    /// Directory under the cache root holding this backend's bytecode.
    pub cache_subdir: &'static str,
    /// Define implied by the backend, if any.
    pub implied_define: Option<&'static str>,
    pub shader_profile: ShaderProfile,
}

const PROFILES: [BackendProfile; 9] = [
    BackendProfile {
        backend: Backend::Noop,
        cache_subdir: "dx9",
        implied_define: None,
        shader_profile: ShaderProfile::Default,
    },
    BackendProfile {
        backend: Backend::Direct3D9,
        cache_subdir: "dx9",
        implied_define: None,
        shader_profile: ShaderProfile::ShaderModel {
            vertex: "vs_3_0",
            fragment: "ps_3_0",
        },
    },
    BackendProfile {
        backend: Backend::Direct3D11,
        cache_subdir: "dx11",
        implied_define: Some("D3D11"),
        shader_profile: ShaderProfile::ShaderModel {
            vertex: "vs_4_0",
            fragment: "ps_4_0",
        },
    },
    BackendProfile {
        backend: Backend::Direct3D12,
        cache_subdir: "dx11",
        implied_define: Some("D3D11"),
        shader_profile: ShaderProfile::Default,
    },
    BackendProfile {
        backend: Backend::Gnm,
        cache_subdir: "pssl",
        implied_define: None,
        shader_profile: ShaderProfile::Default,
    },
    BackendProfile {
        backend: Backend::Metal,
        cache_subdir: "metal",
        implied_define: None,
        shader_profile: ShaderProfile::Default,
    },
    BackendProfile {
        backend: Backend::OpenGL,
        cache_subdir: "glsl",
        implied_define: None,
        shader_profile: ShaderProfile::Glsl {
            version: "120",
            modern_define: "GL3",
        },
    },
    BackendProfile {
        backend: Backend::OpenGLES,
        cache_subdir: "essl",
        implied_define: Some("URHO3D_MOBILE"),
        shader_profile: ShaderProfile::Default,
    },
    BackendProfile {
        backend: Backend::Vulkan,
        cache_subdir: "spirv",
        implied_define: None,
        shader_profile: ShaderProfile::Default,
    },
];

impl Backend {
    pub const ALL: [Backend; 9] = [
        Backend::Noop,
        Backend::Direct3D9,
        Backend::Direct3D11,
        Backend::Direct3D12,
        Backend::Gnm,
        Backend::Metal,
        Backend::OpenGL,
        Backend::OpenGLES,
        Backend::Vulkan,
    ];

    /// Build rules for this backend.
    #[must_use]
    pub fn profile(self) -> &'static BackendProfile {
        &PROFILES[self as usize]
    }
}

impl BackendProfile {
    /// `--profile` value for `stage` on `platform`, if this backend passes one.
    #[must_use]
    pub fn profile_arg(&self, stage: ShaderStage, platform: Platform) -> Option<&'static str> {
        match self.shader_profile {
            ShaderProfile::Default => None,
            ShaderProfile::ShaderModel { .. } if platform != Platform::Windows => None,
            ShaderProfile::ShaderModel { vertex, fragment } => Some(match stage {
                ShaderStage::Vertex => vertex,
                ShaderStage::Fragment => fragment,
            }),
            ShaderProfile::Glsl { version, .. } => Some(version),
        }
    }

    /// Define requesting the modern profile, unless legacy is forced.
    #[must_use]
    pub fn profile_define(&self, force_legacy: bool) -> Option<&'static str> {
        match self.shader_profile {
            ShaderProfile::Glsl { modern_define, .. } if !force_legacy => Some(modern_define),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_match_their_backend() {
        for backend in Backend::ALL {
            assert_eq!(backend.profile().backend, backend);
        }
    }

    #[test]
    fn cache_subdirs() {
        let subdirs: Vec<_> = Backend::ALL.iter().map(|b| b.profile().cache_subdir).collect();
        assert_eq!(
            subdirs,
            ["dx9", "dx9", "dx11", "dx11", "pssl", "metal", "glsl", "essl", "spirv"]
        );
    }

    #[test]
    fn only_hlsl_and_glsl_backends_pass_a_profile() {
        let win = Platform::Windows;
        let d3d9 = Backend::Direct3D9.profile();
        let d3d11 = Backend::Direct3D11.profile();
        assert_eq!(d3d9.profile_arg(ShaderStage::Vertex, win), Some("vs_3_0"));
        assert_eq!(d3d9.profile_arg(ShaderStage::Fragment, win), Some("ps_3_0"));
        assert_eq!(d3d11.profile_arg(ShaderStage::Vertex, win), Some("vs_4_0"));
        assert_eq!(d3d11.profile_arg(ShaderStage::Fragment, win), Some("ps_4_0"));
        assert_eq!(Backend::OpenGL.profile().profile_arg(ShaderStage::Fragment, win), Some("120"));

        for backend in [Backend::Noop, Backend::Direct3D12, Backend::Gnm, Backend::Metal, Backend::OpenGLES, Backend::Vulkan] {
            assert_eq!(backend.profile().profile_arg(ShaderStage::Vertex, win), None, "{backend:?}");
        }
    }

    #[test]
    fn shader_model_profile_only_on_windows() {
        for platform in [Platform::Linux, Platform::Osx] {
            assert_eq!(Backend::Direct3D9.profile().profile_arg(ShaderStage::Vertex, platform), None);
            assert_eq!(Backend::Direct3D11.profile().profile_arg(ShaderStage::Fragment, platform), None);
        }
        assert_eq!(
            Backend::OpenGL.profile().profile_arg(ShaderStage::Vertex, Platform::Linux),
            Some("120")
        );
    }

    #[test]
    fn gl3_define_unless_forced_legacy() {
        let gl = Backend::OpenGL.profile();
        assert_eq!(gl.profile_define(false), Some("GL3"));
        assert_eq!(gl.profile_define(true), None);
        assert_eq!(Backend::Vulkan.profile().profile_define(false), None);
    }

    #[test]
    fn implied_defines() {
        assert_eq!(Backend::Direct3D11.profile().implied_define, Some("D3D11"));
        assert_eq!(Backend::Direct3D12.profile().implied_define, Some("D3D11"));
        assert_eq!(Backend::OpenGLES.profile().implied_define, Some("URHO3D_MOBILE"));
        assert_eq!(Backend::Metal.profile().implied_define, None);
    }
}
