//! Offline compiler invocation.
//!
//! Builds the argument list for the external shader compiler and locates its
//! executable. The command line has this shape:
//!
//! ```text
//! shaderc -f <intermediate> -o <binary> --depends -i <include_dir>
//!         --varyingdef <varying.def.sc> --platform <windows|osx|linux>
//!         [--profile <profile>] --type <vertex|fragment>
//!         (--debug --disasm | -O 3) --define <A;B;...>
//! ```

use std::path::{Path, PathBuf};

use crate::renderer::core::{FileSystem, ShaderStage};
use crate::renderer::settings::{BuildMode, Platform, ShaderBuildSettings};
use crate::resources::ShaderDefines;

/// Marks the source as compiled by this build pipeline.
const BUILD_SYSTEM_DEFINE: &str = "BGFX_SHADER";
const MAX_BONES_DEFINE: &str = "BGFX_CONFIG_MAX_BONES";

/// A fully resolved compiler command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInvocation {
    pub executable: PathBuf,
    pub args: Vec<String>,
}

impl CompilerInvocation {
    /// Space-joined command line, for logging.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.executable.to_string_lossy().into_owned();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Value following `flag`, if present.
    #[must_use]
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// File locations of one compile.
#[derive(Debug, Clone, Copy)]
pub struct InvocationPaths<'a> {
    /// Preprocessed source (`-f`)
    pub intermediate: &'a Path,
    /// Bytecode output (`-o`)
    pub binary: &'a Path,
    /// Include directory (`-i`)
    pub include_dir: &'a Path,
    /// Interface-definition file (`--varyingdef`)
    pub varying_def: &'a Path,
}

/// Relative offset from the program directory to the compiler when it is
/// not next to the program.
#[must_use]
pub fn fallback_dir_offset(platform: Platform, build_mode: BuildMode) -> &'static str {
    match (platform, build_mode) {
        (Platform::Windows, BuildMode::Debug) => "../../Debug/",
        (Platform::Windows, BuildMode::Release) => "../../Release/",
        _ => "../",
    }
}

/// Builds compiler invocations for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct CompilerInvocationBuilder<'a> {
    settings: &'a ShaderBuildSettings,
}

impl<'a> CompilerInvocationBuilder<'a> {
    #[must_use]
    pub fn new(settings: &'a ShaderBuildSettings) -> Self {
        Self { settings }
    }

    /// Final define list passed to the compiler.
    ///
    /// Order: user defines, backend-implied define, the build-system marker,
    /// the stage marker, the bone limit, then the modern-profile define.
    #[must_use]
    pub fn compile_defines(&self, stage: ShaderStage, defines: &ShaderDefines) -> Vec<String> {
        let profile = self.settings.backend.profile();
        let mut list: Vec<String> = defines.tokens().map(str::to_string).collect();

        if let Some(implied) = profile.implied_define {
            list.push(implied.to_string());
        }
        list.push(BUILD_SYSTEM_DEFINE.to_string());
        list.push(stage.compile_define().to_string());
        list.push(format!("{MAX_BONES_DEFINE}={}", self.settings.max_bones));
        if let Some(modern) = profile.profile_define(self.settings.force_gl2) {
            list.push(modern.to_string());
        }
        list
    }

    /// Locates the compiler: next to the program first, then at the
    /// platform fallback offset. Falls back even when neither exists; the
    /// launch then fails and is reported as a compile failure.
    #[must_use]
    pub fn resolve_executable(&self, fs: &dyn FileSystem) -> PathBuf {
        let name = self.settings.platform.compiler_name();
        let program_dir = fs.program_dir();

        let primary = program_dir.join(name);
        if fs.file_exists(&primary) {
            return primary;
        }

        let offset = fallback_dir_offset(self.settings.platform, self.settings.build_mode);
        let fallback = program_dir.join(offset).join(name);
        if !fs.file_exists(&fallback) {
            log::debug!(
                "Shader compiler not found at {} or {}",
                primary.display(),
                fallback.display()
            );
        }
        fallback
    }

    #[must_use]
    pub fn build(
        &self,
        fs: &dyn FileSystem,
        stage: ShaderStage,
        defines: &ShaderDefines,
        paths: InvocationPaths<'_>,
    ) -> CompilerInvocation {
        let settings = self.settings;
        let profile = settings.backend.profile();
        let path_arg = |p: &Path| p.to_string_lossy().into_owned();

        let mut args = vec![
            "-f".to_string(),
            path_arg(paths.intermediate),
            "-o".to_string(),
            path_arg(paths.binary),
            "--depends".to_string(),
            "-i".to_string(),
            path_arg(paths.include_dir),
            "--varyingdef".to_string(),
            path_arg(paths.varying_def),
            "--platform".to_string(),
            settings.platform.token().to_string(),
        ];

        if let Some(shader_profile) = profile.profile_arg(stage, settings.platform) {
            args.push("--profile".to_string());
            args.push(shader_profile.to_string());
        }

        args.push("--type".to_string());
        args.push(stage.compiler_type().to_string());

        if settings.build_mode.is_debug() {
            args.push("--debug".to_string());
            args.push("--disasm".to_string());
        } else {
            args.push("-O".to_string());
            args.push("3".to_string());
        }

        args.push("--define".to_string());
        args.push(self.compile_defines(stage, defines).join(";"));

        CompilerInvocation {
            executable: self.resolve_executable(fs),
            args,
        }
    }
}

/// Defines that never appear literally in `source`.
#[must_use]
pub fn unused_defines<'d>(source: &str, defines: &'d [String]) -> Vec<&'d str> {
    defines
        .iter()
        .map(String::as_str)
        .filter(|define| !source.contains(define))
        .collect()
}

/// Logs a warning for every define the source never mentions.
pub fn warn_unused_defines(full_name: &str, source: &str, defines: &[String]) {
    for define in unused_defines(source, defines) {
        log::warn!("Shader {full_name} does not use the define {define}");
    }
}
