//! Variation build orchestration.
//!
//! Ties the pipeline stages together for one variation:
//!
//! ```text
//! cache key ─► load cached bytecode ─► (miss/stale) preprocess ─► write intermediate
//!                                         ─► run compiler ─► reload bytecode
//! ```

use std::path::{Path, PathBuf};

use super::bytecode::{BytecodeLoad, load_bytecode};
use super::cache_key::CacheKey;
use super::invocation::{CompilerInvocationBuilder, InvocationPaths, warn_unused_defines};
use super::preprocess::preprocess;
use crate::errors::{PrismError, Result};
use crate::renderer::core::ShaderStage;
use crate::renderer::settings::ShaderBuildSettings;
use crate::resources::{ShaderDefines, ShaderSource};

/// Produces the bytecode of one variation, compiling it when the cache has
/// nothing usable.
pub struct VariationBuilder<'a> {
    settings: &'a ShaderBuildSettings,
    owner: &'a dyn ShaderSource,
    stage: ShaderStage,
    defines: &'a ShaderDefines,
    full_name: &'a str,
}

impl<'a> VariationBuilder<'a> {
    #[must_use]
    pub fn new(
        settings: &'a ShaderBuildSettings,
        owner: &'a dyn ShaderSource,
        stage: ShaderStage,
        defines: &'a ShaderDefines,
        full_name: &'a str,
    ) -> Self {
        Self {
            settings,
            owner,
            stage,
            defines,
            full_name,
        }
    }

    /// Artifact paths, with a relative cache directory anchored at the
    /// program directory.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::derive_in(
            &self.owner.file_system().program_dir(),
            self.settings,
            self.owner.name(),
            self.stage,
            self.defines.as_str(),
        )
    }

    /// Directory searched for includes and interface-definition files: the
    /// directory of the owner's source file.
    #[must_use]
    pub fn include_dir(&self) -> PathBuf {
        let name = self.owner.name();
        self.owner
            .resource_cache()
            .resource_file_name(name)
            .unwrap_or_else(|| PathBuf::from(name))
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Returns non-empty bytecode, from the cache or from a fresh compile.
    pub fn build(&self) -> Result<Vec<u8>> {
        let key = self.cache_key();
        let fs = self.owner.file_system();
        let timestamp = self.owner.timestamp();

        match load_bytecode(fs, &key.binary, timestamp) {
            Ok(BytecodeLoad::Loaded(bytes)) => {
                log::debug!(
                    "Loaded cached {} shader {}",
                    self.stage.debug_name(),
                    self.full_name
                );
                return Ok(bytes);
            }
            Ok(_) => {}
            Err(err) => log::warn!(
                "Could not read cached {} shader {}: {err}",
                self.stage.debug_name(),
                key.binary.display()
            ),
        }

        self.compile(&key)?;

        match load_bytecode(fs, &key.binary, timestamp)? {
            BytecodeLoad::Loaded(bytes) => Ok(bytes),
            BytecodeLoad::Empty => Err(PrismError::EmptyBytecode { stage: self.stage }),
            BytecodeLoad::NotFound | BytecodeLoad::Stale => {
                Err(PrismError::BytecodeUnavailable { path: key.binary })
            }
        }
    }

    /// Preprocesses the source and runs the external compiler, which writes
    /// the binary artifact itself.
    pub fn compile(&self, key: &CacheKey) -> Result<()> {
        let source = self.owner.source_code(self.stage);
        let include_dir = self.include_dir();

        let preprocessed = preprocess(source, self.defines, &include_dir).ok_or_else(|| {
            PrismError::MissingVaryingDef {
                shader: self.full_name.to_string(),
            }
        })?;

        let invocation_builder = CompilerInvocationBuilder::new(self.settings);
        if self.settings.build_mode.is_debug() {
            let defines = invocation_builder.compile_defines(self.stage, self.defines);
            warn_unused_defines(self.full_name, source, &defines);
        }

        let fs = self.owner.file_system();
        if !fs.dir_exists(&key.dir) {
            fs.create_dir(&key.dir)?;
        }
        fs.write_file(&key.intermediate, preprocessed.source.as_bytes())?;

        let invocation = invocation_builder.build(
            fs,
            self.stage,
            self.defines,
            InvocationPaths {
                intermediate: &key.intermediate,
                binary: &key.binary,
                include_dir: &include_dir,
                varying_def: &preprocessed.varying_def,
            },
        );

        let command = invocation.command_line();
        log::debug!("Compiling {} shader {}: {command}", self.stage.debug_name(), self.full_name);

        let output = fs.system_command(&invocation.executable, &invocation.args)?;
        if !output.output.is_empty() {
            log::debug!("{}", output.output);
        }
        if !output.success() {
            return Err(PrismError::CompilerFailed {
                command,
                exit_code: output.exit_code,
                output: output.output,
            });
        }
        Ok(())
    }
}
