//! Shared test fakes: a recording graphics device and a file system whose
//! shader compiler is simulated in-process.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tempfile::TempDir;

use prism::renderer::core::{
    DirectoryResourceCache, FileSystem, GraphicsDevice, HostFileSystem, ProcessOutput, ShaderHandle,
    ShaderStage, UniformHandle, UniformInfo, UniformType, VariationId,
};
use prism::renderer::pipeline::{CompilerInvocation, ShaderVariation};
use prism::{Backend, BuildMode, Platform, Shader, ShaderBuildSettings, ShaderSource};

pub const SHADER_NAME: &str = "Shaders/BGFX/LitSolid.sc";

pub const SCENEPASS_SOURCE: &str = "$input a_position, a_normal\n\
#include \"varying_scenepass_x.def.sc\"\n\
#include \"common.sh\"\n\
void main()\n\
{\n\
#ifdef NORMALMAP\n\
    gl_FragColor = vec4(1.0);\n\
#endif\n\
}\n";

pub const COMPILED_BYTES: &[u8] = &[0x56, 0x53, 0x48, 0x0B, 0x01, 0x02, 0x03];

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// FakeDevice
// ============================================================================

#[derive(Debug, Default)]
pub struct DeviceState {
    pub reject_shaders: bool,
    /// Reported for every created shader; the handle is the index
    pub uniforms: Vec<UniformInfo>,
    pub created: Vec<Vec<u8>>,
    pub destroyed_shaders: Vec<ShaderHandle>,
    pub destroyed_uniforms: Vec<UniformHandle>,
    pub bound: [Option<VariationId>; 2],
    pub clear_calls: usize,
    pub cleaned_up: Vec<VariationId>,
}

pub struct FakeDevice {
    settings: ShaderBuildSettings,
    pub state: Mutex<DeviceState>,
}

impl FakeDevice {
    pub fn new(settings: ShaderBuildSettings) -> Self {
        Self {
            settings,
            state: Mutex::new(DeviceState::default()),
        }
    }

    pub fn set_uniforms(&self, uniforms: &[(&str, UniformType)]) {
        self.state.lock().uniforms = uniforms
            .iter()
            .map(|&(name, uniform_type)| UniformInfo {
                name: name.to_string(),
                uniform_type,
            })
            .collect();
    }
}

impl GraphicsDevice for FakeDevice {
    fn settings(&self) -> &ShaderBuildSettings {
        &self.settings
    }

    fn create_shader(&self, byte_code: &[u8]) -> ShaderHandle {
        let mut state = self.state.lock();
        if state.reject_shaders {
            return ShaderHandle::INVALID;
        }
        state.created.push(byte_code.to_vec());
        ShaderHandle(state.created.len() as u16 - 1)
    }

    fn destroy_shader(&self, handle: ShaderHandle) {
        self.state.lock().destroyed_shaders.push(handle);
    }

    fn shader_uniforms(&self, _handle: ShaderHandle) -> Vec<UniformHandle> {
        let count = self.state.lock().uniforms.len();
        (0..count).map(|i| UniformHandle(i as u16)).collect()
    }

    fn uniform_info(&self, handle: UniformHandle) -> UniformInfo {
        self.state.lock().uniforms[handle.0 as usize].clone()
    }

    fn destroy_uniform(&self, handle: UniformHandle) {
        self.state.lock().destroyed_uniforms.push(handle);
    }

    fn bound_shader(&self, stage: ShaderStage) -> Option<VariationId> {
        self.state.lock().bound[stage.index()]
    }

    fn clear_shaders(&self) {
        let mut state = self.state.lock();
        state.bound = [None, None];
        state.clear_calls += 1;
    }

    fn cleanup_shader_programs(&self, variation: VariationId) {
        self.state.lock().cleaned_up.push(variation);
    }
}

// ============================================================================
// FakeCompilerFs
// ============================================================================

/// Host file system whose `system_command` records the invocation and
/// writes `output_bytes` to the `-o` path instead of spawning a process.
pub struct FakeCompilerFs {
    host: HostFileSystem,
    pub invocations: Mutex<Vec<CompilerInvocation>>,
    pub exit_code: Mutex<i32>,
    pub output_bytes: Mutex<Vec<u8>>,
    /// Number of upcoming `read_file` calls that fail with permission denied
    pub failing_reads: Mutex<usize>,
}

impl FakeCompilerFs {
    pub fn new(program_dir: &Path) -> Self {
        Self {
            host: HostFileSystem::with_program_dir(program_dir),
            invocations: Mutex::new(Vec::new()),
            exit_code: Mutex::new(0),
            output_bytes: Mutex::new(COMPILED_BYTES.to_vec()),
            failing_reads: Mutex::new(0),
        }
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().len()
    }

    pub fn last_invocation(&self) -> Option<CompilerInvocation> {
        self.invocations.lock().last().cloned()
    }
}

impl FileSystem for FakeCompilerFs {
    fn file_exists(&self, path: &Path) -> bool {
        self.host.file_exists(path)
    }

    fn dir_exists(&self, path: &Path) -> bool {
        self.host.dir_exists(path)
    }

    fn create_dir(&self, path: &Path) -> prism::Result<()> {
        self.host.create_dir(path)
    }

    fn last_modified_time(&self, path: &Path) -> u64 {
        self.host.last_modified_time(path)
    }

    fn program_dir(&self) -> PathBuf {
        self.host.program_dir()
    }

    fn read_file(&self, path: &Path) -> prism::Result<Vec<u8>> {
        let mut failing = self.failing_reads.lock();
        if *failing > 0 {
            *failing -= 1;
            return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into());
        }
        self.host.read_file(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> prism::Result<()> {
        self.host.write_file(path, contents)
    }

    fn system_command(&self, program: &Path, args: &[String]) -> prism::Result<ProcessOutput> {
        let invocation = CompilerInvocation {
            executable: program.to_path_buf(),
            args: args.to_vec(),
        };
        let exit_code = *self.exit_code.lock();
        if exit_code == 0
            && let Some(binary) = invocation.arg_value("-o")
        {
            self.host
                .write_file(Path::new(binary), &self.output_bytes.lock())?;
        }
        self.invocations.lock().push(invocation);

        Ok(ProcessOutput {
            exit_code,
            output: if exit_code == 0 {
                String::new()
            } else {
                "error: varying not found".to_string()
            },
        })
    }
}

// ============================================================================
// Fixture
// ============================================================================

/// Temporary resource tree, cache directory, fake device and fake compiler.
pub struct Fixture {
    pub root: TempDir,
    pub shader_dir: PathBuf,
    pub settings: ShaderBuildSettings,
    pub fs: Arc<FakeCompilerFs>,
    pub cache: Arc<DirectoryResourceCache>,
    pub device: Arc<FakeDevice>,
}

impl Fixture {
    pub fn new(backend: Backend) -> anyhow::Result<Self> {
        Self::with_settings(backend, |_| {})
    }

    /// Like [`Fixture::new`], letting the caller adjust the build settings
    /// before the device is created.
    pub fn with_settings(
        backend: Backend,
        configure: impl FnOnce(&mut ShaderBuildSettings),
    ) -> anyhow::Result<Self> {
        init_logger();

        let root = tempfile::tempdir()?;
        let shader_dir = root.path().join("Shaders").join("BGFX");
        std::fs::create_dir_all(&shader_dir)?;
        let program_dir = root.path().join("bin");
        std::fs::create_dir_all(&program_dir)?;

        let mut settings = ShaderBuildSettings {
            backend,
            platform: Platform::Linux,
            build_mode: BuildMode::Release,
            cache_dir: root.path().join("cache"),
            ..Default::default()
        };
        configure(&mut settings);

        Ok(Self {
            shader_dir,
            fs: Arc::new(FakeCompilerFs::new(&program_dir)),
            cache: Arc::new(DirectoryResourceCache::new([root.path()])),
            device: Arc::new(FakeDevice::new(settings.clone())),
            settings,
            root,
        })
    }

    /// Writes the source under the resource root and wraps it in a [`Shader`].
    pub fn shader(&self, source: &str, timestamp: u64) -> anyhow::Result<Arc<Shader>> {
        std::fs::write(self.root.path().join(SHADER_NAME), source)?;
        Ok(Arc::new(Shader::new(
            SHADER_NAME,
            source,
            timestamp,
            self.cache.clone(),
            self.fs.clone(),
        )))
    }

    pub fn device(&self) -> Arc<dyn GraphicsDevice> {
        self.device.clone()
    }

    pub fn variation(
        &self,
        shader: &Arc<Shader>,
        stage: ShaderStage,
        defines: &str,
    ) -> ShaderVariation {
        let owner: Weak<dyn ShaderSource> = Arc::downgrade(shader) as Weak<dyn ShaderSource>;
        let mut variation = ShaderVariation::new(owner, Some(self.device()), stage);
        variation.set_defines(defines);
        variation
    }
}
