//! Logical Shader Resource
//!
//! A [`Shader`] is one shader source file. It hands out the
//! [`ShaderVariation`]s compiled from it, one per stage and define string,
//! and acts as their [`ShaderSource`]: source text, timestamp and the
//! resource/file-system boundaries used to build them.
//!
//! Variations hold only a weak reference back to their shader; dropping the
//! shader makes further `create()` calls fail with "Owner shader has expired".

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::ShaderDefines;
use crate::errors::{PrismError, Result};
use crate::renderer::core::{FileSystem, GraphicsDevice, ResourceCache, ShaderStage};
use crate::renderer::pipeline::ShaderVariation;
use crate::utils::StringHash;

/// What the build pipeline needs from the logical shader that owns a variation.
pub trait ShaderSource: Send + Sync {
    /// Resource name, e.g. `Shaders/BGFX/LitSolid.sc`.
    fn name(&self) -> &str;

    fn source_code(&self, stage: ShaderStage) -> &str;

    /// Source modification time in seconds; 0 for packaged sources.
    fn timestamp(&self) -> u64;

    fn resource_cache(&self) -> &dyn ResourceCache;

    fn file_system(&self) -> &dyn FileSystem;
}

/// Shared handle to a registered variation.
pub type SharedVariation = Arc<Mutex<ShaderVariation>>;

type VariationMap = FxHashMap<StringHash, SharedVariation>;

pub struct Shader {
    name: String,
    sources: [String; 2],
    timestamp: u64,
    cache: Arc<dyn ResourceCache>,
    fs: Arc<dyn FileSystem>,
    /// Keyed by define hash; aliases share the same entry
    variations: Mutex<[VariationMap; 2]>,
    num_variations: Mutex<usize>,
}

impl Shader {
    /// Creates a shader whose stages share one source file.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        timestamp: u64,
        cache: Arc<dyn ResourceCache>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let source = source.into();
        Self::with_stage_sources(name, [source.clone(), source], timestamp, cache, fs)
    }

    /// Creates a shader with separate vertex and fragment sources.
    #[must_use]
    pub fn with_stage_sources(
        name: impl Into<String>,
        sources: [String; 2],
        timestamp: u64,
        cache: Arc<dyn ResourceCache>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            name: name.into(),
            sources,
            timestamp,
            cache,
            fs,
            variations: Mutex::new([VariationMap::default(), VariationMap::default()]),
            num_variations: Mutex::new(0),
        }
    }

    /// Reads the source through the resource cache.
    ///
    /// The timestamp is the backing file's modification time, or 0 when the
    /// resource has no backing file.
    pub fn load(
        name: &str,
        cache: Arc<dyn ResourceCache>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        if !cache.exists(name) {
            log::error!("Shader source {name} not found");
            return Err(PrismError::ResourceNotFound(name.to_string()));
        }
        let bytes = cache.read(name)?;
        let source = String::from_utf8(bytes).map_err(|source| PrismError::InvalidSource {
            name: name.to_string(),
            source,
        })?;

        let timestamp = cache
            .resource_file_name(name)
            .map_or(0, |path| fs.last_modified_time(&path));

        log::debug!("Loaded shader source {name} (timestamp {timestamp})");
        Ok(Self::new(name, source, timestamp, cache, fs))
    }

    /// Returns the variation for `defines`, creating it on first request.
    ///
    /// Unknown define strings are normalized and looked up again; the raw
    /// spelling is then registered as an alias so both resolve to the same
    /// variation. The variation is not compiled here.
    pub fn variation(
        self: &Arc<Self>,
        device: &Arc<dyn GraphicsDevice>,
        stage: ShaderStage,
        defines: &str,
    ) -> SharedVariation {
        let mut registry = self.variations.lock();
        let variations = &mut registry[stage.index()];

        let defines_hash = StringHash::new(defines);
        if let Some(existing) = variations.get(&defines_hash) {
            return Arc::clone(existing);
        }

        let normalized = ShaderDefines::parse(defines).normalized();
        let normalized_hash = normalized.compute_hash();

        if let Some(existing) = variations.get(&normalized_hash) {
            let existing = Arc::clone(existing);
            variations.insert(defines_hash, Arc::clone(&existing));
            return existing;
        }

        let owner: Weak<dyn ShaderSource> = Arc::downgrade(self) as Weak<dyn ShaderSource>;
        let mut variation = ShaderVariation::new(owner, Some(Arc::clone(device)), stage);
        variation.set_defines(normalized.as_str());

        let variation = Arc::new(Mutex::new(variation));
        variations.insert(normalized_hash, Arc::clone(&variation));
        if defines_hash != normalized_hash {
            variations.insert(defines_hash, Arc::clone(&variation));
        }
        *self.num_variations.lock() += 1;

        variation
    }

    /// Number of distinct variations created, aliases not counted.
    #[must_use]
    pub fn num_variations(&self) -> usize {
        *self.num_variations.lock()
    }

    /// Releases the GPU objects of every registered variation.
    pub fn release_variations(&self) {
        let registry = self.variations.lock();
        for variation in registry.iter().flat_map(FxHashMap::values) {
            variation.lock().release();
        }
    }
}

impl ShaderSource for Shader {
    fn name(&self) -> &str {
        &self.name
    }

    fn source_code(&self, stage: ShaderStage) -> &str {
        &self.sources[stage.index()]
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn resource_cache(&self) -> &dyn ResourceCache {
        self.cache.as_ref()
    }

    fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }
}

impl std::fmt::Debug for Shader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("name", &self.name)
            .field("timestamp", &self.timestamp)
            .field("num_variations", &self.num_variations())
            .finish_non_exhaustive()
    }
}
