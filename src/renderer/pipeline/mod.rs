//! Shader variation build pipeline:
//! - cache_key: artifact paths and freshness
//! - preprocess: varying include rewrite
//! - invocation: offline compiler command line
//! - bytecode: cached bytecode loading
//! - reflect: uniform reflection and texture units
//! - builder: cache lookup / compile / reload orchestration
//! - variation: `ShaderVariation` lifecycle

pub mod builder;
pub mod bytecode;
pub mod cache_key;
pub mod invocation;
pub mod preprocess;
pub mod reflect;
pub mod variation;

pub use builder::VariationBuilder;
pub use bytecode::{BytecodeLoad, load_bytecode};
pub use cache_key::{CacheKey, derive_path, is_fresh, is_valid};
pub use invocation::{CompilerInvocation, CompilerInvocationBuilder, InvocationPaths};
pub use preprocess::{PreprocessedSource, augment_varying, preprocess};
pub use reflect::{MAX_TEXTURE_UNITS, Reflection, ShaderParameter, reflect};
pub use variation::{ShaderVariation, VariationState};
