//! Error Types
//!
//! This module defines the error types used throughout the shader pipeline.
//!
//! # Overview
//!
//! The main error type [`PrismError`] covers all failure modes including:
//! - Missing device / expired owner shader (configuration errors)
//! - Source preprocessing failures
//! - Offline compiler launch and exit failures
//! - GPU shader object creation failures
//! - File I/O and configuration parsing
//!
//! # Usage
//!
//! Internal steps return [`Result<T>`], an alias for `std::result::Result<T, PrismError>`.
//! [`ShaderVariation::create`](crate::renderer::pipeline::ShaderVariation::create)
//! folds any error into a boolean plus a human-readable diagnostic.
//!
//! ```rust,ignore
//! use prism::errors::{PrismError, Result};
//!
//! fn compile_step() -> Result<()> {
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::renderer::core::ShaderStage;

/// The main error type for the shader pipeline.
#[derive(Error, Debug)]
pub enum PrismError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The variation was created without a graphics device.
    #[error("No graphics device available")]
    NoDevice,

    /// The logical shader that owns the variation has been dropped.
    #[error("Owner shader has expired")]
    OwnerExpired,

    // ========================================================================
    // Preprocessing Errors
    // ========================================================================
    /// The shader source does not include an interface-definition (varying) file.
    #[error("Shader {shader} does not include a varying definition file")]
    MissingVaryingDef {
        /// Full name of the variation being compiled
        shader: String,
    },

    // ========================================================================
    // Compiler Errors
    // ========================================================================
    /// The offline shader compiler could not be started.
    #[error("Failed to launch shader compiler {}: {source}", .executable.display())]
    CompilerLaunch {
        /// Resolved compiler executable
        executable: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The offline shader compiler exited with a non-zero status.
    #[error("Shader compiler exited with code {exit_code}: {command}\n{output}")]
    CompilerFailed {
        /// Full command line that was executed
        command: String,
        /// Process exit code
        exit_code: i32,
        /// Captured compiler output
        output: String,
    },

    /// No usable bytecode was found after a successful compile.
    #[error("No valid bytecode at {} after compiling", .path.display())]
    BytecodeUnavailable {
        /// Expected binary artifact path
        path: PathBuf,
    },

    // ========================================================================
    // GPU Object Errors
    // ========================================================================
    /// The device rejected the bytecode.
    #[error("Could not create {} shader", .stage.debug_name())]
    ShaderCreation {
        /// Stage of the rejected shader
        stage: ShaderStage,
    },

    /// Bytecode ended up empty, so nothing could be handed to the device.
    #[error("Could not create {} shader, empty bytecode", .stage.debug_name())]
    EmptyBytecode {
        /// Stage of the empty shader
        stage: ShaderStage,
    },

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Shader source is not valid UTF-8.
    #[error("Shader source {name} is not valid UTF-8")]
    InvalidSource {
        /// Resource name
        name: String,
        /// Underlying decode error
        #[source]
        source: std::string::FromUtf8Error,
    },

    // ========================================================================
    // I/O & Parsing Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, PrismError>`.
pub type Result<T> = std::result::Result<T, PrismError>;
