//! Utility Module
//!
//! - [`interner`]: String interning for define tokens
//! - [`string_hash`]: Stable 32-bit hash for cache names and parameter keys
//!
//! # String Interning
//!
//! Interned strings (Symbols) can be compared in O(1) time.
//!
//! ```rust,ignore
//! use prism::utils::interner;
//!
//! let sym1 = interner::intern("NORMALMAP");
//! let sym2 = interner::intern("NORMALMAP");
//! assert_eq!(sym1, sym2);
//! ```

pub mod interner;
pub mod string_hash;

pub use interner::Symbol;
pub use string_hash::StringHash;
