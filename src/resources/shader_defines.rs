//! Shader Define Strings
//!
//! A variation is selected by a space-separated list of preprocessor symbols,
//! e.g. `"NORMALMAP DIRLIGHT SHADOW"`. [`ShaderDefines`] keeps the string
//! exactly as given (it is what gets hashed into the cache key) alongside the
//! interned tokens used for membership tests.
//!
//! # Hashing
//!
//! The cache key hashes the **whole string**, so any change, including token
//! order or spacing, produces a different key. Use
//! [`ShaderDefines::normalized`] to get the canonical spelling (upper-case,
//! sorted, single-spaced) before registering a variation.
//!
//! ```rust,ignore
//! use prism::resources::ShaderDefines;
//!
//! let defines = ShaderDefines::parse("NORMALMAP DIRLIGHT");
//! assert!(defines.contains("DIRLIGHT"));
//! let hash = defines.compute_hash();
//! ```

use std::fmt;

use smallvec::SmallVec;

use crate::utils::StringHash;
use crate::utils::interner::{self, Symbol};

/// Ordered list of define tokens plus their source string.
#[derive(Debug, Clone, Default)]
pub struct ShaderDefines {
    text: String,
    tokens: SmallVec<[Symbol; 8]>,
}

impl ShaderDefines {
    /// Create an empty define list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a space-separated define string.
    ///
    /// The string is kept verbatim; empty tokens produced by repeated spaces
    /// are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let tokens = text
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(interner::intern)
            .collect();
        Self {
            text: text.to_string(),
            tokens,
        }
    }

    /// The define string exactly as given
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Check if a define token is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        interner::get(name).is_some_and(|sym| self.contains_symbol(sym))
    }

    /// Check if a define token is present using its Symbol
    #[inline]
    #[must_use]
    pub fn contains_symbol(&self, sym: Symbol) -> bool {
        self.tokens.contains(&sym)
    }

    /// Iterate tokens in their original order
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tokens.iter().map(|&sym| interner::resolve(sym))
    }

    /// Number of tokens
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Hash of the whole define string (cache key segment)
    #[must_use]
    pub fn compute_hash(&self) -> StringHash {
        StringHash::new(&self.text)
    }

    /// Canonical spelling: tokens upper-cased, sorted and joined by single spaces.
    #[must_use]
    pub fn normalized(&self) -> ShaderDefines {
        let mut tokens: Vec<String> = self.tokens().map(str::to_uppercase).collect();
        tokens.sort();
        Self::parse(&tokens.join(" "))
    }
}

impl PartialEq for ShaderDefines {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for ShaderDefines {}

impl fmt::Display for ShaderDefines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for ShaderDefines {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_contains() {
        let defines = ShaderDefines::parse("NORMALMAP DIRLIGHT");

        assert!(defines.contains("NORMALMAP"));
        assert!(defines.contains("DIRLIGHT"));
        assert!(!defines.contains("VSM_SHADOW"));
        assert_eq!(defines.len(), 2);
        assert_eq!(defines.as_str(), "NORMALMAP DIRLIGHT");
    }

    #[test]
    fn test_tokens_keep_order_and_skip_empty() {
        let defines = ShaderDefines::parse("  B  A C ");
        let tokens: Vec<_> = defines.tokens().collect();
        assert_eq!(tokens, ["B", "A", "C"]);
    }

    #[test]
    fn test_empty() {
        let defines = ShaderDefines::parse("");
        assert!(defines.is_empty());
        assert_eq!(defines.tokens().count(), 0);
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        let d1 = ShaderDefines::parse("A B");
        let d2 = ShaderDefines::parse("B A");
        assert_ne!(d1.compute_hash(), d2.compute_hash());
        assert_eq!(d1.compute_hash(), ShaderDefines::parse("A B").compute_hash());
    }

    #[test]
    fn test_normalized() {
        let defines = ShaderDefines::parse("skinned  NORMALMAP dirlight");
        assert_eq!(defines.normalized().as_str(), "DIRLIGHT NORMALMAP SKINNED");
        assert_eq!(
            defines.normalized().compute_hash(),
            ShaderDefines::parse("DIRLIGHT NORMALMAP SKINNED").compute_hash()
        );
    }
}
