//! Stable string hash used for cache file names and parameter lookup.

use std::fmt;

use xxhash_rust::xxh3::xxh3_64;

/// 32-bit hash of a string.
///
/// Computed from the low 32 bits of xxh3-64 so the value is identical across
/// runs and processes; it names on-disk artifacts shared between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StringHash(u32);

impl StringHash {
    pub const ZERO: StringHash = StringHash(0);

    #[inline]
    #[must_use]
    pub fn new(s: &str) -> Self {
        Self(xxh3_64(s.as_bytes()) as u32)
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<&str> for StringHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Eight upper-case hex digits.
impl fmt::Display for StringHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}
