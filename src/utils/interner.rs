//! Global String Interner
//!
//! Turns define tokens into integer [`Symbol`]s so that membership tests on
//! define sets (`DIRLIGHT`, `NORMALMAP`, ...) are integer comparisons.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Compact integer identifier for an interned string.
pub type Symbol = Spur;

/// Interns a string, returning its [`Symbol`].
///
/// Returns the existing symbol when the string was interned before.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Looks up the symbol of an already interned string without allocating.
#[inline]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a symbol back to its string.
#[inline]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_and_resolve() {
        let s1 = intern("NORMALMAP");
        let s2 = intern("NORMALMAP");
        let s3 = intern("DIRLIGHT");

        assert_eq!(s1, s2);
        assert_ne!(s1, s3);

        assert_eq!(resolve(s1), "NORMALMAP");
        assert_eq!(resolve(s3), "DIRLIGHT");
    }

    #[test]
    fn get_does_not_intern() {
        let _ = intern("SPECMAP");

        assert!(get("SPECMAP").is_some());
        assert!(get("NEVER_INTERNED_DEFINE_TOKEN").is_none());
    }
}
