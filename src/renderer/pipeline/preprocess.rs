//! Shader source preprocessing.
//!
//! Every shader includes an interface-definition file describing its
//! varyings (`#include "varying_<family>.def.sc"`). The compiler receives that
//! file through `--varyingdef` instead, so the include line is commented out
//! and the referenced family may be swapped for a define-specific variant.

use std::path::{Path, PathBuf};

use crate::resources::ShaderDefines;

const INCLUDE_PREFIX: &str = "#include \"";
const VARYING_MARKER: &str = "#include \"varying_";
const VARYING_EXT: &str = ".def.sc";

/// Output of [`preprocess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessedSource {
    /// Identifier referenced by the source, e.g. `varying_scenepass_x`
    pub varying_base: String,
    /// Identifier after augmentation, e.g. `varying_scenepass_x_normal`
    pub varying: String,
    /// `<include_dir>/<varying>.def.sc`
    pub varying_def: PathBuf,
    /// Source with the varying include commented out
    pub source: String,
}

/// Location of the varying include inside one line.
struct VaryingInclude<'a> {
    line: usize,
    /// Byte offset of `#include`
    start: usize,
    /// Byte offset just past `.def.sc` and its closing quote
    end: usize,
    base: &'a str,
}

fn find_varying_include(source: &str) -> Option<VaryingInclude<'_>> {
    let (line, text) = source
        .split_inclusive('\n')
        .enumerate()
        .find(|(_, text)| text.contains(VARYING_MARKER))?;

    let start = text.find(VARYING_MARKER)?;
    let ext = start + text[start..].find(VARYING_EXT)?;
    let mut end = ext + VARYING_EXT.len();
    if text[end..].starts_with('"') {
        end += 1;
    }

    Some(VaryingInclude {
        line,
        start,
        end,
        base: &text[start + INCLUDE_PREFIX.len()..ext],
    })
}

/// Applies the define-dependent varying variants.
///
/// Exactly three families have variants, chosen by the identifier's second
/// `_` segment; at most one suffix is appended.
#[must_use]
pub fn augment_varying(base: &str, defines: &ShaderDefines) -> String {
    let family = base.split('_').nth(1);
    let suffix = match family {
        Some("deferred") if defines.contains("DIRLIGHT") => Some("dirlight"),
        Some("shadow") if defines.contains("VSM_SHADOW") => Some("vsm"),
        Some("scenepass") if defines.contains("NORMALMAP") => Some("normal"),
        _ => None,
    };

    match suffix {
        Some(suffix) => format!("{base}_{suffix}"),
        None => base.to_string(),
    }
}

/// Resolves the interface-definition file and neutralizes its include.
///
/// Returns `None` when the source has no varying include; such a shader
/// cannot be compiled.
#[must_use]
pub fn preprocess(
    source: &str,
    defines: &ShaderDefines,
    include_dir: &Path,
) -> Option<PreprocessedSource> {
    let include = find_varying_include(source)?;
    let varying = augment_varying(include.base, defines);

    let mut rewritten = String::with_capacity(source.len() + 3);
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index == include.line {
            rewritten.push_str(&text[..include.start]);
            rewritten.push_str("//");
            rewritten.push_str(&text[include.start..include.end]);
            rewritten.push('\n');
            rewritten.push_str(&text[include.end..]);
        } else {
            rewritten.push_str(text);
        }
    }

    Some(PreprocessedSource {
        varying_base: include.base.to_string(),
        varying_def: include_dir.join(format!("{varying}{VARYING_EXT}")),
        varying,
        source: rewritten,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "$input a_position\n#include \"varying_scenepass_x.def.sc\"\n#include \"common.sh\"\nvoid main() {}\n";

    #[test]
    fn comments_out_include_and_keeps_rest() {
        let out = preprocess(SOURCE, &ShaderDefines::new(), Path::new("/shaders")).unwrap();

        assert_eq!(out.varying_base, "varying_scenepass_x");
        assert_eq!(out.varying, "varying_scenepass_x");
        assert_eq!(out.varying_def, PathBuf::from("/shaders/varying_scenepass_x.def.sc"));
        assert_eq!(
            out.source,
            "$input a_position\n//#include \"varying_scenepass_x.def.sc\"\n\n#include \"common.sh\"\nvoid main() {}\n"
        );
    }

    #[test]
    fn trailing_code_moves_to_its_own_line() {
        let source = "  #include \"varying_basic.def.sc\" // vs\n";
        let out = preprocess(source, &ShaderDefines::new(), Path::new("")).unwrap();
        assert_eq!(out.source, "  //#include \"varying_basic.def.sc\"\n // vs\n");
    }

    #[test]
    fn missing_include_fails() {
        let source = "#include \"common.sh\"\nvoid main() {}\n";
        assert!(preprocess(source, &ShaderDefines::new(), Path::new("")).is_none());
    }

    #[test]
    fn include_without_extension_fails() {
        let source = "#include \"varying_basic.sc\"\n";
        assert!(preprocess(source, &ShaderDefines::new(), Path::new("")).is_none());
    }

    #[test]
    fn only_first_include_is_rewritten() {
        let source = "#include \"varying_a.def.sc\"\n#include \"varying_b.def.sc\"\n";
        let out = preprocess(source, &ShaderDefines::new(), Path::new("")).unwrap();
        assert_eq!(out.varying, "varying_a");
        assert!(out.source.ends_with("\n#include \"varying_b.def.sc\"\n"));
    }

    #[test]
    fn augmentation_rules() {
        let normal = ShaderDefines::parse("NORMALMAP");
        let dirlight = ShaderDefines::parse("DIRLIGHT");
        let vsm = ShaderDefines::parse("VSM_SHADOW");

        assert_eq!(augment_varying("varying_scenepass_x", &normal), "varying_scenepass_x_normal");
        assert_eq!(augment_varying("varying_deferred_y", &dirlight), "varying_deferred_y_dirlight");
        assert_eq!(augment_varying("varying_shadow_z", &vsm), "varying_shadow_z_vsm");

        assert_eq!(augment_varying("varying_scenepass_x", &dirlight), "varying_scenepass_x");
        assert_eq!(augment_varying("varying_deferred_y", &normal), "varying_deferred_y");
        assert_eq!(augment_varying("varying_shadow_z", &ShaderDefines::new()), "varying_shadow_z");
        assert_eq!(augment_varying("varying_unlit", &normal), "varying_unlit");
    }

    #[test]
    fn resolved_path_uses_augmented_name() {
        let out = preprocess(SOURCE, &ShaderDefines::parse("NORMALMAP"), Path::new("/shaders")).unwrap();
        assert_eq!(out.varying_def, PathBuf::from("/shaders/varying_scenepass_x_normal.def.sc"));
    }
}
