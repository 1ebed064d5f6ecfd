//! The include-path resolution algorithm.

use std::collections::BTreeMap;
use std::path::Path;

use drift_parser::{IncludeDirective, IncludeKind};

use crate::macros::MacroEnv;
use crate::provider::{FileContent, FileProvider, ProviderError};
use crate::search::SearchPaths;

/// Bound on macro-to-macro indirection when substituting an include path.
/// Cyclic definitions (`A` → `B` → `A`) terminate as `Unresolved`.
const MAX_MACRO_DEPTH: u32 = 8;

/// Outcome of resolving one include directive.
///
/// `Unresolved` is a first-class state, not a failure: the directive
/// matched no configured root (or depended on an undefined macro). It is
/// recorded in the snapshot so that a configuration change that would
/// resolve it is detected as a change.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The directive matched a file; carries its identity and content.
    Resolved(FileContent),
    /// No configured root contains the named file.
    Unresolved,
}

/// Resolves one include directive against the search configuration.
///
/// Search order follows compiler convention and must not be reordered:
/// quoted includes try `context_dir` (the including file's directory),
/// then the quote roots, then the system roots; angle-bracket includes
/// skip `context_dir`. The first matching root wins.
///
/// Every macro consulted during substitution is recorded in `macro_deps`
/// with its current value (or `None` when undefined), regardless of the
/// resolution outcome, so that later macro changes are detected.
///
/// Only exhausted-retry I/O failure is an `Err`; an include that matches
/// nothing is `Ok(Resolution::Unresolved)`.
pub fn resolve(
    directive: &IncludeDirective,
    context_dir: Option<&Path>,
    search: &SearchPaths,
    macros: &MacroEnv,
    provider: &dyn FileProvider,
    macro_deps: &mut BTreeMap<String, Option<String>>,
) -> Result<Resolution, ProviderError> {
    resolve_inner(
        directive,
        context_dir,
        search,
        macros,
        provider,
        macro_deps,
        MAX_MACRO_DEPTH,
    )
}

fn resolve_inner(
    directive: &IncludeDirective,
    context_dir: Option<&Path>,
    search: &SearchPaths,
    macros: &MacroEnv,
    provider: &dyn FileProvider,
    macro_deps: &mut BTreeMap<String, Option<String>>,
    depth: u32,
) -> Result<Resolution, ProviderError> {
    match directive.kind {
        IncludeKind::Quoted => {
            let roots = context_dir
                .into_iter()
                .chain(search.angle_order().map(|p| p.as_path()));
            find_first(&directive.path, roots, provider)
        }
        IncludeKind::Angle => {
            let roots = search.angle_order().map(|p| p.as_path());
            find_first(&directive.path, roots, provider)
        }
        IncludeKind::Macro => {
            let value = macros.lookup(&directive.path).map(str::to_string);
            macro_deps.insert(directive.path.clone(), value.clone());

            let Some(value) = value else {
                return Ok(Resolution::Unresolved);
            };
            if depth == 0 {
                tracing::debug!(name = %directive.path, "macro substitution depth exceeded");
                return Ok(Resolution::Unresolved);
            }
            match classify_macro_value(&value) {
                Some(substituted) => resolve_inner(
                    &substituted,
                    context_dir,
                    search,
                    macros,
                    provider,
                    macro_deps,
                    depth - 1,
                ),
                None => Ok(Resolution::Unresolved),
            }
        }
    }
}

/// Tries `root/name` for each root in order; first hit wins.
fn find_first<'a>(
    name: &str,
    roots: impl Iterator<Item = &'a Path>,
    provider: &dyn FileProvider,
) -> Result<Resolution, ProviderError> {
    for root in roots {
        if let Some(content) = provider.read_file(&root.join(name))? {
            return Ok(Resolution::Resolved(content));
        }
    }
    Ok(Resolution::Unresolved)
}

/// Interprets a macro value as an include-path form.
///
/// `"path"` and `<path>` become quoted/angle directives; a bare identifier
/// is a further macro reference. Anything else (a function-like expansion,
/// an expression) is outside the modelled subset and yields `None`.
fn classify_macro_value(value: &str) -> Option<IncludeDirective> {
    let value = value.trim();
    if value.len() >= 3 && value.starts_with('"') && value.ends_with('"') {
        return Some(IncludeDirective {
            path: value[1..value.len() - 1].to_string(),
            kind: IncludeKind::Quoted,
        });
    }
    if value.len() >= 3 && value.starts_with('<') && value.ends_with('>') {
        return Some(IncludeDirective {
            path: value[1..value.len() - 1].to_string(),
            kind: IncludeKind::Angle,
        });
    }
    let mut chars = value.chars();
    let first = chars.next()?;
    if (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Some(IncludeDirective {
            path: value.to_string(),
            kind: IncludeKind::Macro,
        });
    }
    None
}
