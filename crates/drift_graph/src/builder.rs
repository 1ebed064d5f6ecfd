//! Work-list construction of a unit's transitive include graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use drift_common::ContentHash;
use drift_parser::scan_directives;
use drift_resolve::{resolve, FileProvider, MacroEnv, Resolution, SearchPaths};

use crate::edge::IncludeEdge;
use crate::error::GraphError;
use crate::snapshot::UnitSnapshot;

/// One file awaiting directive expansion.
struct Pending {
    /// `None` when this is the root unit: its directives' edges carry no
    /// includer hash.
    includer: Option<ContentHash>,
    bytes: Vec<u8>,
    /// Directory of the file, searched first for its quoted includes.
    context_dir: Option<PathBuf>,
}

/// Builds the full snapshot for one compilation unit.
///
/// Pops files off a work list, scans their directives, resolves each one,
/// and enqueues newly discovered targets. A file hash already expanded is
/// never expanded again, which both terminates include cycles and bounds
/// the traversal by the number of distinct reachable files rather than
/// the number of include paths. Expansion order is not observable: the
/// edge set and macro-dependency union are order-independent.
pub fn build_snapshot(
    root: &Path,
    provider: &dyn FileProvider,
    search: &SearchPaths,
    macros: &MacroEnv,
) -> Result<UnitSnapshot, GraphError> {
    let root_content = provider
        .read_file(root)?
        .ok_or_else(|| GraphError::RootNotFound(root.to_path_buf()))?;
    let root_hash = root_content.hash.clone();

    let mut edges: BTreeSet<IncludeEdge> = BTreeSet::new();
    let mut macro_deps: BTreeMap<String, Option<String>> = BTreeMap::new();
    let mut visited: BTreeSet<ContentHash> = BTreeSet::new();
    visited.insert(root_hash.clone());

    let mut work = VecDeque::new();
    work.push_back(Pending {
        includer: None,
        context_dir: root_content.path.parent().map(Path::to_path_buf),
        bytes: root_content.bytes,
    });

    while let Some(pending) = work.pop_front() {
        for directive in scan_directives(&pending.bytes) {
            let resolution = resolve(
                &directive,
                pending.context_dir.as_deref(),
                search,
                macros,
                provider,
                &mut macro_deps,
            )?;
            match resolution {
                Resolution::Resolved(content) => {
                    edges.insert(IncludeEdge::new(
                        directive.path,
                        pending.includer.clone(),
                        Some(content.hash.clone()),
                    ));
                    if visited.insert(content.hash.clone()) {
                        work.push_back(Pending {
                            includer: Some(content.hash),
                            context_dir: content.path.parent().map(Path::to_path_buf),
                            bytes: content.bytes,
                        });
                    }
                }
                Resolution::Unresolved => {
                    tracing::debug!(
                        unit = %root.display(),
                        include = %directive.path,
                        "include did not match any configured root"
                    );
                    edges.insert(IncludeEdge::new(
                        directive.path,
                        pending.includer.clone(),
                        None,
                    ));
                }
            }
        }
    }

    let has_unresolved = edges.iter().any(IncludeEdge::is_unresolved);
    tracing::debug!(
        unit = %root.display(),
        files = visited.len(),
        edges = edges.len(),
        unresolved = has_unresolved,
        "snapshot built"
    );

    Ok(UnitSnapshot {
        root_hash,
        edges,
        macro_deps,
        has_unresolved,
    })
}
