//! The per-unit record of one build's effective include graph.

use std::collections::{BTreeMap, BTreeSet};

use drift_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::edge::IncludeEdge;

/// Everything recorded about one compilation unit at one build.
///
/// Rebuilt in full on every check; the previous build's snapshot is
/// read-only input to the detector and the fresh one unconditionally
/// replaces it afterwards. The edge set is flattened — every include
/// relationship reachable transitively from the root, deduplicated by
/// value — so comparing two snapshots needs no traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Content hash of the root unit's own bytes.
    pub root_hash: ContentHash,

    /// All include edges reachable transitively from the root.
    pub edges: BTreeSet<IncludeEdge>,

    /// Every macro whose value was consulted during resolution, with the
    /// value it had (`None` = undefined). A later change to any of these
    /// makes the unit stale.
    pub macro_deps: BTreeMap<String, Option<String>>,

    /// Conservative taint: at least one include matched no configured
    /// root. The orchestrator may choose to always rebuild tainted units.
    pub has_unresolved: bool,
}

impl UnitSnapshot {
    /// Maps each include site to the target it resolved to.
    ///
    /// The site — literal path plus includer hash — identifies an include
    /// across builds; the detector diffs these maps.
    pub fn sites(&self) -> BTreeMap<(&str, Option<&ContentHash>), Option<&ContentHash>> {
        self.edges
            .iter()
            .map(|e| (e.site(), e.resolved_to.as_ref()))
            .collect()
    }
}
