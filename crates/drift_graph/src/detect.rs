//! Staleness detection: previous snapshot vs. current tree state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use drift_resolve::{FileProvider, MacroEnv, SearchPaths};

use crate::builder::build_snapshot;
use crate::error::GraphError;
use crate::snapshot::UnitSnapshot;

/// Why a unit must be recompiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// No snapshot was recorded for this unit.
    FirstBuild,
    /// The root unit's own content changed.
    RootChanged,
    /// A macro whose value influenced a previous resolution changed.
    MacroChanged(String),
    /// An include site resolves to a different target than recorded, or
    /// a previously recorded site is gone.
    IncludeChanged(String),
    /// An include site is reachable now that the previous snapshot never
    /// saw (typically macro-conditional inclusion).
    IncludeAppeared(String),
    /// The root unit no longer exists.
    RootMissing(PathBuf),
    /// A file could not be read even after retries; missing information
    /// always biases toward rebuilding.
    ReadFailure(PathBuf),
}

impl std::fmt::Display for StaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleReason::FirstBuild => write!(f, "first build"),
            StaleReason::RootChanged => write!(f, "source content changed"),
            StaleReason::MacroChanged(name) => write!(f, "macro '{name}' changed"),
            StaleReason::IncludeChanged(path) => {
                write!(f, "include '{path}' resolves differently")
            }
            StaleReason::IncludeAppeared(path) => write!(f, "new include '{path}'"),
            StaleReason::RootMissing(path) => write!(f, "source missing: {}", path.display()),
            StaleReason::ReadFailure(path) => write!(f, "unreadable: {}", path.display()),
        }
    }
}

/// Per-unit verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The unit must be recompiled.
    Stale(StaleReason),
    /// Nothing the unit depends on changed; compilation can be skipped.
    UpToDate,
}

impl Verdict {
    /// Returns `true` for any `Stale` verdict.
    pub fn is_stale(&self) -> bool {
        matches!(self, Verdict::Stale(_))
    }
}

/// The detector's output for one unit: the verdict plus the freshly built
/// snapshot to persist. The snapshot is absent only when the build itself
/// failed (missing root, exhausted I/O retries); the caller should then
/// keep the previous snapshot as a baseline for the next attempt.
#[derive(Debug)]
pub struct UnitOutcome {
    /// Whether the unit must be recompiled, and why.
    pub verdict: Verdict,
    /// The snapshot to persist, replacing the previous one unconditionally.
    pub snapshot: Option<UnitSnapshot>,
}

/// Decides whether one compilation unit is stale.
///
/// Builds the unit's fresh snapshot — a full re-resolution of every
/// include under the current configuration and tree state — and compares
/// it against the previous one, short-circuiting on the first difference
/// in this order: missing snapshot, root content, macro values, include
/// sites. An `UpToDate` verdict still carries the fresh snapshot so that
/// stored hashes stay current.
pub fn check_unit(
    root: &Path,
    previous: Option<&UnitSnapshot>,
    provider: &dyn FileProvider,
    search: &SearchPaths,
    macros: &MacroEnv,
) -> UnitOutcome {
    let current = match build_snapshot(root, provider, search, macros) {
        Ok(snapshot) => snapshot,
        Err(GraphError::RootNotFound(path)) => {
            return UnitOutcome {
                verdict: Verdict::Stale(StaleReason::RootMissing(path)),
                snapshot: None,
            }
        }
        Err(GraphError::Provider(e)) => {
            tracing::warn!(unit = %root.display(), error = %e, "read failure, forcing rebuild");
            return UnitOutcome {
                verdict: Verdict::Stale(StaleReason::ReadFailure(e.path)),
                snapshot: None,
            };
        }
    };

    let verdict = compare(previous, &current, macros);
    if let Verdict::Stale(reason) = &verdict {
        tracing::debug!(unit = %root.display(), ?reason, "stale");
    }
    UnitOutcome {
        verdict,
        snapshot: Some(current),
    }
}

fn compare(
    previous: Option<&UnitSnapshot>,
    current: &UnitSnapshot,
    macros: &MacroEnv,
) -> Verdict {
    let Some(previous) = previous else {
        return Verdict::Stale(StaleReason::FirstBuild);
    };

    if previous.root_hash != current.root_hash {
        return Verdict::Stale(StaleReason::RootChanged);
    }

    for (name, recorded) in &previous.macro_deps {
        if macros.lookup(name) != recorded.as_deref() {
            return Verdict::Stale(StaleReason::MacroChanged(name.clone()));
        }
    }

    // The fresh snapshot re-resolved every include; diff per site. A site
    // resolving differently (including Unresolved transitions) or present
    // on only one side means the effective graph changed.
    let previous_sites = previous.sites();
    let current_sites = current.sites();
    for (site, resolved) in &current_sites {
        match previous_sites.get(site) {
            None => return Verdict::Stale(StaleReason::IncludeAppeared(site.0.to_string())),
            Some(recorded) if recorded != resolved => {
                return Verdict::Stale(StaleReason::IncludeChanged(site.0.to_string()))
            }
            Some(_) => {}
        }
    }
    for site in previous_sites.keys() {
        if !current_sites.contains_key(site) {
            return Verdict::Stale(StaleReason::IncludeChanged(site.0.to_string()));
        }
    }

    Verdict::UpToDate
}

/// Checks many units in parallel.
///
/// Units are independent: each has its own work list and visited set, and
/// the provider, search paths, and macro environment are shared read-only.
/// Results are returned in input order.
pub fn check_units(
    units: &[PathBuf],
    previous: &BTreeMap<PathBuf, UnitSnapshot>,
    provider: &dyn FileProvider,
    search: &SearchPaths,
    macros: &MacroEnv,
) -> Vec<(PathBuf, UnitOutcome)> {
    units
        .par_iter()
        .map(|unit| {
            let outcome = check_unit(unit, previous.get(unit), provider, search, macros);
            (unit.clone(), outcome)
        })
        .collect()
}
