//! One resolved include relationship.

use drift_common::ContentHash;
use serde::{Deserialize, Serialize};

/// One include directive's resolution outcome, recorded in a snapshot.
///
/// The include *site* — the literal path text plus the hash of the file
/// containing the directive — is the edge's identity across builds: the
/// same site can legitimately resolve to different targets when macro
/// state or search order changes, and the detector must still recognize
/// it as the same include. `resolved_to` is therefore never used alone to
/// identify an edge; field order puts `include_path` first so the derived
/// ordering discriminates on it primarily.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IncludeEdge {
    /// The literal path text as written, before resolution.
    pub include_path: String,
    /// Content hash of the file containing the directive; `None` when the
    /// directive is in the root compilation unit itself.
    pub included_by: Option<ContentHash>,
    /// Content hash of the file the directive resolved to; `None` when the
    /// include matched no configured root.
    pub resolved_to: Option<ContentHash>,
}

impl IncludeEdge {
    /// Creates an edge. `include_path` must be non-empty (the parser never
    /// emits empty paths).
    pub fn new(
        include_path: impl Into<String>,
        included_by: Option<ContentHash>,
        resolved_to: Option<ContentHash>,
    ) -> Self {
        let include_path = include_path.into();
        debug_assert!(!include_path.is_empty());
        Self {
            include_path,
            included_by,
            resolved_to,
        }
    }

    /// The site key: what identifies this include across builds.
    pub fn site(&self) -> (&str, Option<&ContentHash>) {
        (&self.include_path, self.included_by.as_ref())
    }

    /// Returns `true` if the include matched no configured root.
    pub fn is_unresolved(&self) -> bool {
        self.resolved_to.is_none()
    }
}
