//! Error types for graph building and snapshot persistence.

use std::path::PathBuf;

use drift_resolve::ProviderError;

/// Errors from building a compilation unit's snapshot.
///
/// Unresolved includes are not errors — they are recorded in the snapshot
/// as edges with no target. Only a missing root unit or an exhausted-retry
/// I/O failure aborts a build.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The root compilation unit itself does not exist.
    #[error("compilation unit not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// A file read failed after bounded retries.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Errors from writing the snapshot store.
///
/// Reads are fail-safe and never produce these: a missing or corrupt
/// store loads as empty, which simply means every unit is a first build.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while writing the store.
    #[error("snapshot store I/O error at {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The store could not be serialized.
    #[error("failed to serialize snapshot store: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_not_found_display() {
        let err = GraphError::RootNotFound(PathBuf::from("src/main.c"));
        assert_eq!(format!("{err}"), "compilation unit not found: src/main.c");
    }

    #[test]
    fn store_io_display() {
        let err = StoreError::Io {
            path: PathBuf::from("/state/snapshots.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("snapshot store I/O error"));
        assert!(msg.contains("snapshots.json"));
    }

    #[test]
    fn store_serialization_display() {
        let err = StoreError::Serialization {
            reason: "unexpected value".to_string(),
        };
        assert!(err.to_string().contains("unexpected value"));
    }
}
