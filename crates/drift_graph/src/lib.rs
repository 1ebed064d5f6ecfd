//! Content-addressed include graphs and staleness detection.
//!
//! This crate is the heart of drift: it builds, per compilation unit, a
//! snapshot of the unit's transitive include closure keyed entirely by
//! content hash, and compares it against the snapshot persisted at the
//! previous build to decide whether the unit must be recompiled. No
//! timestamps are consulted anywhere; a content-identical rewrite is not
//! a change, and a copy that preserves content is not a change either.

#![warn(missing_docs)]

pub mod builder;
pub mod detect;
pub mod edge;
pub mod error;
pub mod snapshot;
pub mod store;

pub use builder::build_snapshot;
pub use detect::{check_unit, check_units, StaleReason, UnitOutcome, Verdict};
pub use edge::IncludeEdge;
pub use error::{GraphError, StoreError};
pub use snapshot::UnitSnapshot;
pub use store::SnapshotStore;
