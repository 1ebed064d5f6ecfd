//! Shared foundational types for the drift dependency tracker.
//!
//! This crate provides the content hash used throughout drift as the
//! identity of file contents, together with its construction errors.

#![warn(missing_docs)]

pub mod hash;

pub use hash::{ContentHash, HashError};
