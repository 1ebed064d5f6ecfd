//! Include-path resolution for the drift dependency tracker.
//!
//! Maps a parsed include directive to the file it denotes under a given
//! search-path configuration and macro environment, following the
//! compiler convention: quoted includes try the including file's own
//! directory first, angle-bracket includes never do. An include that
//! matches no configured root is [`Resolution::Unresolved`] — ordinary
//! data, not an error.

#![warn(missing_docs)]

pub mod macros;
pub mod provider;
pub mod resolver;
pub mod search;

pub use macros::MacroEnv;
pub use provider::{DiskProvider, FileContent, FileProvider, MemoryProvider, ProviderError};
pub use resolver::{resolve, Resolution};
pub use search::SearchPaths;
