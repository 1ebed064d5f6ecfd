//! Project configuration (`drift.toml`) loading and validation.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{IncludeSection, ProjectConfig, ProjectSection};
