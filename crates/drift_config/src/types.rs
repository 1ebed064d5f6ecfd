//! Configuration schema for `drift.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use drift_resolve::{MacroEnv, SearchPaths};
use serde::{Deserialize, Serialize};

/// Top-level `drift.toml` configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// The `[project]` section.
    pub project: ProjectSection,

    /// The `[include]` section (search roots).
    #[serde(default)]
    pub include: IncludeSection,

    /// The `[macros]` table: object-like macro definitions for
    /// include-path substitution.
    #[serde(default)]
    pub macros: BTreeMap<String, String>,
}

/// The `[project]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Project name.
    pub name: String,

    /// Root compilation units, relative to the project directory.
    #[serde(default)]
    pub units: Vec<PathBuf>,
}

/// The `[include]` section: ordered search roots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeSection {
    /// Quoted-include roots, in search order.
    #[serde(default)]
    pub quote: Vec<PathBuf>,

    /// System-include roots, in search order.
    #[serde(default)]
    pub system: Vec<PathBuf>,
}

impl ProjectConfig {
    /// Builds the search-path configuration, anchoring relative roots at
    /// the project directory.
    pub fn search_paths(&self, project_dir: &Path) -> SearchPaths {
        SearchPaths::new(
            self.include
                .quote
                .iter()
                .map(|p| anchor(project_dir, p))
                .collect(),
            self.include
                .system
                .iter()
                .map(|p| anchor(project_dir, p))
                .collect(),
        )
    }

    /// Builds the macro environment from the `[macros]` table.
    pub fn macro_env(&self) -> MacroEnv {
        self.macros
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Unit paths anchored at the project directory.
    pub fn unit_paths(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.project
            .units
            .iter()
            .map(|p| anchor(project_dir, p))
            .collect()
    }
}

fn anchor(project_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}
