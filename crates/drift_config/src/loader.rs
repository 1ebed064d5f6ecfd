//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::ProjectConfig;

/// Loads and validates a `drift.toml` configuration from a project
/// directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("drift.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `drift.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "demo"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "demo");
        assert!(config.project.units.is_empty());
        assert!(config.include.quote.is_empty());
        assert!(config.macros.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "demo"
units = ["src/main.c", "src/util.c"]

[include]
quote = ["include", "src"]
system = ["/usr/include"]

[macros]
CONFIG_HEADER = '"config/generated.h"'
PLATFORM = "<platform.h>"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.units.len(), 2);
        assert_eq!(
            config.include.quote,
            vec![PathBuf::from("include"), PathBuf::from("src")]
        );
        assert_eq!(config.include.system, vec![PathBuf::from("/usr/include")]);
        assert_eq!(
            config.macros.get("CONFIG_HEADER"),
            Some(&"\"config/generated.h\"".to_string())
        );
        assert_eq!(config.macros.get("PLATFORM"), Some(&"<platform.h>".to_string()));
    }

    #[test]
    fn empty_name_rejected() {
        let toml = r#"
[project]
name = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = load_config_from_str("[project\nname=").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("drift.toml"),
            "[project]\nname = \"on-disk\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "on-disk");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
