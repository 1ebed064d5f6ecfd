//! Shared assembly of the build context from flags and `drift.toml`.

use std::error::Error;
use std::path::{Path, PathBuf};

use drift_config::ProjectConfig;
use drift_resolve::{MacroEnv, SearchPaths};

use crate::GlobalArgs;

/// Everything a command needs to build and compare snapshots: the unit
/// list, the search-path configuration, and the macro environment, with
/// `drift.toml` values and command-line flags merged.
pub struct BuildContext {
    /// The resolved project directory.
    pub project_dir: PathBuf,
    /// Root compilation units to process.
    pub units: Vec<PathBuf>,
    /// Merged search roots. Command-line roots come before configured
    /// ones, matching how compiler drivers order `-I` flags.
    pub search: SearchPaths,
    /// Merged macro environment; `-D` flags override configured values.
    pub macros: MacroEnv,
}

/// Builds the context for one command invocation.
///
/// `drift.toml` is optional: when absent, only the flags apply. An empty
/// unit list (no flags, no config) is an error.
pub fn assemble(
    global: &GlobalArgs,
    cli_units: &[PathBuf],
    quote_dirs: &[PathBuf],
    system_dirs: &[PathBuf],
    defines: &[String],
) -> Result<BuildContext, Box<dyn Error>> {
    let project_dir = match &global.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    let config = if project_dir.join("drift.toml").is_file() {
        Some(drift_config::load_config(&project_dir)?)
    } else {
        None
    };

    let units = if cli_units.is_empty() {
        config
            .as_ref()
            .map(|c| c.unit_paths(&project_dir))
            .unwrap_or_default()
    } else {
        cli_units.to_vec()
    };
    if units.is_empty() {
        return Err("no compilation units given (pass paths or list them in drift.toml)".into());
    }

    let (search, mut macros) = match &config {
        Some(config) => (config.search_paths(&project_dir), config.macro_env()),
        None => (SearchPaths::default(), MacroEnv::new()),
    };
    let search = SearchPaths::new(
        merge_roots(quote_dirs, search.quote_roots),
        merge_roots(system_dirs, search.system_roots),
    );
    for define in defines {
        let (name, value) = parse_define(define);
        macros.define(name, value);
    }

    Ok(BuildContext {
        project_dir,
        units,
        search,
        macros,
    })
}

fn merge_roots(cli: &[PathBuf], configured: Vec<PathBuf>) -> Vec<PathBuf> {
    cli.iter().cloned().chain(configured).collect()
}

/// Splits a `-D` flag into name and value; a bare name defines `1`, as
/// compiler drivers do.
pub fn parse_define(flag: &str) -> (&str, &str) {
    match flag.split_once('=') {
        Some((name, value)) => (name, value),
        None => (flag, "1"),
    }
}

/// Renders a unit path relative to the project directory when possible,
/// for stable, readable output.
pub fn display_unit(unit: &Path, project_dir: &Path) -> String {
    unit.strip_prefix(project_dir)
        .unwrap_or(unit)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            project_dir: Some(dir.to_path_buf()),
        }
    }

    #[test]
    fn parse_define_forms() {
        assert_eq!(parse_define("CFG=\"cfg.h\""), ("CFG", "\"cfg.h\""));
        assert_eq!(parse_define("FAST"), ("FAST", "1"));
        assert_eq!(parse_define("EQ=a=b"), ("EQ", "a=b"));
    }

    #[test]
    fn flags_only_no_config() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = assemble(
            &global(dir.path()),
            &[PathBuf::from("main.c")],
            &[PathBuf::from("inc")],
            &[],
            &["X=1".to_string()],
        )
        .unwrap();
        assert_eq!(ctx.units, vec![PathBuf::from("main.c")]);
        assert_eq!(ctx.search.quote_roots, vec![PathBuf::from("inc")]);
        assert_eq!(ctx.macros.lookup("X"), Some("1"));
    }

    #[test]
    fn config_supplies_units_when_flags_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("drift.toml"),
            "[project]\nname = \"demo\"\nunits = [\"src/main.c\"]\n",
        )
        .unwrap();
        let ctx = assemble(&global(dir.path()), &[], &[], &[], &[]).unwrap();
        assert_eq!(ctx.units, vec![dir.path().join("src/main.c")]);
    }

    #[test]
    fn cli_roots_precede_configured_roots() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("drift.toml"),
            "[project]\nname = \"demo\"\nunits = [\"m.c\"]\n\n[include]\nquote = [\"cfg_inc\"]\n",
        )
        .unwrap();
        let ctx = assemble(&global(dir.path()), &[], &[PathBuf::from("cli_inc")], &[], &[]).unwrap();
        assert_eq!(
            ctx.search.quote_roots,
            vec![PathBuf::from("cli_inc"), dir.path().join("cfg_inc")]
        );
    }

    #[test]
    fn define_flag_overrides_config_macro() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("drift.toml"),
            "[project]\nname = \"demo\"\nunits = [\"m.c\"]\n\n[macros]\nCFG = '\"old.h\"'\n",
        )
        .unwrap();
        let ctx = assemble(
            &global(dir.path()),
            &[],
            &[],
            &[],
            &["CFG=\"new.h\"".to_string()],
        )
        .unwrap();
        assert_eq!(ctx.macros.lookup("CFG"), Some("\"new.h\""));
    }

    #[test]
    fn no_units_anywhere_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(assemble(&global(dir.path()), &[], &[], &[], &[]).is_err());
    }

    #[test]
    fn display_unit_strips_project_prefix() {
        assert_eq!(
            display_unit(Path::new("/proj/src/main.c"), Path::new("/proj")),
            "src/main.c"
        );
        assert_eq!(
            display_unit(Path::new("/elsewhere/main.c"), Path::new("/proj")),
            "/elsewhere/main.c"
        );
    }
}
