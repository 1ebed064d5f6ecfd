//! `drift check` — per-unit staleness verdicts.
//!
//! Loads the previous snapshot store, rebuilds every unit's include graph
//! against current tree state, prints a verdict per unit, and persists the
//! fresh snapshots. Exit code 0 means every unit is up to date; 2 means at
//! least one unit must be recompiled, so build wrappers can branch on it.

use std::error::Error;

use drift_graph::{check_units, SnapshotStore, Verdict};
use drift_resolve::DiskProvider;

use crate::setup::{assemble, display_unit};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Exit code signalling that at least one unit is stale.
const EXIT_STALE: i32 = 2;

/// Runs the `drift check` command.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let ctx = assemble(
        global,
        &args.units,
        &args.quote_dirs,
        &args.system_dirs,
        &args.defines,
    )?;

    let state_dir = if args.state_dir.is_absolute() {
        args.state_dir.clone()
    } else {
        ctx.project_dir.join(&args.state_dir)
    };
    let mut store = SnapshotStore::load_or_create(&state_dir, env!("CARGO_PKG_VERSION"));

    let provider = DiskProvider::default();
    let results = check_units(
        &ctx.units,
        &store.units,
        &provider,
        &ctx.search,
        &ctx.macros,
    );

    let mut stale_count = 0;
    match args.format {
        ReportFormat::Text => {
            for (unit, outcome) in &results {
                let name = display_unit(unit, &ctx.project_dir);
                match &outcome.verdict {
                    Verdict::Stale(reason) => {
                        stale_count += 1;
                        println!("stale       {name} ({reason})");
                    }
                    Verdict::UpToDate => println!("up-to-date  {name}"),
                }
            }
            if !global.quiet {
                eprintln!(
                    "{} of {} units need recompilation",
                    stale_count,
                    results.len()
                );
            }
        }
        ReportFormat::Json => {
            let units: Vec<_> = results
                .iter()
                .map(|(unit, outcome)| {
                    let reason = match &outcome.verdict {
                        Verdict::Stale(reason) => {
                            stale_count += 1;
                            Some(reason.to_string())
                        }
                        Verdict::UpToDate => None,
                    };
                    serde_json::json!({
                        "unit": display_unit(unit, &ctx.project_dir),
                        "stale": reason.is_some(),
                        "reason": reason,
                        "has_unresolved": outcome
                            .snapshot
                            .as_ref()
                            .map(|s| s.has_unresolved),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "units": units }))?
            );
        }
    }

    // Persist fresh snapshots; units whose build failed keep their
    // previous snapshot as the baseline for the next attempt.
    for (unit, outcome) in results {
        if let Some(snapshot) = outcome.snapshot {
            store.record(unit, snapshot);
        }
    }
    store.save(&state_dir)?;

    Ok(if stale_count > 0 { EXIT_STALE } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn write(path: &Path, content: &str) {
        std::fs::write(path, content).unwrap();
    }

    fn check_args(units: Vec<PathBuf>) -> CheckArgs {
        CheckArgs {
            units,
            quote_dirs: vec![],
            system_dirs: vec![],
            defines: vec![],
            state_dir: PathBuf::from(".drift"),
            format: ReportFormat::Text,
        }
    }

    fn global(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            project_dir: Some(dir.to_path_buf()),
        }
    }

    #[test]
    fn first_check_stale_second_up_to_date() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("main.c"), "#include \"a.h\"\n");
        write(&dir.path().join("a.h"), "int a;\n");
        let args = check_args(vec![dir.path().join("main.c")]);

        let code = run(&args, &global(dir.path())).unwrap();
        assert_eq!(code, EXIT_STALE);
        assert!(dir.path().join(".drift/snapshots.json").exists());

        let code = run(&args, &global(dir.path())).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn header_edit_makes_unit_stale_again() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("main.c"), "#include \"a.h\"\n");
        write(&dir.path().join("a.h"), "int a;\n");
        let args = check_args(vec![dir.path().join("main.c")]);

        run(&args, &global(dir.path())).unwrap();
        assert_eq!(run(&args, &global(dir.path())).unwrap(), 0);

        write(&dir.path().join("a.h"), "int a_changed;\n");
        assert_eq!(run(&args, &global(dir.path())).unwrap(), EXIT_STALE);
    }

    #[test]
    fn units_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("drift.toml"),
            "[project]\nname = \"demo\"\nunits = [\"main.c\"]\n",
        );
        write(&dir.path().join("main.c"), "int main;\n");
        let args = check_args(vec![]);

        assert_eq!(run(&args, &global(dir.path())).unwrap(), EXIT_STALE);
        assert_eq!(run(&args, &global(dir.path())).unwrap(), 0);
    }

    #[test]
    fn missing_unit_reports_stale_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = check_args(vec![dir.path().join("ghost.c")]);
        assert_eq!(run(&args, &global(dir.path())).unwrap(), EXIT_STALE);
    }

    #[test]
    fn json_format_runs() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("main.c"), "int main;\n");
        let mut args = check_args(vec![dir.path().join("main.c")]);
        args.format = ReportFormat::Json;
        assert_eq!(run(&args, &global(dir.path())).unwrap(), EXIT_STALE);
    }
}
