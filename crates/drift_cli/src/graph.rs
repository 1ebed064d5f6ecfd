//! `drift graph` — dump one unit's effective include graph.
//!
//! A debugging aid: expands the unit under the given configuration and
//! prints every include edge, the macro-dependency set, and the
//! unresolved taint. Nothing is persisted.

use std::error::Error;

use drift_graph::build_snapshot;
use drift_resolve::DiskProvider;

use crate::setup::{assemble, display_unit};
use crate::{GlobalArgs, GraphArgs, ReportFormat};

/// Runs the `drift graph` command.
pub fn run(args: &GraphArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let ctx = assemble(
        global,
        std::slice::from_ref(&args.unit),
        &args.quote_dirs,
        &args.system_dirs,
        &args.defines,
    )?;

    let provider = DiskProvider::default();
    let snapshot = build_snapshot(&args.unit, &provider, &ctx.search, &ctx.macros)?;

    match args.format {
        ReportFormat::Text => {
            println!(
                "{}  {}",
                snapshot.root_hash,
                display_unit(&args.unit, &ctx.project_dir)
            );
            for edge in &snapshot.edges {
                let includer = match &edge.included_by {
                    Some(hash) => hash.to_hex(),
                    None => "<root>".to_string(),
                };
                let target = match &edge.resolved_to {
                    Some(hash) => hash.to_hex(),
                    None => "<unresolved>".to_string(),
                };
                println!("  {} -> {}  via {}", includer, target, edge.include_path);
            }
            for (name, value) in &snapshot.macro_deps {
                match value {
                    Some(value) => println!("  macro {name} = {value}"),
                    None => println!("  macro {name} (undefined)"),
                }
            }
            if snapshot.has_unresolved && !global.quiet {
                eprintln!("warning: unit has unresolved includes");
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(0)
}
