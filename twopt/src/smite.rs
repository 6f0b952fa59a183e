//! The SMITE build subcommand: god and item pool come in as JSON files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use twopt_smite::{optimize_build, God, Item};

use crate::campaign::SolverArg;

#[derive(Args, Debug)]
pub struct SmiteArgs {
    /// JSON file with the god's base stats
    #[arg(long)]
    god: PathBuf,

    /// JSON file with the candidate item pool
    #[arg(long)]
    items: PathBuf,

    #[arg(long, value_enum, default_value_t = SolverArg::Cbc)]
    solver: SolverArg,
}

pub fn run(args: &SmiteArgs) -> Result<()> {
    let god: God = serde_json::from_str(
        &std::fs::read_to_string(&args.god)
            .with_context(|| format!("reading {}", args.god.display()))?,
    )
    .context("parsing god file")?;
    let items: Vec<Item> = serde_json::from_str(
        &std::fs::read_to_string(&args.items)
            .with_context(|| format!("reading {}", args.items.display()))?,
    )
    .context("parsing items file")?;

    log::info!("{}: optimizing over {} items", god.name, items.len());
    match optimize_build(&god, &items, args.solver.into())? {
        Some(build) => {
            println!("Build for {} (DPS {:.2}, base {:.2}):", god.name, build.dps, god.base_dps());
            for item in &build.items {
                println!(
                    "  {} ({:?}, {:.0} gold)",
                    item.name, item.category, item.cost
                );
            }
        }
        None => println!("No feasible build for {}", god.name),
    }
    Ok(())
}
