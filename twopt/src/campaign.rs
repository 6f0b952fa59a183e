//! The province-by-province campaign driver.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use twopt_core::{
    build_catalog, AttilaCampaign, AttilaFaction, CampaignTables, GameBundle, GameContext,
    Problem, Religion, RomeCampaign, RomeFaction, VariantTables,
};
use twopt_solver::{SolveOptions, SolverKind};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GameArg {
    Attila,
    Rome2,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SolverArg {
    Cbc,
    Micro,
}

impl From<SolverArg> for SolverKind {
    fn from(arg: SolverArg) -> Self {
        match arg {
            SolverArg::Cbc => SolverKind::Cbc,
            SolverArg::Micro => SolverKind::Micro,
        }
    }
}

#[derive(Args, Debug)]
pub struct CampaignArgs {
    /// Directory holding the exported campaign tables
    #[arg(long)]
    data_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = GameArg::Attila)]
    game: GameArg,

    /// Campaign short tag (att, bel, cha; rom, pun, emp, inv, gaul, pel)
    #[arg(long, default_value = "att")]
    campaign: String,

    /// Faction (attila: roman-east, roman-west, franks, sassanids, ...;
    /// rome2: rome, carthage, athens, sparta, ...)
    #[arg(long, default_value = "roman-east")]
    faction: String,

    /// State religion (attila only)
    #[arg(long, default_value = "orthodox")]
    religion: String,

    /// Province-wide fertility multiplier
    #[arg(long, default_value_t = 5.0)]
    fertility: f64,

    #[arg(long, value_enum, default_value_t = SolverArg::Cbc)]
    solver: SolverArg,

    /// Keep only city chains at or above this tier
    #[arg(long)]
    city_level: Option<u32>,

    /// Keep only buildings at or above this tier
    #[arg(long)]
    building_level: Option<u32>,

    /// Keep military buildings in the candidate set
    #[arg(long)]
    keep_military: bool,

    /// Model region sanitation (defaults on for Attila, off for Rome II)
    #[arg(long)]
    sanitation: Option<bool>,

    /// Per-province solver time limit in seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Show the backend's own log output
    #[arg(long)]
    verbose: bool,

    /// Print the selected buildings per region
    #[arg(long)]
    answers: bool,
}

fn attila_campaign(tag: &str) -> Result<AttilaCampaign> {
    Ok(match tag {
        "att" => AttilaCampaign::Attila,
        "bel" => AttilaCampaign::LastRoman,
        "cha" => AttilaCampaign::Charlemagne,
        other => bail!("unknown Attila campaign tag {other:?}"),
    })
}

fn attila_faction(name: &str) -> Result<AttilaFaction> {
    Ok(match name {
        "roman-east" => AttilaFaction::RomanEast,
        "roman-west" => AttilaFaction::RomanWest,
        "franks" => AttilaFaction::Franks,
        "sassanids" => AttilaFaction::Sassanids,
        "vandals" => AttilaFaction::Vandals,
        "visigoths" => AttilaFaction::Visigoths,
        "ostrogoths" => AttilaFaction::Ostrogoths,
        "saxons" => AttilaFaction::Saxons,
        "huns" => AttilaFaction::Huns,
        "alans" => AttilaFaction::Alans,
        other => bail!("unknown Attila faction {other:?}"),
    })
}

fn attila_religion(name: &str) -> Result<Religion> {
    Ok(match name {
        "any" => Religion::Any,
        "catholic" => Religion::Catholic,
        "arian" => Religion::Arian,
        "orthodox" => Religion::Orthodox,
        "eastern" => Religion::Eastern,
        "zoroastrian" => Religion::Zoroastrian,
        other => bail!("unknown religion {other:?}"),
    })
}

fn rome_campaign(tag: &str) -> Result<RomeCampaign> {
    Ok(match tag {
        "rom" => RomeCampaign::Rome,
        "pun" => RomeCampaign::Hannibal,
        "emp" => RomeCampaign::EmpireDivided,
        "inv" => RomeCampaign::RiseOfTheRepublic,
        "gaul" => RomeCampaign::Gauls,
        "pel" => RomeCampaign::Sparta,
        other => bail!("unknown Rome II campaign tag {other:?}"),
    })
}

fn rome_faction(name: &str) -> Result<RomeFaction> {
    Ok(match name {
        "rome" => RomeFaction::Rome,
        "carthage" => RomeFaction::Carthage,
        "athens" => RomeFaction::Athens,
        "sparta" => RomeFaction::Sparta,
        "macedon" => RomeFaction::Macedon,
        "egypt" => RomeFaction::Egypt,
        "parthia" => RomeFaction::Parthia,
        "iceni" => RomeFaction::Iceni,
        other => bail!("unknown Rome II faction {other:?}"),
    })
}

fn bundle_for(args: &CampaignArgs) -> Result<GameBundle> {
    match args.game {
        GameArg::Attila => Ok(GameBundle::attila(
            attila_campaign(&args.campaign)?,
            attila_faction(&args.faction)?,
            attila_religion(&args.religion)?,
        )),
        GameArg::Rome2 => Ok(GameBundle::rome(
            rome_campaign(&args.campaign)?,
            rome_faction(&args.faction)?,
        )),
    }
}

fn load_tables(dir: &Path, ctx: &GameContext) -> Result<CampaignTables> {
    let tag = ctx.bundle.short_tag();
    let effects = twopt_data::effects::load_building_effects(
        &dir.join("building_effects_junction_table.tsv"),
        tag,
    )
    .context("loading building effects")?;
    let junctions = twopt_data::regions::load_region_junctions(
        &dir.join("region_to_provinces_junctions_table.tsv"),
        tag,
    )
    .context("loading region junctions")?;
    let slots = twopt_data::regions::load_slot_templates(
        &dir.join("start_pos_region_slot_templates_tables.tsv"),
        ctx.bundle.campaign_token(),
        tag,
    )
    .context("loading slot templates")?;

    // Rome II has no culture variants; for Attila they refine admission and
    // supply display names when present.
    let variants_path = dir.join("building_culture_variants_table.tsv");
    let variants = if ctx.bundle.religion().is_some() && variants_path.exists() {
        Some(VariantTables {
            variants: twopt_data::cultures::load_culture_variants(&variants_path, tag)?,
            factions: twopt_data::cultures::load_factions(&dir.join("factions_table.tsv"))?,
            subcultures: twopt_data::cultures::load_subcultures(
                &dir.join("cultures_subcultures_table.tsv"),
            )?,
        })
    } else {
        if ctx.bundle.religion().is_some() {
            log::warn!("no culture variants table found, admitting by name tokens only");
        }
        None
    };

    Ok(CampaignTables {
        effects,
        junctions,
        slots,
        variants,
    })
}

pub fn run(args: &CampaignArgs) -> Result<()> {
    let ctx = GameContext::new(bundle_for(args)?).with_fertility(args.fertility);
    let tables = load_tables(&args.data_dir, &ctx)?;
    let catalog = build_catalog(&ctx, &tables)?;

    let policy = twopt_core::FilterPolicy {
        city_level: args.city_level,
        building_level: args.building_level,
        drop_military: !args.keep_military,
    };
    let with_sanitation = args
        .sanitation
        .unwrap_or(matches!(args.game, GameArg::Attila));
    let opts = SolveOptions {
        verbose: args.verbose,
        time_limit: args.time_limit.map(std::time::Duration::from_secs),
    };

    let mut problem = Problem::new(args.solver.into());
    problem.add_provinces(catalog.provinces.clone())?;

    let mut total = 0.0;
    for idx in 0..problem.provinces().len() {
        problem.reset();
        problem.add_buildings(&ctx, &catalog, idx)?;
        problem.apply_filters(idx, &policy)?;
        problem.add_constraints(&ctx, idx, with_sanitation)?;
        problem.add_objective(&ctx, idx)?;
        problem.solve(&opts)?;

        let report = problem.report(&catalog, idx)?;
        println!(
            "{} : {:.4} ({})",
            report.province, report.objective, report.status
        );
        if args.answers {
            for (region, building) in &report.answers {
                println!("  {region}: {building}");
            }
        }
        total += report.objective;
        problem.clean(idx)?;
    }

    println!("Total objective: {total:.4}");
    println!(
        "Total solving time: {:.3}s",
        problem.global_time().as_secs_f64()
    );
    Ok(())
}
