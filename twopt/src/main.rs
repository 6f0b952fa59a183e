use anyhow::Result;
use clap::{Parser, Subcommand};

mod campaign;
mod smite;

#[derive(Parser)]
#[command(name = "twopt")]
#[command(about = "Build-composition optimizer for Total War campaigns and SMITE")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a Total War campaign province by province
    Campaign(campaign::CampaignArgs),

    /// Optimize a six-item SMITE build for sustained DPS
    Smite(smite::SmiteArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = std::str::FromStr::from_str(&cli.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Campaign(args) => campaign::run(&args),
        Commands::Smite(args) => smite::run(&args),
    }
}
