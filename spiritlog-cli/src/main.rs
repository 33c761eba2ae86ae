mod loader;
mod reports;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

use loader::{FileDataLoader, PlayFormat};
use util::{ReportSink, participant_list};
use spiritlog_core::{
    Dashboard, DataLoader, ParticipantRoster, RandomChooser, SortDirection, SortKey, SortState,
    Tracker, TrackerConfig,
};

#[derive(Debug, Parser)]
#[command(name = "spiritlog", version)]
#[command(about = "Play statistics and next-pick suggestions for Spirit Island sessions")]
struct Args {
    /// Play log (JSON array of sessions); defaults to the bundled sample
    #[arg(long)]
    plays: Option<PathBuf>,

    /// Whether the play log holds structured records or exported comments
    #[arg(long, value_enum, default_value_t = PlayFormat::Records)]
    plays_format: PlayFormat,

    /// Spirit catalog; defaults to the bundled catalog
    #[arg(long)]
    spirits: Option<PathBuf>,

    /// Adversary catalog; defaults to the bundled catalog
    #[arg(long)]
    adversaries: Option<PathBuf>,

    /// Tracker configuration (participants, level cap, baseline sets)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tracked participants (comma-separated), overriding the configuration
    #[arg(long)]
    participants: Option<String>,

    /// Spirit table order: spirit, complexity, source, plays:<id> or last:<id>
    #[arg(long, default_value = "spirit")]
    sort: SortKey,

    /// Sort the spirit table in descending order
    #[arg(long)]
    descending: bool,

    /// Seed for the never-played spirit picks; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.report == "console" {
        announce_banner();
    }

    let loader = build_loader(&args);
    let config = resolve_config(&args, &loader)?;
    let tracker = Tracker::new(loader, config).context("invalid tracker configuration")?;

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    log::info!("never-played picks use seed {seed}");
    let mut chooser = RandomChooser::new(ChaCha8Rng::seed_from_u64(seed));

    let dashboard = tracker
        .dashboard(&mut chooser, &sort_state(&args))
        .context("failed to load tracker inputs")?;

    write_reports(&args, &dashboard, seed)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn announce_banner() {
    println!("{}", "🌋 Spirit Island Play Tracker".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn build_loader(args: &Args) -> FileDataLoader {
    let bundled = FileDataLoader::bundled();
    FileDataLoader {
        plays: args.plays.clone().unwrap_or(bundled.plays),
        plays_format: args.plays_format,
        spirits: args.spirits.clone().unwrap_or(bundled.spirits),
        adversaries: args.adversaries.clone().unwrap_or(bundled.adversaries),
        config: args.config.clone().or(bundled.config),
    }
}

fn resolve_config(args: &Args, loader: &FileDataLoader) -> Result<TrackerConfig> {
    let config = loader
        .load_config()
        .context("failed to load tracker configuration")?;
    Ok(match args.participants.as_deref() {
        Some(list) => config.with_participants(ParticipantRoster::new(participant_list(list))),
        None => config,
    })
}

fn sort_state(args: &Args) -> SortState {
    let direction = if args.descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    SortState::new(args.sort.clone(), direction)
}

fn write_reports(args: &Args, dashboard: &Dashboard, seed: u64) -> Result<()> {
    let mut sink = ReportSink::open(args.output.clone())?;
    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut sink, dashboard, seed)?,
        "markdown" => reports::generate_markdown_report(&mut sink, dashboard, seed)?,
        "csv" => reports::generate_csv_report(&mut sink, dashboard)?,
        _ => reports::generate_console_report(&mut sink, dashboard, seed)?,
    }
    sink.finish()
}
