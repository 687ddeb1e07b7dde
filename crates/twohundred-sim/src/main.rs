use std::path::PathBuf;

use clap::Parser;

use twohundred_core::AppInfo;
use twohundred_sim::config::{ResolvedOutputs, SimConfig};
use twohundred_sim::logging::init_logging;
use twohundred_sim::runner::MatchRunner;

/// Headless bot-vs-bot simulation harness for 200.
#[derive(Debug, Parser)]
#[command(
    name = "twohundred-sim",
    author,
    version,
    about = "Deterministic 200 match simulator"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "sim/sim.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "COUNT")]
    matches: Option<usize>,

    /// Override the RNG seed for match deals.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no matches are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let count = config.matches.count;
    let lineup = config
        .seats
        .iter()
        .map(|seat| format!("{}:{}", seat.name, seat.difficulty))
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "{} {} loaded '{run_id}': {count} match{} [{lineup}]",
        AppInfo::name(),
        AppInfo::version(),
        if count == 1 { "" } else { "es" }
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = MatchRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: no matches played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run '{run_id}' complete: {} matches ({} decided) → {} rows at {}",
        summary.matches_played,
        summary.matches_decided,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!(
        "Wins: team one {}, team two {}",
        summary.standings.wins[0], summary.standings.wins[1]
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Structured log: {}", guard.log_path.display());
    }

    Ok(())
}
