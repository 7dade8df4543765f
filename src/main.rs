//! Command line driver for the ranked system evaluator
//!
//! Loads configuration, builds the default Elo + elimination stack, runs the
//! configured number of epochs and reports how far ratings converged toward
//! latent skill.

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ranked_evaluator::config::{validate_config, AppConfig};
use ranked_evaluator::evaluation::{top_players, EvaluationReport};
use ranked_evaluator::metrics::MetricsCollector;
use ranked_evaluator::RankedSystemEvaluator;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Ranked Evaluator - does a matchmaking + rating scheme converge to true skill?
#[derive(Parser)]
#[command(
    name = "ranked-evaluator",
    version,
    about = "Simulates rounds of matchmaking and team battles to test rating convergence",
    long_about = "Ranked Evaluator generates a synthetic population with hidden skill, then \
                 repeatedly sorts it into balanced multi-team lobbies, simulates each lobby as an \
                 elimination tournament of skill-weighted duels, and applies Elo updates after every \
                 duel. Each epoch reports how closely ratings rank players by their latent skill."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Population size override
    #[arg(long, value_name = "N", help = "Number of synthetic players")]
    population_size: Option<usize>,

    /// Epoch count override
    #[arg(long, value_name = "N", help = "Number of matchmaking + simulation rounds")]
    epochs: Option<usize>,

    /// Teams per game override
    #[arg(long, value_name = "N", help = "Number of teams in each game")]
    team_count: Option<usize>,

    /// Players per team override
    #[arg(long, value_name = "N", help = "Number of players on each team")]
    team_size: Option<usize>,

    /// Worker pool override
    #[arg(long, value_name = "N", help = "Maximum number of games simulated at once")]
    max_concurrency: Option<usize>,

    /// Seed override
    #[arg(long, value_name = "SEED", help = "Seed for a reproducible run")]
    seed: Option<u64>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without running")]
    dry_run: bool,

    /// Report output
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Write the evaluation report as JSON"
    )]
    output: Option<PathBuf>,

    /// Print Prometheus metrics at the end of the run
    #[arg(long, help = "Print collected metrics in Prometheus text format")]
    print_metrics: bool,

    /// Leaderboard size
    #[arg(long, value_name = "N", default_value_t = 10, help = "Players to show on the final leaderboard")]
    top: usize,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup banner with run information
fn display_startup_banner(config: &AppConfig, seed: u64) {
    info!("🎲 Ranked System Evaluator");
    info!("   Run: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!(
        "   Population: {} players over {} epochs",
        config.evaluation.population_size, config.evaluation.epochs
    );
    info!(
        "   Games: {} teams of {}",
        config.matchmaking.team_count, config.matchmaking.team_size
    );
    info!(
        "   Rating: Elo starting at {} with K = {}",
        config.rating.initial_rating, config.rating.k_factor
    );
    info!("   Workers: {}", config.simulation.max_concurrency);
    info!("   Seed: {}", seed);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(population_size) = args.population_size {
        config.evaluation.population_size = population_size;
    }

    if let Some(epochs) = args.epochs {
        config.evaluation.epochs = epochs;
    }

    if let Some(team_count) = args.team_count {
        config.matchmaking.team_count = team_count;
    }

    if let Some(team_size) = args.team_size {
        config.matchmaking.team_size = team_size;
    }

    if let Some(max_concurrency) = args.max_concurrency {
        config.simulation.max_concurrency = max_concurrency;
    }

    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }

    validate_config(&config)?;
    Ok(config)
}

/// Log the final convergence numbers and leaderboard
fn display_report(report: &EvaluationReport, top: usize) {
    match report.final_summary() {
        Some(summary) => {
            info!(
                "Final skill/rating correlation after {} epochs: {:.4}",
                report.epochs.len(),
                summary.skill_rating_correlation
            );
            info!(
                "Final rating spread: mean {:.1}, sd {:.1}",
                summary.mean_rating, summary.rating_std_dev
            );
        }
        None => info!("No epochs were run"),
    }

    if top == 0 {
        return;
    }

    info!(
        "{:<4} {:<36} {:>8} {:>6} {:>6} {:>6}",
        "#", "Player", "Rating", "Skill", "Duels", "K/D"
    );
    for (rank, player) in top_players(&report.population, top).iter().enumerate() {
        info!(
            "{:<4} {:<36} {:>8.1} {:>6.3} {:>6} {:>6.2}",
            rank + 1,
            player.id,
            player.rating,
            player.skill_level,
            player.duels_played(),
            player.kill_death_ratio()
        );
    }
}

fn write_report(report: &EvaluationReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let seed = config
        .simulation
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen());
    display_startup_banner(&config, seed);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without running");
        return Ok(());
    }

    let metrics = Arc::new(MetricsCollector::new()?);
    let evaluator = match RankedSystemEvaluator::from_config(&config) {
        Ok(evaluator) => evaluator.with_metrics(metrics.clone()),
        Err(e) => {
            error!("Failed to build evaluator: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let report = match evaluator.evaluate(&mut rng).await {
        Ok(report) => report,
        Err(e) => {
            error!("Evaluation failed: {:#}", e);
            std::process::exit(1);
        }
    };

    display_report(&report, args.top);

    if let Some(path) = &args.output {
        write_report(&report, path)?;
    }

    if args.print_metrics {
        println!("{}", metrics.export()?);
    }

    info!("✅ Evaluation finished");
    Ok(())
}
