//! Tripillar CLI: run a synthesis from fixture oracles and inspect configs.
//!
//! Commands:
//! - `run`: synthesize a timeline for the fixture's subject over a date range
//! - `check-config`: load and validate a TOML synthesis config
//! - `defaults`: print the canonical config as TOML
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (e.g. `RUST_LOG=tripillar_runner=debug` to see skipped samples).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tripillar_core::SynthesisResult;
use tripillar_runner::{synthesize, FixtureOracles, SynthesisConfig};

#[derive(Parser)]
#[command(
    name = "tripillar",
    about = "Tripillar CLI: favorable-outcome timelines from three strength signals"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a timeline for the fixture's subject.
    Run {
        /// Oracle fixture (TOML) describing the subject and oracle answers.
        #[arg(long)]
        fixture: PathBuf,

        /// Synthesis config (TOML). Defaults to the canonical policy.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: String,

        /// Override the config's step in days.
        #[arg(long)]
        step: Option<u32>,

        /// Sample on all cores.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Print the full result as JSON instead of a text report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Load and validate a synthesis config.
    CheckConfig {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
    /// Print the canonical config as TOML.
    Defaults,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            fixture,
            config,
            start,
            end,
            step,
            parallel,
            json,
        } => run_synthesis_cmd(&fixture, config.as_deref(), &start, &end, step, parallel, json),
        Commands::CheckConfig { config } => run_check_config(&config),
        Commands::Defaults => {
            print!("{}", SynthesisConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn parse_date(label: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid --{label} date '{value}' (expected YYYY-MM-DD)"))
}

fn load_config(path: Option<&Path>) -> Result<SynthesisConfig> {
    match path {
        Some(path) => SynthesisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SynthesisConfig::default()),
    }
}

fn run_synthesis_cmd(
    fixture_path: &Path,
    config_path: Option<&Path>,
    start: &str,
    end: &str,
    step: Option<u32>,
    parallel: bool,
    json: bool,
) -> Result<()> {
    let start = parse_date("start", start)?;
    let end = parse_date("end", end)?;

    let mut config = load_config(config_path)?;
    if let Some(step) = step {
        config.step_days = step;
    }
    config.parallel |= parallel;

    let fixture = FixtureOracles::from_file(fixture_path)
        .with_context(|| format!("loading fixture {}", fixture_path.display()))?;
    let subject = fixture.subject_chart();
    tracing::debug!(
        subject = %subject.id,
        reference = %subject.reference_sign,
        periods = fixture.periods.len(),
        "loaded fixture"
    );

    let result = synthesize(&subject, start, end, &config, &fixture.oracles())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result)?;
    }
    Ok(())
}

fn run_check_config(path: &Path) -> Result<()> {
    let config = load_config(Some(path))?;
    let w = &config.weights;
    let t = w.thresholds();

    println!("Config OK: {}", path.display());
    println!(
        "Weights:    period {:.2}  gochara {:.2}  bindu {:.2}  boost {:.2}",
        w.period(),
        w.gochara(),
        w.bindu(),
        w.boost()
    );
    println!(
        "Thresholds: period {:.2}  gochara {:.2}  bindu {:.2}",
        t.period, t.gochara, t.bindu
    );
    println!("Step:       {} day(s) at {}", config.step_days, config.sample_time);
    println!("Gochara:    {:?}", config.gochara);
    println!("Transit:    {:?}", config.transit_body);
    println!("Period mix: {:.2} primary", config.period_primary_share);
    println!("Caution:    below {}%", config.caution_threshold);
    Ok(())
}

fn print_report(result: &SynthesisResult) -> Result<()> {
    println!("=== Synthesis: {} ===", result.subject.id);
    println!(
        "Range:     {} to {} (step {} day(s))",
        result.start, result.end, result.step_days
    );
    println!("Reference: {}", result.subject.reference_sign);
    println!(
        "Samples:   {} scored, {} skipped",
        result.summary.sample_count, result.summary.skipped_count
    );
    println!("Run hash:  {}", result.fingerprint()?);
    println!();
    println!("{}", result.summary.text);

    if !result.peak_windows.is_empty() {
        println!();
        println!("Peak windows:");
        println!(
            "  {:<12} {:<12} {:<18} {:>5} {:>8}",
            "Start", "End", "Period", "Max%", "Samples"
        );
        println!("  {}", "-".repeat(59));
        for w in &result.peak_windows {
            let period = match w.secondary_body {
                Some(secondary) => format!("{}/{secondary}", w.primary_body),
                None => w.primary_body.to_string(),
            };
            println!(
                "  {:<12} {:<12} {:<18} {:>5} {:>8}",
                w.start.date().to_string(),
                w.end.date().to_string(),
                period,
                w.max_probability,
                w.samples
            );
        }
    }

    if !result.caution_windows.is_empty() {
        println!();
        println!("Caution windows:");
        println!(
            "  {:<12} {:<12} {:<18} {:>5} {:>8}",
            "Start", "End", "Period", "Min%", "Samples"
        );
        println!("  {}", "-".repeat(59));
        for w in &result.caution_windows {
            println!(
                "  {:<12} {:<12} {:<18} {:>5} {:>8}",
                w.start.date().to_string(),
                w.end.date().to_string(),
                w.primary_body.to_string(),
                w.min_probability,
                w.samples
            );
        }
    }

    if !result.skipped.is_empty() {
        println!();
        println!("Skipped samples:");
        for skipped in result.skipped.iter().take(10) {
            println!("  {}", skipped.note());
        }
        if result.skipped.len() > 10 {
            println!("  ... and {} more", result.skipped.len() - 10);
        }
    }

    Ok(())
}
