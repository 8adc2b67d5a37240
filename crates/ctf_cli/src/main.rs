//! CTF Core CLI
//!
//! Run scenario files against the in-memory match world and print
//! configuration presets.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ctf_core::config::ObjectiveConfig;
use ctf_core::sim::{run_scenario, ScenarioReport, ScenarioSpec};
use ctf_core::ObjectiveKind;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ctf_cli")]
#[command(about = "Carried objective scenario runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and report assertion results
    Run {
        /// Scenario file (.json, .yaml, .yml)
        #[arg(long)]
        scenario: PathBuf,

        /// Objective config applied to every objective in the scenario
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print a configuration preset as YAML
    Preset {
        #[arg(long, value_enum, default_value = "ctf-flag")]
        kind: PresetKind,
    },

    /// Validate an objective config file
    Check {
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetKind {
    CtfFlag,
    NeutralFlag,
    TeamRelic,
    GradualReturn,
}

impl PresetKind {
    fn config(self) -> ObjectiveConfig {
        match self {
            PresetKind::CtfFlag => ObjectiveConfig::for_kind(ObjectiveKind::CtfFlag),
            PresetKind::NeutralFlag => ObjectiveConfig::for_kind(ObjectiveKind::NeutralFlag),
            PresetKind::TeamRelic => ObjectiveConfig::for_kind(ObjectiveKind::TeamRelic),
            PresetKind::GradualReturn => ObjectiveConfig::gradual_return(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario, config, json } => {
            let report = run_file(&scenario, config.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", summarize(&report));
            }
            if !report.passed() {
                bail!(
                    "scenario {} failed {} assertion(s)",
                    report.id,
                    report.assertion_failures.len()
                );
            }
        }

        Commands::Preset { kind } => {
            print!("{}", serde_yaml::to_string(&kind.config())?);
        }

        Commands::Check { config } => {
            ObjectiveConfig::load_from_path(&config)
                .with_context(|| format!("invalid config {}", config.display()))?;
            println!("✅ {} is valid", config.display());
        }
    }

    Ok(())
}

fn run_file(scenario: &Path, config: Option<&Path>) -> Result<ScenarioReport> {
    let spec = ScenarioSpec::load_from_path(scenario)
        .with_context(|| format!("failed to load scenario {}", scenario.display()))?;
    let override_config = match config {
        Some(path) => Some(
            ObjectiveConfig::load_from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
        ),
        None => None,
    };
    tracing::info!(scenario = %spec.id, description = ?spec.description, "loaded scenario");

    run_scenario(&spec, override_config.as_ref())
        .with_context(|| format!("scenario {} aborted", spec.id))
}

fn summarize(report: &ScenarioReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Scenario {} finished at {} ms\n", report.id, report.finished_at));
    for objective in &report.objectives {
        let s = &objective.snapshot;
        out.push_str(&format!(
            "  objective {} [{:?}] {} holder={} taken={} returned={}\n",
            s.id.0,
            s.kind,
            s.state,
            s.holder.map(|h| h.holder.0.to_string()).unwrap_or_else(|| "-".to_string()),
            objective.base.taken,
            objective.base.returned,
        ));
    }
    for (team, points) in &report.team_scores {
        out.push_str(&format!("  {} scored {}\n", team, points));
    }
    if report.passed() {
        out.push_str("✅ all assertions passed\n");
    } else {
        for failure in &report.assertion_failures {
            out.push_str(&format!("❌ {}\n", failure));
        }
    }
    out
}
