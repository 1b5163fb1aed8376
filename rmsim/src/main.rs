/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use rmsim::config::TaskSetLoader;
use rmsim::hyperperiod::DEFAULT_HYPERPERIOD_LIMIT;
use rmsim::report::{render_gantt, render_yaml};
use rmsim::scheduler::{RmSimulator, SimulatorConfig};

// ── CLI argument definition ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Gantt chart with per-tick log, completions and drops.
    Text,
    /// The full schedule serialized as YAML.
    Yaml,
}

/// Rate-Monotonic schedule simulator.
///
/// Example:
///   rmsim tasks.txt
///   rmsim --format yaml --max-hyperperiod 100000 tasks.yaml
#[derive(Debug, Parser)]
#[command(
    name = "rmsim",
    about = "Simulate Rate-Monotonic scheduling of periodic tasks over one hyperperiod",
    long_about = None,
)]
struct Cli {
    /// Task-set file: YAML (.yaml/.yml) or text lines "period release execution deadline [name]".
    task_file: PathBuf,

    /// Output format written to stdout.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Largest hyperperiod (in ticks) to simulate.
    #[arg(short = 'm', long = "max-hyperperiod", default_value_t = DEFAULT_HYPERPERIOD_LIMIT)]
    max_hyperperiod: u64,

    /// Log every tick (same as RUST_LOG=debug).
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Initialise structured logging on stderr so stdout carries only the
    // schedule.  RUST_LOG takes precedence over --verbose.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    info!(
        task_file       = %cli.task_file.display(),
        format          = ?cli.format,
        max_hyperperiod = cli.max_hyperperiod,
        "Configuration"
    );

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Load task set ─────────────────────────────────────────────────────────
    let mut loader = TaskSetLoader::new();
    loader.load_from_file(&cli.task_file)?;
    let templates = loader.into_templates();

    // ── Simulate ──────────────────────────────────────────────────────────────
    let simulator = RmSimulator::with_config(SimulatorConfig {
        hyperperiod_limit: cli.max_hyperperiod,
    });
    let schedule = simulator
        .simulate(&templates)
        .context("Simulation aborted")?;

    if schedule.is_overloaded() {
        warn!(
            utilization = schedule.utilization.utilization,
            "Utilization error: task set exceeds processor capacity"
        );
    }

    // ── Output ────────────────────────────────────────────────────────────────
    let rendered = match cli.format {
        OutputFormat::Text => render_gantt(&schedule),
        OutputFormat::Yaml => render_yaml(&schedule).context("Failed to serialize schedule")?,
    };
    print!("{rendered}");

    info!(
        hyperperiod = schedule.hyperperiod,
        completed = schedule.completions.len(),
        dropped = schedule.dropped.len(),
        context_switches = schedule.context_switches(),
        "Done"
    );

    Ok(())
}
