//! main.rs — pdw-sim CLI entry point
//!
//! spec.md §6, CLI surface: read a configuration path, run the scenario to
//! completion, write a CSV path; exit 0 on success, non-zero on
//! configuration or invariant failure, with a diagnostic naming the
//! offending radar/sensor and field (spec.md §7).

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pdw_sim::sink::{CsvSink, PdwSink};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pdw-sim", about = "Radar pulse / passive-sensor PDW simulator")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario to completion and write the resulting PDW stream.
    Run {
        /// Scenario configuration file (YAML).
        #[arg(short, long)]
        config: PathBuf,
        /// CSV path the PDW stream is written to.
        #[arg(short, long)]
        output: PathBuf,
        /// Optional human-readable run log (in addition to CSV output).
        #[arg(long)]
        log_path: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "pdw_sim=info".into()))
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let Command::Run { config, output, log_path } = args.command;

    let mut run_log: Option<Box<dyn std::io::Write>> = match &log_path {
        Some(p) => Some(Box::new(std::fs::File::create(p).with_context(|| format!("opening log file {}", p.display()))?)),
        None => None,
    };

    info!(config = %config.display(), "loading scenario");
    let mut scenario = pdw_sim::config::load(&config).with_context(|| format!("loading configuration from {}", config.display()))?;

    info!(radars = scenario.radars.len(), sensors = scenario.sensors.len(), "scenario built");
    if let Some(log) = run_log.as_mut() {
        writeln!(log, "scenario built: {} radars, {} sensors", scenario.radars.len(), scenario.sensors.len())?;
    }

    let mut sink = CsvSink::create(&output).with_context(|| format!("opening output file {}", output.display()))?;

    let mut pdws = Vec::new();
    let result: anyhow::Result<()> = (|| {
        while scenario.current_time <= scenario.end_time + 1e-9 {
            pdws.clear();
            scenario.step(&mut pdws);
            for pdw in &pdws {
                sink.write(pdw)?;
            }
            if let Some(log) = run_log.as_mut() {
                writeln!(log, "t={:.6}: {} PDWs", scenario.current_time, pdws.len())?;
            }
        }
        Ok(())
    })();

    // A partial CSV up to the failure point is valid output (spec.md §7);
    // close it regardless of how the loop above ended.
    Box::new(sink).close()?;

    if let Err(err) = &result {
        if let Some(log) = run_log.as_mut() {
            writeln!(log, "# truncated: {err:#}")?;
        }
    }
    result.context("simulation aborted before reaching end_time")?;

    info!(output = %output.display(), "simulation complete");
    Ok(())
}
