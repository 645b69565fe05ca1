//! hospital — doctors and patients, the reference scenario set for rust_qn.
//!
//! Patients arrive as a Poisson stream and queue FIFO for a small pool of
//! doctors.  Each scenario varies the number of doctors or the arrival rate
//! and reports how long patients waited before treatment.
//!
//! ```text
//! hospital                                # built-in scenarios
//! hospital --scenarios runs.csv --out out # scenarios from CSV, results as CSV
//! RUST_LOG=qn_sim=debug hospital          # narrate every patient
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qn_core::ScenarioConfig;
use qn_output::{run_into, CsvSink, MemorySink, ReportSink};
use qn_sim::load_scenarios_csv;

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "hospital", about = "Discrete-event hospital queueing scenarios")]
struct Args {
    /// CSV file of scenarios (label,capacity,mean_interarrival,mean_service,horizon,seed).
    /// Without it the built-in hospital scenarios run.
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Directory to write scenario_summary.csv and wait_samples.csv into.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Override every scenario's seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override every scenario's horizon.
    #[arg(long)]
    horizon: Option<f64>,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    // 1. Scenarios.
    let mut configs = match &args.scenarios {
        Some(path) => load_scenarios_csv(path)
            .with_context(|| format!("loading scenarios from {}", path.display()))?,
        None => ScenarioConfig::hospital_defaults(),
    };
    for config in &mut configs {
        if let Some(seed) = args.seed {
            config.seed = seed;
        }
        if let Some(horizon) = args.horizon {
            config.horizon = horizon;
        }
    }

    println!("=== hospital — rust_qn queueing simulator ===");
    println!("Scenarios: {}", configs.len());
    println!();

    // 2. Sink.
    let mut sink: Box<dyn ReportSink> = match &args.out {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;
            Box::new(CsvSink::new(dir)?)
        }
        None => Box::new(MemorySink::new()),
    };

    // 3. Run.
    let t0 = Instant::now();
    let outcomes = run_into(&configs, sink.as_mut())?;
    let elapsed = t0.elapsed();

    // 4. Report.
    println!(
        "{:<24} {:>7} {:>9} {:>7} {:>7} {:>9} {:>9} {:>9}",
        "Scenario", "Doctors", "Interval", "Arrived", "Served", "InQueue", "MeanWait", "MaxWait"
    );
    println!("{}", "-".repeat(89));
    let mut rejected = 0usize;
    for (config, outcome) in configs.iter().zip(&outcomes) {
        match outcome {
            Ok(r) => println!(
                "{:<24} {:>7} {:>9.2} {:>7} {:>7} {:>9} {:>9.2} {:>9.2}",
                r.label,
                config.capacity,
                config.mean_interarrival,
                r.total_arrived,
                r.total_departed,
                r.still_waiting(),
                r.mean_wait,
                r.max_wait,
            ),
            Err(e) => {
                rejected += 1;
                println!("{:<24} rejected: {e}", config.label);
            }
        }
    }
    println!();
    println!(
        "{} scenario(s) run, {} rejected, in {:.3} s",
        outcomes.len() - rejected,
        rejected,
        elapsed.as_secs_f64()
    );
    if let Some(dir) = &args.out {
        println!("Results written to {}", dir.display());
    }

    Ok(())
}
