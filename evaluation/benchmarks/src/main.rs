//! Timing and accuracy harness for the fixed-point kernels.
//!
//! Runs every registered operation on seeded random inputs, logs the worst
//! error against its `f64` model and optionally appends one CSV row per
//! operation. Settings come from a YAML file (`--config`) or the command
//! line, with `FIXMATH_*` environment variables applied last. Exits non-zero
//! when any operation exceeds its tolerance.

mod ops;
mod report;

use std::path::{Path, PathBuf};

use clap::Parser;
use fixmath_core::HarnessSettings;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info};

use crate::report::{CsvReport, ResultRow};

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Settings(#[from] serde_yaml::Error),
    #[error("csv output: {0}")]
    Csv(#[from] csv::Error),
    #[error("{failed} of {total} operations exceeded their tolerance")]
    Tolerance { failed: usize, total: usize },
}

#[derive(Parser)]
#[command(name = "fixmath-harness")]
#[command(about = "Time and check the fixed-point kernels")]
struct Cli {
    #[command(flatten)]
    settings: HarnessSettings,

    /// YAML settings file; replaces the flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only run operations whose name contains this string
    #[arg(long)]
    filter: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn load_settings(path: &Path) -> Result<HarnessSettings, HarnessError> {
    let text = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_yaml::from_str(&text)?)
}

fn run(cli: Cli) -> Result<(), HarnessError> {
    let mut settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => cli.settings.clone(),
    };
    settings.apply_overrides(|key| std::env::var(key).ok());
    info!(settings = ?settings, "starting harness");

    let reps = settings.effective_reps();
    let mut report = match &settings.csv_path {
        Some(path) => Some(CsvReport::append(Path::new(path))?),
        None => None,
    };

    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
    let mut failed = 0;
    let mut total = 0;
    for op in ops::registry() {
        if let Some(f) = &cli.filter {
            if !op.name.contains(f.as_str()) {
                continue;
            }
        }
        total += 1;
        if settings.print_func_names {
            info!(operation = %op.name, "running");
        }
        let m = op.run(&mut rng, reps);
        let ns_per_call = settings.time_funcs.then(|| m.ns_per_call());
        match m.max_error {
            Some(e) if e > op.tolerance => {
                failed += 1;
                error!(operation = %op.name, max_error = e, tolerance = op.tolerance, "out of tolerance");
            }
            Some(e) => debug!(operation = %op.name, max_error = e, tolerance = op.tolerance, "ok"),
            None => debug!(operation = %op.name, "no accuracy model"),
        }
        if let Some(ns) = ns_per_call {
            info!(operation = %op.name, ns_per_call = ns, calls = m.calls, "timing");
        }
        if let Some(report) = report.as_mut() {
            report.write(&ResultRow {
                operation: op.name.clone(),
                iterations: m.calls,
                ns_per_call,
                max_error: m.max_error,
            })?;
        }
    }
    if let Some(report) = report {
        report.finish()?;
    }

    info!(total, failed, "harness finished");
    if failed > 0 {
        return Err(HarnessError::Tolerance { failed, total });
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // init() also routes the kernel's `log` records into tracing
    tracing_subscriber::fmt().with_max_level(level).init();

    run(cli)?;
    Ok(())
}
