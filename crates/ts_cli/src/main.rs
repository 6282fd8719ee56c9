//! TimeSphere CLI
//!
//! Runs intelligence simulations from the command line: one-off runs with
//! optional preset rule bundles and file exports, or the bundled demo
//! scenarios.

mod scenarios;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ts_core::api::presets;
use ts_core::engine::{SimulateOptions, TrendAnalyzer};
use ts_core::export::{export_to_csv, export_to_json, export_to_markdown};
use ts_core::models::AxiomInputs;
use ts_core::TimeSphere;

#[derive(Parser)]
#[command(name = "ts_cli")]
#[command(about = "Run TimeSphere intelligence simulations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation
    Run {
        #[arg(long, default_value_t = 0.5)]
        a: f64,
        #[arg(long, default_value_t = 0.5)]
        b: f64,
        #[arg(long, default_value_t = 0.5)]
        c: f64,
        #[arg(long, default_value_t = 0.5)]
        x: f64,
        #[arg(long, default_value_t = 0.5)]
        y: f64,
        #[arg(long, default_value_t = 0.5)]
        z: f64,
        #[arg(long, default_value_t = 1.0)]
        e_n: f64,
        #[arg(long, default_value_t = 0.0)]
        f_n: f64,

        /// Number of steps to simulate
        #[arg(long, default_value_t = 10)]
        steps: u32,

        /// Named rule bundle: basic_growth, corruption_decay, innovation_cycles
        #[arg(long)]
        preset: Option<String>,

        /// Keep only the first and last step records
        #[arg(long, default_value_t = false)]
        summary_only: bool,

        /// Print a trend report after the run
        #[arg(long, default_value_t = false)]
        trend: bool,

        /// Export the result as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Export the result as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Export the result as Markdown
        #[arg(long)]
        markdown: Option<PathBuf>,
    },

    /// Run the bundled demo scenarios
    Scenarios {
        /// Run only the named scenario
        #[arg(long)]
        only: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            a,
            b,
            c,
            x,
            y,
            z,
            e_n,
            f_n,
            steps,
            preset,
            summary_only,
            trend,
            json,
            csv,
            markdown,
        } => {
            let inputs = AxiomInputs::new(a, b, c, x, y, z, e_n, f_n);
            inputs.validate_bounds()?;

            let mut sphere = TimeSphere::new(inputs);
            if let Some(name) = preset.as_deref() {
                presets::apply(name, &mut sphere)?;
            }

            let result = sphere
                .simulate_with(SimulateOptions { steps, record_history: !summary_only })?;

            scenarios::print_summary(&result);
            if !summary_only {
                scenarios::print_table(&result);
            }

            if trend {
                scenarios::print_trend(&TrendAnalyzer::new().analyze(&result));
            }

            if let Some(path) = json {
                export_to_json(&result, &path, true)?;
                println!("JSON written to {}", path.display());
            }
            if let Some(path) = csv {
                export_to_csv(&result, &path, true)?;
                println!("CSV written to {}", path.display());
            }
            if let Some(path) = markdown {
                export_to_markdown(&result, &path, "Simulation Results", None)?;
                println!("Markdown written to {}", path.display());
            }
        }

        Commands::Scenarios { only } => scenarios::run_all(only.as_deref())?,
    }

    Ok(())
}
