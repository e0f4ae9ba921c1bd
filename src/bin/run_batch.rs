//! Project every stored simulation record in a CSV file
//!
//! Uses offline rates (fixed-income table, equity fallback) and writes one
//! summary row per record.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use investment_simulator::record::load_records;
use investment_simulator::{RateResolver, ResolverConfig, ScenarioRunner};

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Project a CSV of simulation records")]
struct Args {
    /// Input records
    #[arg(long, default_value = "data/simulations.csv")]
    input: PathBuf,

    /// Output summary CSV
    #[arg(long, default_value = "batch_projection_output.csv")]
    output: PathBuf,

    /// JSON resolver configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading records from {}...", args.input.display());

    let records = load_records(&args.input)
        .with_context(|| format!("Failed to load records from {}", args.input.display()))?;
    println!("Loaded {} records in {:?}", records.len(), start.elapsed());

    let config = match &args.config {
        Some(path) => ResolverConfig::from_json_path(path)
            .with_context(|| format!("Unable to load config {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    let resolver = RateResolver::from_config(config).context("Unable to build rate resolver")?;
    let runner = ScenarioRunner::new();

    println!("Running projections...");
    let proj_start = Instant::now();
    let results = runner.run_records(&records, &resolver);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    writeln!(
        file,
        "Id,Instrument,Months,MonthlyRate,RateResolved,TotalContributed,GrossFutureValue,GrossReturn,InflationAdjustedValue"
    )?;

    let mut failed = 0usize;
    let mut total_contributed = 0.0;
    let mut total_gross = 0.0;

    for (record, result) in records.iter().zip(&results) {
        match result {
            Ok(projection) => {
                let r = &projection.result;
                writeln!(
                    file,
                    "{},{},{},{:.6},{},{:.2},{:.2},{:.2},{:.2}",
                    record.id.as_deref().unwrap_or(""),
                    record.label(),
                    record.horizon_months,
                    projection.rate.monthly_rate,
                    projection.rate.success,
                    r.total_contributed,
                    r.gross_future_value,
                    r.gross_return,
                    r.inflation_adjusted_value,
                )?;
                total_contributed += r.total_contributed;
                total_gross += r.gross_future_value;
            }
            Err(e) => {
                warn!("Skipping record {}: {}", record.label(), e);
                failed += 1;
            }
        }
    }

    println!("Output written to {}", args.output.display());

    println!("\nBatch Summary:");
    println!("  Records:           {}", records.len());
    println!("  Failed:            {}", failed);
    println!("  Total Contributed: {:.2}", total_contributed);
    println!("  Total Gross Value: {:.2}", total_gross);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
