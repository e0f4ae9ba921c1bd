//! Investment Simulator CLI
//!
//! Resolves a rate for one instrument, runs a projection and prints it

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use investment_simulator::{
    locale, CalculationSession, CapitalInputs, InstrumentDescriptor, InstrumentType,
    ProjectionEngine, RateResolver, ResolverConfig,
};

#[derive(Debug, Parser)]
#[command(name = "investment-simulator", about = "Project savings growth for an instrument")]
struct Args {
    /// Initial deposit, e.g. "1.000,00"
    #[arg(long, default_value = "1.000,00")]
    initial: String,

    /// Monthly contribution, e.g. "100,00"
    #[arg(long, default_value = "100,00")]
    monthly: String,

    /// Horizon in months
    #[arg(long, default_value_t = 12)]
    months: u32,

    /// Annual inflation in percent, e.g. "5,0"
    #[arg(long, default_value = "5,0")]
    inflation: String,

    /// Instrument class: fixed-income or equity
    #[arg(long, default_value = "equity")]
    kind: InstrumentType,

    /// Product code (fixed income) or ticker (equity)
    #[arg(long, default_value = "AAPL")]
    name: String,

    /// JSON resolver configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// TwelveData API key
    #[arg(long, env = "TWELVEDATA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Write the full trajectory to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ResolverConfig::from_json_path(path)
            .with_context(|| format!("Unable to load config {}", path.display()))?,
        None => ResolverConfig::default(),
    }
    .with_api_key(args.api_key.clone());

    let capital = CapitalInputs::new(
        locale::parse_amount("initial_capital", &args.initial)?,
        locale::parse_amount("monthly_contribution", &args.monthly)?,
        args.months,
        locale::parse_percent("annual_inflation_rate", &args.inflation)?,
    );
    let instrument = InstrumentDescriptor::from_parts(args.kind, args.name.clone());

    let resolver = RateResolver::from_config(config).context("Unable to build rate resolver")?;
    let session = CalculationSession::new(Arc::new(resolver), ProjectionEngine::default());

    println!("Investment Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    let calculation = session.run(&instrument, capital).await?;

    println!("Instrument: {}", instrument);
    println!("  Monthly rate: {:.4}%", calculation.rate.monthly_rate * 100.0);
    if let Some(warning) = calculation.warning() {
        println!("  Warning: {}", warning);
    }
    println!("  Initial: {:.2}", capital.initial_capital);
    println!("  Monthly: {:.2}", capital.monthly_contribution);
    println!("  Inflation: {:.2}%/year", capital.annual_inflation_rate * 100.0);
    println!();

    let result = &calculation.result;

    println!("{:>5} {:>16}", "Month", "Value");
    println!("{}", "-".repeat(22));
    for point in result.trajectory.iter().take(25) {
        println!("{:>5} {:>16.2}", point.month_index, point.accumulated_value);
    }
    if result.trajectory.len() > 25 {
        println!("... ({} more months)", result.trajectory.len() - 25);
    }

    if let Some(path) = &args.csv {
        let mut file = File::create(path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        writeln!(file, "Month,AccumulatedValue")?;
        for point in &result.trajectory {
            writeln!(file, "{},{:.2}", point.month_index, point.accumulated_value)?;
        }
        println!("\nFull trajectory written to: {}", path.display());
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total Months: {}", summary.total_months);
    println!("  Total Contributed: {:.2}", summary.total_contributed);
    println!("  Gross Future Value: {:.2}", summary.gross_future_value);
    println!("  Gross Return: {:.2}", summary.gross_return);
    println!("  Inflation-Adjusted Value: {:.2}", summary.inflation_adjusted_value);
    println!("  Real Return: {:.2}", summary.real_return);

    Ok(())
}
