mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::mortgage::{CalculateArgs, DeductionArgs, PaymentArgs, ScheduleArgs};

/// Fixed-rate mortgage calculations
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Fixed-rate mortgage calculations",
    long_about = "Prices a fixed-rate annuity mortgage with decimal precision: level \
                  monthly payment, full amortization schedule, total overpayment, \
                  property tax deduction and recommended income."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, env = "MORTGAGE_OUTPUT", default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(long, env = "MORTGAGE_LOG", default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Full mortgage calculation with schedule and deductions
    Calculate(CalculateArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Solve the level monthly payment
    Payment(PaymentArgs),
    /// Estimate the property tax deduction
    Deduction(DeductionArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mortgage={level},mortgage_core={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::mortgage::run_calculate(args),
        Commands::Schedule(args) => commands::mortgage::run_schedule(args),
        Commands::Payment(args) => commands::mortgage::run_payment(args),
        Commands::Deduction(args) => commands::mortgage::run_deduction(args),
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
