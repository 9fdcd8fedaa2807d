mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::financing::LoanArgs;
use commands::ownership::OwnershipArgs;
use commands::valuation::{PriceCheckArgs, TradeInArgs};

/// Vehicle loan, ownership-cost and trade-in calculations
#[derive(Parser)]
#[command(
    name = "autofin",
    version,
    about = "Vehicle loan, ownership-cost and trade-in calculations",
    long_about = "A CLI for the car marketplace calculators with decimal precision. \
                  Quotes fixed-rate auto loans, totals the cost of owning a vehicle \
                  over several years, and estimates trade-in values."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// YAML or JSON file overriding the calculator constants
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log computation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a fixed-rate auto loan
    Loan(LoanArgs),
    /// Total cost of owning a vehicle over several years
    Ownership(OwnershipArgs),
    /// Estimate trade-in and market value of a used vehicle
    TradeIn(TradeInArgs),
    /// Compare a listing's asking price with a predicted price
    PriceCheck(PriceCheckArgs),
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

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli.config.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => {
            config::load(config_path).and_then(|c| commands::financing::run_loan(args, &c))
        }
        Commands::Ownership(args) => {
            config::load(config_path).and_then(|c| commands::ownership::run_ownership(args, &c))
        }
        Commands::TradeIn(args) => {
            config::load(config_path).and_then(|c| commands::valuation::run_trade_in(args, &c))
        }
        Commands::PriceCheck(args) => commands::valuation::run_price_check(args),
        Commands::Version => {
            println!("autofin {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
