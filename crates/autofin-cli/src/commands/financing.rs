use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use autofin_core::financing::loan::{self, LoanInput};
use autofin_core::financing::schedule;
use autofin_core::CalculatorConfig;

use crate::input;

/// Arguments for a loan quote
#[derive(Args)]
pub struct LoanArgs {
    /// Vehicle price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment (default: configured share of the price)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long, allow_hyphen_values = true)]
    pub term: Option<i32>,

    /// Append the month-by-month amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_loan(args: LoanArgs, config: &CalculatorConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let price = args
                .price
                .ok_or("--price is required (or provide --input)")?;
            let mut quote = LoanInput::with_defaults(price, &config.loan);
            if let Some(down) = args.down_payment {
                quote.down_payment = down;
            }
            if let Some(rate) = args.rate {
                quote.annual_interest_rate_percent = rate;
            }
            if let Some(term) = args.term {
                quote.term_months = term;
            }
            quote
        }
    };

    let output = loan::analyze_loan(&loan_input)?;
    let mut value = serde_json::to_value(output)?;

    if args.schedule {
        let rows = schedule::amortization_schedule(&loan_input);
        if let Value::Object(ref mut map) = value {
            map.insert("schedule".into(), serde_json::to_value(rows)?);
        }
    }

    Ok(value)
}
