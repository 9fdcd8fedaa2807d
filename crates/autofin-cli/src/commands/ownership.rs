use clap::Args;
use serde_json::Value;

use autofin_core::ownership::suggest::{self, VehicleProfile};
use autofin_core::ownership::tco::{self, OwnershipInput};
use autofin_core::CalculatorConfig;

use crate::input;

/// Arguments for the total-cost-of-ownership calculation
#[derive(Args)]
pub struct OwnershipArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Read a vehicle profile (brand, price, year, fuel_kind) and print the
    /// suggested ownership input instead of costing it
    #[arg(long)]
    pub suggest: bool,

    /// Year the vehicle's age is measured against (default: current year)
    #[arg(long)]
    pub as_of_year: Option<i32>,
}

pub fn run_ownership(
    args: OwnershipArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    if args.suggest {
        let profile: VehicleProfile = input::read_input(args.input.as_deref())?
            .ok_or("--input <profile.json> or stdin required for --suggest")?;
        let as_of_year = args.as_of_year.unwrap_or_else(super::current_year);
        let suggested = suggest::suggest_ownership_input(&profile, as_of_year, config);
        return Ok(serde_json::to_value(suggested)?);
    }

    let tco_input: OwnershipInput = input::read_input(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for ownership cost")?;
    let result = tco::analyze_ownership(&tco_input)?;
    Ok(serde_json::to_value(result)?)
}
