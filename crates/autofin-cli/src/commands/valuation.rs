use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use autofin_core::valuation::pricing;
use autofin_core::valuation::remote::{HttpValuationService, DEFAULT_TIMEOUT};
use autofin_core::valuation::trade_in::{self, ValuationEstimator, ValuationInput};
use autofin_core::CalculatorConfig;

use crate::input;

/// Arguments for a trade-in estimate
#[derive(Args)]
pub struct TradeInArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Year the vehicle's age is measured against (default: current year)
    #[arg(long)]
    pub as_of_year: Option<i32>,

    /// Valuation service endpoint; the local estimate is used if it fails
    #[arg(long)]
    pub service_url: Option<String>,

    /// Service request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Arguments for comparing a listing price with a prediction
#[derive(Args)]
pub struct PriceCheckArgs {
    /// Asking price on the listing
    #[arg(long)]
    pub listed: Decimal,

    /// Predicted fair price
    #[arg(long)]
    pub predicted: Decimal,

    /// Asking prices of comparable listings, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub comparable: Vec<Decimal>,
}

pub fn run_trade_in(
    args: TradeInArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let vehicle: ValuationInput = input::read_input(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for trade-in valuation")?;
    let as_of_year = args.as_of_year.unwrap_or_else(super::current_year);

    let estimator = match args.service_url {
        Some(url) => {
            let timeout = args
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT);
            let service = HttpValuationService::new(url, timeout)?;
            ValuationEstimator::with_service(config.valuation.clone(), Arc::new(service))
        }
        None => ValuationEstimator::new(config.valuation.clone()),
    };

    let result = trade_in::analyze_trade_in(&estimator, &vehicle, as_of_year)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_price_check(args: PriceCheckArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison = pricing::compare_listing_price(args.listed, args.predicted)
        .ok_or("--predicted must be greater than 0 and both prices in range")?;
    let mut value = serde_json::to_value(comparison)?;
    if let (Some(average), Value::Object(map)) = (
        pricing::average_listing_price(&args.comparable),
        &mut value,
    ) {
        map.insert(
            "average_comparable_price".to_string(),
            serde_json::to_value(average)?,
        );
    }
    Ok(value)
}
