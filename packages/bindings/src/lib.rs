use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use autofin_core::financing::{loan, schedule};
use autofin_core::ownership::{suggest, tco};
use autofin_core::valuation::{pricing, trade_in};
use autofin_core::CalculatorConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional config document; absent or empty means defaults.
fn parse_config(config_json: Option<String>) -> NapiResult<CalculatorConfig> {
    match config_json.as_deref().map(str::trim) {
        None | Some("") => Ok(CalculatorConfig::default()),
        Some(json) => CalculatorConfig::from_json_str(json).map_err(to_napi_error),
    }
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

/// Bare loan result: monthly payment, total interest, total cost.
#[napi]
pub fn compute_loan(input_json: String) -> NapiResult<String> {
    let input: loan::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    serde_json::to_string(&loan::compute_loan(&input)).map_err(to_napi_error)
}

#[napi]
pub fn analyze_loan(input_json: String) -> NapiResult<String> {
    let input: loan::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan::analyze_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Loan quote for a price using the configured down-payment share, rate
/// and term.
#[napi]
pub fn default_loan_input(price: String, config_json: Option<String>) -> NapiResult<String> {
    let price = Decimal::from_str(price.trim()).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let input = loan::LoanInput::with_defaults(price, &config.loan);
    serde_json::to_string(&input).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: loan::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    serde_json::to_string(&schedule::amortization_schedule(&input)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_ownership_cost(input_json: String) -> NapiResult<String> {
    let input: tco::OwnershipInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    serde_json::to_string(&tco::compute_ownership_cost(&input)).map_err(to_napi_error)
}

#[napi]
pub fn analyze_ownership(input_json: String) -> NapiResult<String> {
    let input: tco::OwnershipInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tco::analyze_ownership(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn suggest_ownership_input(
    profile_json: String,
    as_of_year: i32,
    config_json: Option<String>,
) -> NapiResult<String> {
    let profile: suggest::VehicleProfile =
        serde_json::from_str(&profile_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let input = suggest::suggest_ownership_input(&profile, as_of_year, &config);
    serde_json::to_string(&input).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// Local trade-in estimate. The host application calls its own valuation
/// service first and only falls back to this.
#[napi]
pub fn estimate_trade_in(
    input_json: String,
    as_of_year: i32,
    config_json: Option<String>,
) -> NapiResult<String> {
    let input: trade_in::ValuationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let estimator = trade_in::ValuationEstimator::new(config.valuation);
    let output = trade_in::analyze_trade_in(&estimator, &input, as_of_year).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `null` when there is no usable prediction.
#[napi]
pub fn compare_listing_price(listed: String, predicted: String) -> NapiResult<String> {
    let listed = Decimal::from_str(listed.trim()).map_err(to_napi_error)?;
    let predicted = Decimal::from_str(predicted.trim()).map_err(to_napi_error)?;
    serde_json::to_string(&pricing::compare_listing_price(listed, predicted))
        .map_err(to_napi_error)
}

/// `prices_json` is a JSON array of decimal strings. `null` when it is empty.
#[napi]
pub fn average_listing_price(prices_json: String) -> NapiResult<String> {
    let prices: Vec<Decimal> = serde_json::from_str(&prices_json).map_err(to_napi_error)?;
    serde_json::to_string(&pricing::average_listing_price(&prices)).map_err(to_napi_error)
}
