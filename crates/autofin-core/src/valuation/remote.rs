//! HTTP client for the marketplace trade-in estimation endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::service::ValuationService;
use super::trade_in::{ValuationInput, ValuationResult};
use crate::error::AutoFinError;
use crate::types::{Condition, FuelKind, Money, Transmission};
use crate::AutoFinResult;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct EstimateRequest<'a> {
    brand: &'a str,
    model: &'a str,
    year: i32,
    #[serde(with = "rust_decimal::serde::float")]
    mileage: Decimal,
    fuel: FuelKind,
    transmission: Transmission,
    condition: Condition,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EstimateResponse {
    trade_in_value: Money,
    market_value: Money,
}

/// Blocking client posting a vehicle descriptor as JSON and reading back
/// `{ "tradeInValue", "marketValue" }`.
pub struct HttpValuationService {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpValuationService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AutoFinResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AutoFinError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ValuationService for HttpValuationService {
    fn estimate(&self, input: &ValuationInput) -> AutoFinResult<ValuationResult> {
        let request = EstimateRequest {
            brand: &input.brand,
            model: &input.model,
            year: input.year,
            mileage: input.mileage,
            fuel: input.fuel_kind,
            transmission: input.transmission,
            condition: input.condition,
        };

        tracing::debug!(endpoint = %self.endpoint, "requesting trade-in estimate");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| AutoFinError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AutoFinError::ServiceUnavailable(format!(
                "{} returned HTTP {}",
                self.endpoint, status
            )));
        }

        let body: EstimateResponse = response
            .json()
            .map_err(|e| AutoFinError::InvalidServiceResponse(e.to_string()))?;

        if body.trade_in_value < Decimal::ZERO || body.market_value < Decimal::ZERO {
            return Err(AutoFinError::InvalidServiceResponse(format!(
                "negative valuation (trade-in {}, market {})",
                body.trade_in_value, body.market_value
            )));
        }

        Ok(ValuationResult {
            trade_in_value: body.trade_in_value,
            market_value: body.market_value,
        })
    }
}
