use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use super::service::ValuationService;
use crate::config::ValuationConfig;
use crate::types::{with_metadata, ComputationOutput, Condition, FuelKind, Money, Transmission};
use crate::AutoFinResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Used vehicle offered in trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    pub brand: String,
    pub model: String,
    /// Model year.
    pub year: i32,
    /// Odometer reading (km).
    pub mileage: Decimal,
    pub condition: Condition,
    #[serde(default)]
    pub fuel_kind: FuelKind,
    #[serde(default)]
    pub transmission: Transmission,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub trade_in_value: Money,
    pub market_value: Money,
}

/// Which path produced a valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationSource {
    Service,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationEstimate {
    #[serde(flatten)]
    pub value: ValuationResult,
    pub source: ValuationSource,
    /// Why the service was not used, when `source` is `Fallback` after a
    /// service failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Fallback formula
// ---------------------------------------------------------------------------

/// Local trade-in estimate used when no valuation service answers.
///
/// `market = base · age · mileage · condition · brand`, each factor floored
/// at zero, and `trade_in = market · trade_in_ratio`. The age factor is
/// `1 − (as_of_year − year) · annual_age_depreciation`, so a model year
/// after `as_of_year` scores above 1. Negative mileage counts as zero and a
/// non-positive mileage horizon zeroes the mileage factor. A value that
/// leaves the Decimal range gives zeros.
pub fn estimate_fallback(
    input: &ValuationInput,
    as_of_year: i32,
    config: &ValuationConfig,
) -> ValuationResult {
    checked_fallback(input, as_of_year, config).unwrap_or_else(|| {
        tracing::warn!(brand = %input.brand, year = input.year, "fallback valuation exceeds decimal range");
        ValuationResult::default()
    })
}

fn checked_fallback(
    input: &ValuationInput,
    as_of_year: i32,
    config: &ValuationConfig,
) -> Option<ValuationResult> {
    let age = Decimal::from(i64::from(as_of_year) - i64::from(input.year));
    let year_factor = Decimal::ONE
        .checked_sub(age.checked_mul(config.annual_age_depreciation)?)?
        .max(Decimal::ZERO);

    let mileage = input.mileage.max(Decimal::ZERO);
    let mileage_factor = if config.mileage_horizon > Decimal::ZERO {
        match mileage.checked_div(config.mileage_horizon) {
            Some(used) => (Decimal::ONE - used).max(Decimal::ZERO),
            None => Decimal::ZERO,
        }
    } else {
        Decimal::ZERO
    };

    let condition_factor = config.condition_factors.factor(input.condition).max(Decimal::ZERO);
    let brand_factor = if config.is_premium_brand(&input.brand) {
        config.premium_brand_factor.max(Decimal::ZERO)
    } else {
        Decimal::ONE
    };

    let market_value = config
        .base_value
        .checked_mul(year_factor)?
        .checked_mul(mileage_factor)?
        .checked_mul(condition_factor)?
        .checked_mul(brand_factor)?;

    Some(ValuationResult {
        trade_in_value: market_value.checked_mul(config.trade_in_ratio)?,
        market_value,
    })
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

/// Trade-in valuation: asks the service when one is configured and falls
/// back to `estimate_fallback` once, without retrying, if it fails.
pub struct ValuationEstimator {
    config: ValuationConfig,
    service: Option<Arc<dyn ValuationService>>,
}

impl ValuationEstimator {
    /// Estimator that always uses the local formula.
    pub fn new(config: ValuationConfig) -> Self {
        Self {
            config,
            service: None,
        }
    }

    pub fn with_service(config: ValuationConfig, service: Arc<dyn ValuationService>) -> Self {
        Self {
            config,
            service: Some(service),
        }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    /// Never fails: any service error is logged and answered locally.
    pub fn estimate(&self, input: &ValuationInput, as_of_year: i32) -> ValuationEstimate {
        let Some(service) = self.service.as_ref() else {
            return ValuationEstimate {
                value: estimate_fallback(input, as_of_year, &self.config),
                source: ValuationSource::Fallback,
                fallback_reason: None,
            };
        };

        match service.estimate(input) {
            Ok(value) => {
                tracing::debug!(brand = %input.brand, model = %input.model, "valuation from service");
                ValuationEstimate {
                    value,
                    source: ValuationSource::Service,
                    fallback_reason: None,
                }
            }
            Err(e) => {
                tracing::warn!("Valuation service failed, using local estimate: {}", e);
                ValuationEstimate {
                    value: estimate_fallback(input, as_of_year, &self.config),
                    source: ValuationSource::Fallback,
                    fallback_reason: Some(e.to_string()),
                }
            }
        }
    }
}

/// `ValuationEstimator::estimate` wrapped with input warnings and metadata.
pub fn analyze_trade_in(
    estimator: &ValuationEstimator,
    input: &ValuationInput,
    as_of_year: i32,
) -> AutoFinResult<ComputationOutput<ValuationEstimate>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.year > as_of_year {
        warnings.push(format!(
            "Model year {} is after {}; age factor is above 1",
            input.year, as_of_year
        ));
    }
    if input.mileage < Decimal::ZERO {
        warnings.push("Negative mileage treated as 0".into());
    }

    let estimate = estimator.estimate(input, as_of_year);
    if let Some(reason) = &estimate.fallback_reason {
        warnings.push(format!("Valuation service unavailable ({reason}); local estimate used"));
    }

    let methodology = match estimate.source {
        ValuationSource::Service => "Trade-in valuation (external valuation service)",
        ValuationSource::Fallback => {
            "Trade-in valuation (age, mileage, condition and brand adjusted base value)"
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "brand": input.brand,
            "model": input.model,
            "year": input.year,
            "as_of_year": as_of_year,
            "mileage": input.mileage.to_string(),
            "condition": input.condition,
            "base_value": estimator.config().base_value.to_string(),
            "trade_in_ratio": estimator.config().trade_in_ratio.to_string(),
        }),
        warnings,
        elapsed,
        estimate,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoFinError;
    use rust_decimal_macros::dec;

    fn sample() -> ValuationInput {
        ValuationInput {
            brand: "Hyundai".into(),
            model: "Creta".into(),
            year: 2021,
            mileage: dec!(45_000),
            condition: Condition::Good,
            fuel_kind: FuelKind::Petrol,
            transmission: Transmission::Manual,
        }
    }

    struct FixedService(ValuationResult);

    impl ValuationService for FixedService {
        fn estimate(&self, _input: &ValuationInput) -> AutoFinResult<ValuationResult> {
            Ok(self.0.clone())
        }
    }

    struct DownService;

    impl ValuationService for DownService {
        fn estimate(&self, _input: &ValuationInput) -> AutoFinResult<ValuationResult> {
            Err(AutoFinError::ServiceUnavailable("connection refused".into()))
        }
    }

    #[test]
    fn test_fallback_known_answer() {
        let result = estimate_fallback(&sample(), 2024, &ValuationConfig::default());
        // 500,000 * (1 - 3*0.08) * (1 - 45,000/200,000) * 1.0 * 1.0
        assert_eq!(result.market_value, dec!(294_500));
        assert_eq!(result.trade_in_value, dec!(220_875));
    }

    #[test]
    fn test_premium_brand_and_condition() {
        let mut input = sample();
        input.brand = "BMW".into();
        input.condition = Condition::Excellent;
        let result = estimate_fallback(&input, 2024, &ValuationConfig::default());
        // 294,500 * 1.10 * 1.20
        assert_eq!(result.market_value, dec!(388_740));
    }

    #[test]
    fn test_old_vehicle_clamped_to_zero() {
        let mut input = sample();
        input.year = 2000;
        let result = estimate_fallback(&input, 2024, &ValuationConfig::default());
        assert_eq!(result.market_value, Decimal::ZERO);
        assert_eq!(result.trade_in_value, Decimal::ZERO);
    }

    #[test]
    fn test_future_model_year_scores_above_new() {
        let mut input = sample();
        input.year = 2026;
        input.mileage = Decimal::ZERO;
        let result = estimate_fallback(&input, 2024, &ValuationConfig::default());
        // 500,000 * (1 + 2*0.08)
        assert_eq!(result.market_value, dec!(580_000));
        assert_eq!(result.trade_in_value, dec!(435_000));
    }

    #[test]
    fn test_zero_mileage_horizon_does_not_divide() {
        let config = ValuationConfig {
            mileage_horizon: Decimal::ZERO,
            ..ValuationConfig::default()
        };
        let result = estimate_fallback(&sample(), 2024, &config);
        assert_eq!(result, ValuationResult::default());
    }

    #[test]
    fn test_extreme_inputs_do_not_panic() {
        let mut input = sample();
        input.year = i32::MIN;
        input.mileage = Decimal::MAX;
        let result = estimate_fallback(&input, i32::MAX, &ValuationConfig::default());
        assert_eq!(result.market_value, Decimal::ZERO);

        // Far-future model year with an unvalidated config blows the range
        input.year = i32::MAX;
        input.mileage = Decimal::ZERO;
        let config = ValuationConfig {
            base_value: Decimal::MAX,
            ..ValuationConfig::default()
        };
        let result = estimate_fallback(&input, i32::MIN, &config);
        assert_eq!(result, ValuationResult::default());
    }

    #[test]
    fn test_negative_factors_floor_at_zero() {
        let mut config = ValuationConfig::default();
        config.condition_factors.good = dec!(-0.5);
        let result = estimate_fallback(&sample(), 2024, &config);
        assert_eq!(result.market_value, Decimal::ZERO);
    }

    #[test]
    fn test_negative_mileage_counts_as_zero() {
        let mut input = sample();
        input.mileage = dec!(-10_000);
        let clamped = estimate_fallback(&input, 2024, &ValuationConfig::default());
        input.mileage = Decimal::ZERO;
        let zero = estimate_fallback(&input, 2024, &ValuationConfig::default());
        assert_eq!(clamped, zero);
    }

    #[test]
    fn test_estimator_without_service_uses_fallback() {
        let estimator = ValuationEstimator::new(ValuationConfig::default());
        let est = estimator.estimate(&sample(), 2024);
        assert_eq!(est.source, ValuationSource::Fallback);
        assert!(est.fallback_reason.is_none());
    }

    #[test]
    fn test_estimator_returns_service_values_verbatim() {
        let quoted = ValuationResult {
            trade_in_value: dec!(410_000),
            market_value: dec!(455_500),
        };
        let estimator = ValuationEstimator::with_service(
            ValuationConfig::default(),
            Arc::new(FixedService(quoted.clone())),
        );
        let est = estimator.estimate(&sample(), 2024);
        assert_eq!(est.source, ValuationSource::Service);
        assert_eq!(est.value, quoted);
    }

    #[test]
    fn test_estimator_falls_back_on_service_error() {
        let estimator =
            ValuationEstimator::with_service(ValuationConfig::default(), Arc::new(DownService));
        let est = estimator.estimate(&sample(), 2024);
        assert_eq!(est.source, ValuationSource::Fallback);
        assert_eq!(est.value.market_value, dec!(294_500));
        assert!(est.fallback_reason.unwrap().contains("connection refused"));
    }

    #[test]
    fn test_analysis_reports_fallback_warning() {
        let estimator =
            ValuationEstimator::with_service(ValuationConfig::default(), Arc::new(DownService));
        let out = analyze_trade_in(&estimator, &sample(), 2024).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.methodology.contains("base value"));
    }

    #[test]
    fn test_estimate_serialises_flat() {
        let estimator = ValuationEstimator::new(ValuationConfig::default());
        let value = serde_json::to_value(estimator.estimate(&sample(), 2024)).unwrap();
        assert!(value.get("trade_in_value").is_some());
        assert!(value.get("market_value").is_some());
        assert_eq!(value["source"], "fallback");
        assert!(value.get("fallback_reason").is_none());
    }
}
