//! Injectable constants for the calculators.
//!
//! Every literal the marketplace forms used to hard-code (base valuation,
//! premium brands, per-fuel defaults, loan defaults) lives here so callers
//! and tests can override it. `Default` reproduces the reference figures.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AutoFinError;
use crate::types::{Condition, Factor, FuelKind, Money, Percent, Rate};
use crate::AutoFinResult;

/// Top-level configuration shared by all engines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub valuation: ValuationConfig,
    pub fuel: FuelTable,
    pub loan: LoanDefaults,
}

impl CalculatorConfig {
    /// Parse from a JSON document. Missing sections fall back to defaults.
    pub fn from_json_str(s: &str) -> AutoFinResult<Self> {
        let config: CalculatorConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AutoFinResult<()> {
        self.valuation.validate()?;
        self.fuel.validate()?;
        self.loan.validate()
    }
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// Constants for the local trade-in fallback formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Market value of a new, average vehicle before any adjustment.
    pub base_value: Money,
    /// Share of value lost per year of age (straight-line, 0.08 = 8%).
    pub annual_age_depreciation: Rate,
    /// Odometer reading at which the mileage factor reaches zero.
    pub mileage_horizon: Decimal,
    pub condition_factors: ConditionFactors,
    /// Brands that receive `premium_brand_factor`. Matched case-insensitively.
    pub premium_brands: Vec<String>,
    pub premium_brand_factor: Factor,
    /// Trade-in offer as a share of estimated market value.
    pub trade_in_ratio: Rate,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        ValuationConfig {
            base_value: dec!(500_000),
            annual_age_depreciation: dec!(0.08),
            mileage_horizon: dec!(200_000),
            condition_factors: ConditionFactors::default(),
            premium_brands: ["Mercedes-Benz", "BMW", "Audi", "Lexus", "Porsche", "Tesla"]
                .iter()
                .map(|b| b.to_string())
                .collect(),
            premium_brand_factor: dec!(1.20),
            trade_in_ratio: dec!(0.75),
        }
    }
}

impl ValuationConfig {
    pub fn is_premium_brand(&self, brand: &str) -> bool {
        let brand = brand.trim();
        self.premium_brands
            .iter()
            .any(|p| p.eq_ignore_ascii_case(brand))
    }

    pub fn validate(&self) -> AutoFinResult<()> {
        if self.base_value <= Decimal::ZERO {
            return Err(invalid("valuation.base_value", "must be > 0"));
        }
        if self.annual_age_depreciation < Decimal::ZERO {
            return Err(invalid("valuation.annual_age_depreciation", "must be >= 0"));
        }
        if self.mileage_horizon <= Decimal::ZERO {
            return Err(invalid("valuation.mileage_horizon", "must be > 0"));
        }
        if self.premium_brand_factor <= Decimal::ZERO {
            return Err(invalid("valuation.premium_brand_factor", "must be > 0"));
        }
        if self.trade_in_ratio <= Decimal::ZERO || self.trade_in_ratio > Decimal::ONE {
            return Err(invalid("valuation.trade_in_ratio", "must be in (0, 1]"));
        }
        self.condition_factors.validate()
    }
}

/// Value multiplier per reported condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionFactors {
    pub excellent: Factor,
    pub good: Factor,
    pub fair: Factor,
    pub poor: Factor,
}

impl Default for ConditionFactors {
    fn default() -> Self {
        ConditionFactors {
            excellent: dec!(1.10),
            good: dec!(1.00),
            fair: dec!(0.85),
            poor: dec!(0.70),
        }
    }
}

impl ConditionFactors {
    pub fn factor(&self, condition: Condition) -> Factor {
        match condition {
            Condition::Excellent => self.excellent,
            Condition::Good => self.good,
            Condition::Fair => self.fair,
            Condition::Poor => self.poor,
        }
    }

    fn validate(&self) -> AutoFinResult<()> {
        for (name, f) in [
            ("excellent", self.excellent),
            ("good", self.good),
            ("fair", self.fair),
            ("poor", self.poor),
        ] {
            if f < Decimal::ZERO {
                return Err(invalid(
                    &format!("valuation.condition_factors.{name}"),
                    "must be >= 0",
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fuel
// ---------------------------------------------------------------------------

/// Typical efficiency and unit price for one fuel kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelDefaults {
    /// Distance per litre, or per kWh for electric.
    pub efficiency: Decimal,
    /// Price per litre, or per kWh for electric.
    pub unit_price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelTable {
    pub petrol: FuelDefaults,
    pub diesel: FuelDefaults,
    pub electric: FuelDefaults,
    pub hybrid: FuelDefaults,
}

impl Default for FuelTable {
    fn default() -> Self {
        FuelTable {
            petrol: FuelDefaults {
                efficiency: dec!(14),
                unit_price: dec!(105),
            },
            diesel: FuelDefaults {
                efficiency: dec!(18),
                unit_price: dec!(90),
            },
            electric: FuelDefaults {
                efficiency: dec!(4),
                unit_price: dec!(8),
            },
            hybrid: FuelDefaults {
                efficiency: dec!(20),
                unit_price: dec!(105),
            },
        }
    }
}

impl FuelTable {
    pub fn for_kind(&self, kind: FuelKind) -> FuelDefaults {
        match kind {
            FuelKind::Petrol => self.petrol,
            FuelKind::Diesel => self.diesel,
            FuelKind::Electric => self.electric,
            FuelKind::Hybrid => self.hybrid,
        }
    }

    fn validate(&self) -> AutoFinResult<()> {
        for kind in FuelKind::ALL {
            let d = self.for_kind(kind);
            if d.efficiency <= Decimal::ZERO {
                return Err(invalid(&format!("fuel.{kind}.efficiency"), "must be > 0"));
            }
            if d.unit_price < Decimal::ZERO {
                return Err(invalid(&format!("fuel.{kind}.unit_price"), "must be >= 0"));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

/// Starting values for a new loan quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanDefaults {
    /// Share of the price paid up front (0.20 = 20%).
    pub down_payment_share: Rate,
    pub annual_interest_rate_percent: Percent,
    pub term_months: i32,
}

impl Default for LoanDefaults {
    fn default() -> Self {
        LoanDefaults {
            down_payment_share: dec!(0.20),
            annual_interest_rate_percent: dec!(8.5),
            term_months: 60,
        }
    }
}

impl LoanDefaults {
    fn validate(&self) -> AutoFinResult<()> {
        if self.down_payment_share < Decimal::ZERO || self.down_payment_share > Decimal::ONE {
            return Err(invalid("loan.down_payment_share", "must be in [0, 1]"));
        }
        if self.annual_interest_rate_percent < Decimal::ZERO {
            return Err(invalid("loan.annual_interest_rate_percent", "must be >= 0"));
        }
        if self.term_months <= 0 {
            return Err(invalid("loan.term_months", "must be > 0"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> AutoFinError {
    AutoFinError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CalculatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_premium_brand_match_ignores_case_and_padding() {
        let cfg = ValuationConfig::default();
        assert!(cfg.is_premium_brand("BMW"));
        assert!(cfg.is_premium_brand(" bmw "));
        assert!(cfg.is_premium_brand("mercedes-benz"));
        assert!(!cfg.is_premium_brand("Maruti"));
        assert!(!cfg.is_premium_brand("BMW X5"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = CalculatorConfig::from_json_str(
            r#"{ "valuation": { "base_value": 800000, "premium_brands": ["Volvo"] } }"#,
        )
        .unwrap();
        assert_eq!(cfg.valuation.base_value, dec!(800_000));
        assert!(cfg.valuation.is_premium_brand("volvo"));
        assert!(!cfg.valuation.is_premium_brand("BMW"));
        assert_eq!(cfg.valuation.trade_in_ratio, dec!(0.75));
        assert_eq!(cfg.fuel, FuelTable::default());
    }

    #[test]
    fn test_trade_in_ratio_above_one_rejected() {
        let err = CalculatorConfig::from_json_str(r#"{ "valuation": { "trade_in_ratio": 1.5 } }"#)
            .unwrap_err();
        assert!(matches!(err, AutoFinError::InvalidInput { ref field, .. } if field == "valuation.trade_in_ratio"));
    }

    #[test]
    fn test_zero_fuel_efficiency_rejected() {
        let mut cfg = CalculatorConfig::default();
        cfg.fuel.electric.efficiency = Decimal::ZERO;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_fuel_table_lookup() {
        let table = FuelTable::default();
        assert_eq!(table.for_kind(FuelKind::Diesel).unit_price, dec!(90));
        assert_eq!(table.for_kind(FuelKind::Electric).efficiency, dec!(4));
    }
}
