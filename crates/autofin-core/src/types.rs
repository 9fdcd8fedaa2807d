use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.085 = 8.5%).
pub type Rate = Decimal;

/// Rates and shares expressed as percentages (8.5 = 8.5%), the way loan
/// and depreciation figures are entered on the marketplace forms.
pub type Percent = Decimal;

/// Dimensionless multipliers (condition, brand, age factors)
pub type Factor = Decimal;

/// Energy source of a vehicle. Efficiency and unit price are interpreted in
/// the matching unit: km/L and price per litre for combustion and hybrid,
/// km/kWh and price per kWh for electric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelKind {
    #[default]
    #[serde(alias = "gasoline")]
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelKind {
    pub const ALL: [FuelKind; 4] = [
        FuelKind::Petrol,
        FuelKind::Diesel,
        FuelKind::Electric,
        FuelKind::Hybrid,
    ];

    /// Unit the efficiency figure is measured in.
    pub fn efficiency_unit(&self) -> &'static str {
        match self {
            FuelKind::Electric => "km/kWh",
            _ => "km/L",
        }
    }
}

impl fmt::Display for FuelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FuelKind::Petrol => "petrol",
            FuelKind::Diesel => "diesel",
            FuelKind::Electric => "electric",
            FuelKind::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

/// Seller-reported condition of a used vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    #[default]
    Automatic,
    Manual,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_kind_accepts_gasoline_alias() {
        let kind: FuelKind = serde_json::from_str("\"gasoline\"").unwrap();
        assert_eq!(kind, FuelKind::Petrol);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"petrol\"");
    }

    #[test]
    fn test_condition_lowercase_wire_names() {
        let c: Condition = serde_json::from_str("\"excellent\"").unwrap();
        assert_eq!(c, Condition::Excellent);
        assert!(serde_json::from_str::<Condition>("\"mint\"").is_err());
    }

    #[test]
    fn test_electric_efficiency_unit() {
        assert_eq!(FuelKind::Electric.efficiency_unit(), "km/kWh");
        assert_eq!(FuelKind::Diesel.efficiency_unit(), "km/L");
    }
}
