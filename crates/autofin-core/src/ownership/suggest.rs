//! Starting values for the ownership form, derived from a listing.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::tco::OwnershipInput;
use crate::config::CalculatorConfig;
use crate::types::{FuelKind, Money, Percent};

const DOMESTIC_BRANDS: &[&str] = &["Tata", "Mahindra", "Maruti"];
const LUXURY_BRANDS: &[&str] = &["BMW", "Mercedes", "Audi"];
const JAPANESE_BRANDS: &[&str] = &["Toyota", "Honda"];
const KOREAN_BRANDS: &[&str] = &["Hyundai", "Kia"];

const DEFAULT_OWNERSHIP_YEARS: i32 = 5;
const DEFAULT_ANNUAL_DISTANCE: Decimal = dec!(15_000);
const DEFAULT_MAINTENANCE: Money = dec!(12_000);
const MAINTENANCE_FLOOR: Money = dec!(8_000);

/// The parts of a car listing that drive the suggested figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub brand: String,
    pub price: Money,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub fuel_kind: FuelKind,
}

/// Pre-fill an `OwnershipInput` for a listing: five years, 15,000 km a
/// year, no financing, and brand/price/fuel-based running costs.
pub fn suggest_ownership_input(
    profile: &VehicleProfile,
    as_of_year: i32,
    config: &CalculatorConfig,
) -> OwnershipInput {
    let fuel = config.fuel.for_kind(profile.fuel_kind);

    OwnershipInput {
        vehicle_price: profile.price,
        ownership_years: DEFAULT_OWNERSHIP_YEARS,
        annual_distance: DEFAULT_ANNUAL_DISTANCE,
        fuel_kind: profile.fuel_kind,
        fuel_efficiency: fuel.efficiency,
        fuel_unit_price: fuel.unit_price,
        annual_maintenance_cost: suggested_maintenance(&profile.brand, profile.year, as_of_year),
        annual_insurance_cost: suggested_insurance(&profile.brand, profile.price),
        one_time_registration_fee: suggested_registration_fee(profile.price),
        annual_depreciation_rate_percent: suggested_depreciation_rate(
            &profile.brand,
            profile.fuel_kind,
        ),
        include_financing: false,
        monthly_financing_payment: Decimal::ZERO,
    }
}

/// Yearly servicing estimate. Domestic brands start cheaper; the figure
/// grows by a fixed step per year of age and never drops below 8,000.
pub fn suggested_maintenance(brand: &str, year: Option<i32>, as_of_year: i32) -> Money {
    let Some(year) = year else {
        return DEFAULT_MAINTENANCE;
    };
    let offset = Decimal::from(i64::from(year) - i64::from(as_of_year) + 5);
    let estimate = if brand_in(brand, DOMESTIC_BRANDS) {
        dec!(15_000) - offset * dec!(800)
    } else {
        dec!(20_000) - offset * dec!(1_000)
    };
    estimate.max(MAINTENANCE_FLOOR)
}

/// 4% of price for luxury marques, 2.5% otherwise, to the nearest unit.
pub fn suggested_insurance(brand: &str, price: Money) -> Money {
    let rate = if brand_in(brand, LUXURY_BRANDS) {
        dec!(0.04)
    } else {
        dec!(0.025)
    };
    round_half_up(price * rate)
}

/// Tiered one-time registration fee.
pub fn suggested_registration_fee(price: Money) -> Money {
    if price < dec!(500_000) {
        dec!(5_000)
    } else if price < dec!(1_000_000) {
        dec!(10_000)
    } else if price < dec!(2_000_000) {
        dec!(20_000)
    } else {
        round_half_up(price * dec!(0.02))
    }
}

pub fn suggested_depreciation_rate(brand: &str, fuel_kind: FuelKind) -> Percent {
    if fuel_kind == FuelKind::Electric {
        dec!(18)
    } else if brand_in(brand, DOMESTIC_BRANDS) {
        dec!(10)
    } else if brand_in(brand, JAPANESE_BRANDS) {
        dec!(11)
    } else if brand_in(brand, KOREAN_BRANDS) {
        dec!(12)
    } else if brand_in(brand, LUXURY_BRANDS) {
        dec!(15)
    } else {
        dec!(13)
    }
}

/// Substring match so "Maruti Suzuki" and "Mercedes-Benz" hit their group.
fn brand_in(brand: &str, group: &[&str]) -> bool {
    let brand = brand.to_ascii_lowercase();
    group
        .iter()
        .any(|g| brand.contains(&g.to_ascii_lowercase()))
}

fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
