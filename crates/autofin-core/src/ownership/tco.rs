use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::time_value::checked_compound;
use crate::types::{with_metadata, ComputationOutput, FuelKind, Money, Percent};
use crate::AutoFinResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything needed to cost a vehicle over a multi-year holding period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipInput {
    pub vehicle_price: Money,
    pub ownership_years: i32,
    /// Distance driven per year (km).
    pub annual_distance: Decimal,
    pub fuel_kind: FuelKind,
    /// Distance per unit of energy, in the unit matching `fuel_kind`.
    pub fuel_efficiency: Decimal,
    /// Price per unit of energy, in the unit matching `fuel_kind`.
    pub fuel_unit_price: Money,
    pub annual_maintenance_cost: Money,
    pub annual_insurance_cost: Money,
    pub one_time_registration_fee: Money,
    /// Declining-balance rate applied each year, 0–100.
    pub annual_depreciation_rate_percent: Percent,
    #[serde(default)]
    pub include_financing: bool,
    #[serde(default)]
    pub monthly_financing_payment: Money,
}

/// Cost categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Depreciation,
    Fuel,
    Maintenance,
    Insurance,
    Taxes,
    Financing,
}

impl CostCategory {
    pub const ALL: [CostCategory; 6] = [
        CostCategory::Depreciation,
        CostCategory::Fuel,
        CostCategory::Maintenance,
        CostCategory::Insurance,
        CostCategory::Taxes,
        CostCategory::Financing,
    ];

    /// Whether the category contributes to `OwnershipResult::total_cost`.
    pub fn counts_toward_total(&self) -> bool {
        !matches!(self, CostCategory::Financing)
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CostCategory::Depreciation => "depreciation",
            CostCategory::Fuel => "fuel",
            CostCategory::Maintenance => "maintenance",
            CostCategory::Insurance => "insurance",
            CostCategory::Taxes => "taxes",
            CostCategory::Financing => "financing",
        };
        f.write_str(s)
    }
}

/// Cost per category over the whole holding period. Serialises as a map
/// with exactly the six category keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub depreciation: Money,
    pub fuel: Money,
    pub maintenance: Money,
    pub insurance: Money,
    pub taxes: Money,
    /// Sum of financing payments. Reported, but not part of `total_cost`:
    /// the payments stand in for the purchase price rather than adding to it.
    pub financing: Money,
}

impl CostBreakdown {
    pub fn get(&self, category: CostCategory) -> Money {
        match category {
            CostCategory::Depreciation => self.depreciation,
            CostCategory::Fuel => self.fuel,
            CostCategory::Maintenance => self.maintenance,
            CostCategory::Insurance => self.insurance,
            CostCategory::Taxes => self.taxes,
            CostCategory::Financing => self.financing,
        }
    }

    pub fn entries(&self) -> [(CostCategory, Money); 6] {
        CostCategory::ALL.map(|c| (c, self.get(c)))
    }

    /// Sum of every category except financing. `None` when the sum leaves
    /// the Decimal range.
    pub fn counted_total(&self) -> Option<Money> {
        self.entries()
            .iter()
            .filter(|(c, _)| c.counts_toward_total())
            .try_fold(Decimal::ZERO, |acc, (_, amount)| acc.checked_add(*amount))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnershipResult {
    pub total_cost: Money,
    pub monthly_cost: Money,
    pub breakdown: CostBreakdown,
    /// Year-by-year declining-balance depreciation (same as
    /// `breakdown.depreciation`).
    pub total_depreciation: Money,
    /// Closed-form `price · (1 − rate)^years`.
    pub estimated_resale_value: Money,
}

/// Share of the total for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: CostCategory,
    pub amount: Money,
    /// Percent of `total_cost`. Financing is measured against the same
    /// total even though it is not part of it.
    pub share_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipAnalysis {
    pub total_cost: Money,
    pub monthly_cost: Money,
    pub breakdown: CostBreakdown,
    pub shares: Vec<CategoryShare>,
    pub total_depreciation: Money,
    pub estimated_resale_value: Money,
    /// `(1 − (1 − rate)^years) · 100`
    pub resale_depreciation_pct: Percent,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Total cost of ownership over `ownership_years`.
///
/// Depreciation is declining-balance, computed year by year on the already
/// depreciated value. The depreciation rate is clamped to 0–100. A
/// non-positive efficiency prices fuel at zero, and non-positive years give
/// a zero monthly cost. Inputs whose totals leave the Decimal range give
/// an all-zero result.
pub fn compute_ownership_cost(input: &OwnershipInput) -> OwnershipResult {
    match checked_ownership_cost(input) {
        Some(result) => {
            tracing::debug!(
                years = input.ownership_years,
                total_cost = %result.total_cost,
                resale = %result.estimated_resale_value,
                "ownership cost computed"
            );
            result
        }
        None => {
            tracing::warn!(
                vehicle_price = %input.vehicle_price,
                years = input.ownership_years,
                "ownership cost exceeds decimal range"
            );
            OwnershipResult::default()
        }
    }
}

fn checked_ownership_cost(input: &OwnershipInput) -> Option<OwnershipResult> {
    let years = input.ownership_years.max(0) as u32;
    let years_dec = Decimal::from(years);
    let rate = clamp_rate_pct(input.annual_depreciation_rate_percent) / dec!(100);

    let mut total_depreciation = Decimal::ZERO;
    let mut current_value = input.vehicle_price;
    for _ in 0..years {
        if current_value.is_zero() {
            break;
        }
        let yearly = current_value.checked_mul(rate)?;
        total_depreciation = total_depreciation.checked_add(yearly)?;
        current_value = current_value.checked_sub(yearly)?;
    }

    let fuel = if input.fuel_efficiency > Decimal::ZERO {
        input
            .annual_distance
            .checked_mul(years_dec)?
            .checked_div(input.fuel_efficiency)?
            .checked_mul(input.fuel_unit_price)?
    } else {
        Decimal::ZERO
    };

    let financing = if input.include_financing {
        input
            .monthly_financing_payment
            .checked_mul(MONTHS_PER_YEAR)?
            .checked_mul(years_dec)?
    } else {
        Decimal::ZERO
    };

    let breakdown = CostBreakdown {
        depreciation: total_depreciation,
        fuel,
        maintenance: input.annual_maintenance_cost.checked_mul(years_dec)?,
        insurance: input.annual_insurance_cost.checked_mul(years_dec)?,
        taxes: input.one_time_registration_fee,
        financing,
    };
    let total_cost = breakdown.counted_total()?;

    let monthly_cost = if years > 0 {
        total_cost.checked_div(years_dec * MONTHS_PER_YEAR)?
    } else {
        Decimal::ZERO
    };

    // Rate is within [0, 1], so the power stays in [0, 1].
    let retained = checked_compound(-rate, years).unwrap_or(Decimal::ZERO);
    let estimated_resale_value = input.vehicle_price.checked_mul(retained)?;

    Some(OwnershipResult {
        total_cost,
        monthly_cost,
        breakdown,
        total_depreciation,
        estimated_resale_value,
    })
}

/// `compute_ownership_cost` plus category shares and resale depreciation,
/// wrapped with warnings about inputs the engine had to guard.
pub fn analyze_ownership(
    input: &OwnershipInput,
) -> AutoFinResult<ComputationOutput<OwnershipAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.ownership_years <= 0 {
        warnings.push("Ownership period is not positive; monthly cost set to 0".into());
    }
    if input.fuel_efficiency <= Decimal::ZERO {
        warnings.push(format!(
            "Fuel efficiency must be positive ({}); fuel cost set to 0",
            input.fuel_kind.efficiency_unit()
        ));
    }
    let rate_pct = input.annual_depreciation_rate_percent;
    if rate_pct < Decimal::ZERO || rate_pct > dec!(100) {
        warnings.push(format!(
            "Depreciation rate {rate_pct}% outside 0-100, clamped"
        ));
    }
    if input.include_financing {
        warnings.push(
            "Financing payments are shown in the breakdown but excluded from total cost".into(),
        );
    }

    let result = checked_ownership_cost(input).unwrap_or_else(|| {
        warnings.push("Costs exceed the supported numeric range; result set to 0".into());
        OwnershipResult::default()
    });

    let shares = result
        .breakdown
        .entries()
        .iter()
        .map(|(category, amount)| CategoryShare {
            category: *category,
            amount: *amount,
            share_pct: amount
                .checked_div(result.total_cost)
                .and_then(|share| share.checked_mul(dec!(100)))
                .unwrap_or(Decimal::ZERO),
        })
        .collect();

    let resale_depreciation_pct = result
        .estimated_resale_value
        .checked_div(input.vehicle_price)
        .and_then(|retained| (Decimal::ONE - retained).checked_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO);

    let analysis = OwnershipAnalysis {
        total_cost: result.total_cost,
        monthly_cost: result.monthly_cost,
        breakdown: result.breakdown,
        shares,
        total_depreciation: result.total_depreciation,
        estimated_resale_value: result.estimated_resale_value,
        resale_depreciation_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Total cost of ownership (declining-balance depreciation, financing reported separately)",
        &serde_json::json!({
            "vehicle_price": input.vehicle_price.to_string(),
            "ownership_years": input.ownership_years,
            "fuel_kind": input.fuel_kind,
            "annual_depreciation_rate_percent": rate_pct.to_string(),
            "include_financing": input.include_financing,
        }),
        warnings,
        elapsed,
        analysis,
    ))
}

fn clamp_rate_pct(rate_pct: Percent) -> Percent {
    rate_pct.max(Decimal::ZERO).min(dec!(100))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
