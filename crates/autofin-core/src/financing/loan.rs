use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::LoanDefaults;
use crate::time_value::{monthly_rate, pmt};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::AutoFinResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fixed-rate, fixed-term instalment loan against a vehicle purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    /// Vehicle price before the down payment.
    pub principal_price: Money,
    pub down_payment: Money,
    /// Annual rate as a percentage (8.5 = 8.5%).
    pub annual_interest_rate_percent: Percent,
    pub term_months: i32,
}

impl LoanInput {
    /// Quote for `price` using the configured down-payment share, rate and
    /// term. The down payment is rounded to a whole currency unit.
    pub fn with_defaults(price: Money, defaults: &LoanDefaults) -> Self {
        let down_payment = price
            .checked_mul(defaults.down_payment_share)
            .unwrap_or(Decimal::ZERO)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        LoanInput {
            principal_price: price,
            down_payment,
            annual_interest_rate_percent: defaults.annual_interest_rate_percent,
            term_months: defaults.term_months,
        }
    }

    /// Amount actually financed. `None` when the difference leaves the
    /// Decimal range.
    pub fn principal(&self) -> Option<Money> {
        self.principal_price.checked_sub(self.down_payment)
    }

    /// Why no loan is modelled for this input, if any.
    pub fn zero_guard_reason(&self) -> Option<&'static str> {
        if self.down_payment < Decimal::ZERO {
            return Some("down payment is negative");
        }
        match self.principal() {
            None => Some("financed amount is out of range"),
            Some(p) if p <= Decimal::ZERO => Some("down payment covers the full price"),
            _ if self.annual_interest_rate_percent <= Decimal::ZERO => {
                Some("interest rate is not positive")
            }
            _ if self.term_months <= 0 => Some("term is not positive"),
            _ => None,
        }
    }
}

/// Payment totals for a loan. All zero when no loan is modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: Money,
    pub total_interest: Money,
    /// Everything paid including the down payment.
    pub total_cost: Money,
}

/// Loan-to-value band shown next to a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LtvStatus {
    Excellent,
    Good,
    Fair,
    HighRisk,
}

impl LtvStatus {
    pub fn from_ratio_pct(ltv_pct: Percent) -> Self {
        if ltv_pct <= dec!(80) {
            LtvStatus::Excellent
        } else if ltv_pct <= dec!(90) {
            LtvStatus::Good
        } else if ltv_pct <= dec!(95) {
            LtvStatus::Fair
        } else {
            LtvStatus::HighRisk
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub principal: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
    pub loan_to_value_pct: Percent,
    pub ltv_status: LtvStatus,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Monthly payment, total interest and total cost of a fixed-rate loan.
///
/// Uses the closed-form level payment `P·r·(1+r)^n / ((1+r)^n − 1)` with
/// `r` the monthly rate. Inputs that do not describe a loan (nothing
/// financed, non-positive rate or term, negative down payment) produce an
/// all-zero result instead of an error, so half-typed form values are safe.
pub fn compute_loan(input: &LoanInput) -> LoanResult {
    if let Some(reason) = input.zero_guard_reason() {
        tracing::debug!(reason, "loan not modelled");
        return LoanResult::default();
    }

    let Some(principal) = input.principal() else {
        return LoanResult::default();
    };
    let rate = monthly_rate(input.annual_interest_rate_percent);
    let n = input.term_months as u32;

    let monthly_payment = match pmt(rate, n, principal, Decimal::ZERO) {
        Ok(p) => -p,
        Err(e) => {
            tracing::warn!(error = %e, "loan payment could not be computed");
            return LoanResult::default();
        }
    };

    let totals = monthly_payment
        .checked_mul(Decimal::from(n))
        .and_then(|total_paid| {
            Some(LoanResult {
                monthly_payment,
                total_interest: total_paid.checked_sub(principal)?,
                total_cost: total_paid.checked_add(input.down_payment)?,
            })
        });

    totals.unwrap_or_else(|| {
        tracing::warn!(principal = %principal, term_months = n, "loan totals exceed decimal range");
        LoanResult::default()
    })
}

/// `compute_loan` plus loan-to-value figures, wrapped with warnings that
/// explain any zero result.
pub fn analyze_loan(input: &LoanInput) -> AutoFinResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(reason) = input.zero_guard_reason() {
        warnings.push(format!("No loan modelled: {reason}"));
    }

    let loan = compute_loan(input);
    let principal = input.principal().unwrap_or(Decimal::ZERO);

    let (loan_to_value_pct, ltv_status) = if input.principal_price > Decimal::ZERO {
        match principal
            .checked_div(input.principal_price)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
        {
            Some(pct) => {
                let status = LtvStatus::from_ratio_pct(pct);
                if status == LtvStatus::HighRisk {
                    warnings.push(format!("Loan-to-value of {}% is above 95%", pct.round_dp(1)));
                }
                (pct, status)
            }
            None => {
                warnings.push("Loan-to-value is out of range; reported as 0".into());
                (Decimal::ZERO, LtvStatus::HighRisk)
            }
        }
    } else {
        warnings.push("Price is not positive; loan-to-value set to 0".into());
        (Decimal::ZERO, LtvStatus::from_ratio_pct(Decimal::ZERO))
    };

    let analysis = LoanAnalysis {
        principal,
        monthly_payment: loan.monthly_payment,
        total_interest: loan.total_interest,
        total_cost: loan.total_cost,
        loan_to_value_pct,
        ltv_status,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate amortising auto loan (level monthly payment)",
        &serde_json::json!({
            "principal_price": input.principal_price.to_string(),
            "down_payment": input.down_payment.to_string(),
            "annual_interest_rate_percent": input.annual_interest_rate_percent.to_string(),
            "term_months": input.term_months,
        }),
        warnings,
        elapsed,
        analysis,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn default_input() -> LoanInput {
        LoanInput {
            principal_price: dec!(1_000_000),
            down_payment: dec!(200_000),
            annual_interest_rate_percent: dec!(8.5),
            term_months: 60,
        }
    }

    #[test]
    fn test_worked_example_payment() {
        let result = compute_loan(&default_input());
        // 800k at 8.5% over 60 months
        assert!(
            (result.monthly_payment - dec!(16_413.23)).abs() < dec!(1),
            "payment={}",
            result.monthly_payment
        );
        assert!(
            (result.total_interest - dec!(184_793.50)).abs() < dec!(1),
            "interest={}",
            result.total_interest
        );
    }

    #[test]
    fn test_total_cost_identity() {
        let input = default_input();
        let result = compute_loan(&input);
        let expected = result.monthly_payment * dec!(60) + input.down_payment;
        assert_eq!(result.total_cost, expected);
        assert_eq!(
            result.total_cost,
            result.total_interest + input.principal().unwrap() + input.down_payment
        );
    }

    #[test]
    fn test_zero_term_yields_zero_result() {
        let mut input = default_input();
        input.term_months = 0;
        assert_eq!(compute_loan(&input), LoanResult::default());
        input.term_months = -12;
        assert_eq!(compute_loan(&input), LoanResult::default());
    }

    #[test]
    fn test_zero_rate_yields_zero_result() {
        let mut input = default_input();
        input.annual_interest_rate_percent = Decimal::ZERO;
        assert_eq!(compute_loan(&input), LoanResult::default());
    }

    #[test]
    fn test_full_down_payment_yields_zero_result() {
        let mut input = default_input();
        input.down_payment = input.principal_price;
        assert_eq!(compute_loan(&input), LoanResult::default());
        input.down_payment = input.principal_price + dec!(1);
        assert_eq!(compute_loan(&input), LoanResult::default());
    }

    #[test]
    fn test_negative_down_payment_yields_zero_result() {
        let mut input = default_input();
        input.down_payment = dec!(-1);
        assert_eq!(compute_loan(&input), LoanResult::default());
    }

    #[test]
    fn test_extreme_down_payment_does_not_panic() {
        let mut input = default_input();
        input.down_payment = Decimal::MIN;
        assert_eq!(compute_loan(&input), LoanResult::default());

        input.down_payment = dec!(1);
        input.principal_price = Decimal::MIN;
        let out = analyze_loan(&input).unwrap();
        assert_eq!(out.result.total_cost, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("out of range")));
    }

    #[test]
    fn test_payment_overflow_yields_zero_result() {
        let input = LoanInput {
            principal_price: Decimal::MAX,
            down_payment: Decimal::ZERO,
            annual_interest_rate_percent: dec!(8.5),
            term_months: 60,
        };
        assert_eq!(compute_loan(&input), LoanResult::default());
    }

    #[test]
    fn test_ltv_overflow_is_flagged_high_risk() {
        let input = LoanInput {
            principal_price: dec!(0.00000000000000000001),
            down_payment: -Decimal::MAX / dec!(2),
            annual_interest_rate_percent: dec!(8.5),
            term_months: 60,
        };
        let out = analyze_loan(&input).unwrap();
        assert_eq!(out.result.total_cost, Decimal::ZERO);
        assert_eq!(out.result.loan_to_value_pct, Decimal::ZERO);
        assert_eq!(out.result.ltv_status, LtvStatus::HighRisk);
    }

    #[test]
    fn test_with_defaults_rounds_down_payment() {
        let input = LoanInput::with_defaults(dec!(123_457), &LoanDefaults::default());
        // 20% of 123,457 = 24,691.4 -> 24,691
        assert_eq!(input.down_payment, dec!(24_691));
        assert_eq!(input.annual_interest_rate_percent, dec!(8.5));
        assert_eq!(input.term_months, 60);
    }

    #[test]
    fn test_ltv_bands() {
        assert_eq!(LtvStatus::from_ratio_pct(dec!(80)), LtvStatus::Excellent);
        assert_eq!(LtvStatus::from_ratio_pct(dec!(80.1)), LtvStatus::Good);
        assert_eq!(LtvStatus::from_ratio_pct(dec!(95)), LtvStatus::Fair);
        assert_eq!(LtvStatus::from_ratio_pct(dec!(95.5)), LtvStatus::HighRisk);
    }

    #[test]
    fn test_analysis_reports_ltv_and_matches_engine() {
        let input = default_input();
        let out = analyze_loan(&input).unwrap();
        let a = &out.result;
        assert_eq!(a.principal, dec!(800_000));
        assert_eq!(a.loan_to_value_pct, dec!(80));
        assert_eq!(a.ltv_status, LtvStatus::Excellent);
        assert_eq!(a.monthly_payment, compute_loan(&input).monthly_payment);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_analysis_warns_on_zero_guard() {
        let mut input = default_input();
        input.term_months = 0;
        let out = analyze_loan(&input).unwrap();
        assert_eq!(out.result.total_cost, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("term")));
    }

    #[test]
    fn test_analysis_zero_price_does_not_divide() {
        let input = LoanInput {
            principal_price: Decimal::ZERO,
            down_payment: Decimal::ZERO,
            annual_interest_rate_percent: dec!(8.5),
            term_months: 60,
        };
        let out = analyze_loan(&input).unwrap();
        assert_eq!(out.result.loan_to_value_pct, Decimal::ZERO);
    }
}
