use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::loan::{compute_loan, LoanInput};
use crate::time_value::monthly_rate;
use crate::types::Money;

/// One month of a level-payment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Month-by-month split of each payment into interest and principal.
///
/// Empty when `compute_loan` would model no loan. The last row absorbs the
/// residual left by rounding so the loan closes at exactly zero.
pub fn amortization_schedule(input: &LoanInput) -> Vec<AmortizationRow> {
    let loan = compute_loan(input);
    if loan.monthly_payment.is_zero() {
        return Vec::new();
    }

    let Some(mut balance) = input.principal() else {
        return Vec::new();
    };
    let rate = monthly_rate(input.annual_interest_rate_percent);
    let months = input.term_months as u32;
    let mut rows = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let opening = balance;
        let interest = opening * rate;
        let (payment, principal) = if month == months {
            (opening + interest, opening)
        } else {
            (loan.monthly_payment, loan.monthly_payment - interest)
        };
        balance = opening - principal;

        rows.push(AmortizationRow {
            month,
            opening_balance: opening,
            payment,
            interest,
            principal,
            closing_balance: if month == months { Decimal::ZERO } else { balance },
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> LoanInput {
        LoanInput {
            principal_price: dec!(1_000_000),
            down_payment: dec!(200_000),
            annual_interest_rate_percent: dec!(8.5),
            term_months: 60,
        }
    }

    #[test]
    fn test_schedule_has_one_row_per_month() {
        let rows = amortization_schedule(&input());
        assert_eq!(rows.len(), 60);
        assert_eq!(rows[0].month, 1);
        assert_eq!(rows[59].month, 60);
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let rows = amortization_schedule(&input());
        assert_eq!(rows.last().unwrap().closing_balance, Decimal::ZERO);
        // Residual absorbed by the final payment is negligible
        let last = rows.last().unwrap();
        assert!((last.payment - rows[0].payment).abs() < dec!(0.01));
    }

    #[test]
    fn test_schedule_totals_match_loan() {
        let inp = input();
        let loan = compute_loan(&inp);
        let rows = amortization_schedule(&inp);

        let interest: Decimal = rows.iter().map(|r| r.interest).sum();
        let principal: Decimal = rows.iter().map(|r| r.principal).sum();

        assert!((interest - loan.total_interest).abs() < dec!(0.01));
        assert!((principal - dec!(800_000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_first_month_interest() {
        let rows = amortization_schedule(&input());
        // 800,000 * 0.085 / 12
        assert!((rows[0].interest - dec!(5_666.67)).abs() < dec!(0.01));
        assert!(rows[1].interest < rows[0].interest);
    }

    #[test]
    fn test_no_schedule_without_loan() {
        let mut inp = input();
        inp.annual_interest_rate_percent = Decimal::ZERO;
        assert!(amortization_schedule(&inp).is_empty());
    }
}
