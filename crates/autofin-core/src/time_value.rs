use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::AutoFinError;
use crate::types::{Money, Percent, Rate};
use crate::AutoFinResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
/// Returns `None` if the power leaves the Decimal range.
pub fn checked_compound(rate: Rate, n: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result = result.checked_mul(factor)?;
    }
    Some(result)
}

/// Convert an annual percentage (8.5 = 8.5%) into a monthly decimal rate.
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    annual_percent / dec!(100) / MONTHS_PER_YEAR
}

/// Payment (PMT), spreadsheet sign convention: a positive present value
/// (money received) yields a negative payment.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> AutoFinResult<Money> {
    if nper == 0 {
        return Err(AutoFinError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let overflow = || AutoFinError::InvalidInput {
        field: "nper".into(),
        reason: format!("(1 + rate)^{nper} exceeds decimal range"),
    };
    let factor = checked_compound(rate, nper).ok_or_else(overflow)?;
    let annuity_factor = (factor - Decimal::ONE) / rate;

    if annuity_factor.is_zero() {
        return Err(AutoFinError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let grown = present_value
        .checked_mul(factor)
        .and_then(|v| v.checked_add(future_value))
        .ok_or_else(overflow)?;
    Ok(-grown / annuity_factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_basic() {
        assert_eq!(checked_compound(dec!(0.10), 2), Some(dec!(1.21)));
        assert_eq!(checked_compound(dec!(0.05), 0), Some(Decimal::ONE));
    }

    #[test]
    fn test_compound_negative_rate_declines() {
        // 13% annual decline over two years: 0.87^2
        assert_eq!(checked_compound(dec!(-0.13), 2), Some(dec!(0.7569)));
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
    }

    #[test]
    fn test_pmt_sign_convention() {
        // 1000 borrowed at 1% per month for 12 months -> ~88.85 per month
        let result = pmt(dec!(0.01), 12, dec!(1000), Decimal::ZERO).unwrap();
        assert!(result < Decimal::ZERO);
        assert!((result + dec!(88.85)).abs() < dec!(0.01));
    }

    #[test]
    fn test_pmt_zero_rate_is_straight_line() {
        let result = pmt(Decimal::ZERO, 10, dec!(1000), Decimal::ZERO).unwrap();
        assert_eq!(result, dec!(-100));
    }

    #[test]
    fn test_checked_compound_overflow() {
        assert!(checked_compound(dec!(1), 200).is_none());
    }

    #[test]
    fn test_pmt_overflow_is_an_error() {
        assert!(pmt(dec!(0.5), 1_000, dec!(1000), Decimal::ZERO).is_err());
    }

    #[test]
    fn test_pmt_zero_periods_rejected() {
        assert!(pmt(dec!(0.01), 0, dec!(1000), Decimal::ZERO).is_err());
    }
}
