use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// How a listing's asking price compares with a predicted fair price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceComparison {
    pub listed_price: Money,
    pub predicted_price: Money,
    /// `listed − predicted`; positive means the listing asks for more.
    pub difference: Money,
    /// Difference as a percentage of the predicted price.
    pub percent_difference: Percent,
    pub overpriced: bool,
}

/// `None` when there is no usable prediction (non-positive predicted price)
/// or the difference leaves the Decimal range.
pub fn compare_listing_price(listed: Money, predicted: Money) -> Option<PriceComparison> {
    if predicted <= Decimal::ZERO {
        return None;
    }
    let difference = listed.checked_sub(predicted)?;
    let percent_difference = difference.checked_div(predicted)?.checked_mul(dec!(100))?;
    Some(PriceComparison {
        listed_price: listed,
        predicted_price: predicted,
        difference,
        percent_difference,
        overpriced: difference > Decimal::ZERO,
    })
}

/// Mean asking price of comparable listings. `None` for an empty slice or
/// a sum outside the Decimal range.
pub fn average_listing_price(prices: &[Money]) -> Option<Money> {
    if prices.is_empty() {
        return None;
    }
    let total = prices
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(*p))?;
    total.checked_div(Decimal::from(prices.len()))
}
