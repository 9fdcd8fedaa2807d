pub mod financing;
pub mod ownership;
pub mod valuation;

use chrono::Datelike;

/// Calendar year used when `--as-of-year` is not given.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
