pub mod config;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "financing")]
pub mod financing;

#[cfg(feature = "ownership")]
pub mod ownership;

#[cfg(feature = "valuation")]
pub mod valuation;

pub use config::CalculatorConfig;
pub use error::AutoFinError;
pub use types::*;

/// Standard result type for all autofin operations
pub type AutoFinResult<T> = Result<T, AutoFinError>;
