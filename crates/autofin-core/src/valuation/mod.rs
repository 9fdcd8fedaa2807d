pub mod pricing;
pub mod service;
pub mod trade_in;

#[cfg(feature = "remote")]
pub mod remote;
