use super::trade_in::{ValuationInput, ValuationResult};
use crate::AutoFinResult;

/// External trade-in valuation collaborator.
///
/// Implementations return the service's figures unchanged on success. Any
/// error makes `ValuationEstimator` answer with the local formula instead.
pub trait ValuationService: Send + Sync {
    fn estimate(&self, input: &ValuationInput) -> AutoFinResult<ValuationResult>;
}
