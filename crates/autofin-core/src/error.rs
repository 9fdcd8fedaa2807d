use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutoFinError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Valuation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid valuation service response: {0}")]
    InvalidServiceResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AutoFinError {
    fn from(e: serde_json::Error) -> Self {
        AutoFinError::SerializationError(e.to_string())
    }
}
