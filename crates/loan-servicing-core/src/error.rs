use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanServicingError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Sequencing violation: {0}")]
    Sequencing(String),

    #[error("Policy violation: {rule} — {reason}")]
    Policy { rule: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanServicingError {
    fn from(e: serde_json::Error) -> Self {
        LoanServicingError::SerializationError(e.to_string())
    }
}
