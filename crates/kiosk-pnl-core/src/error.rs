use thiserror::Error;

#[derive(Debug, Error)]
pub enum KioskPnlError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl KioskPnlError {
    pub(crate) fn overflow(context: &str) -> Self {
        KioskPnlError::Overflow {
            context: context.to_string(),
        }
    }
}

impl From<serde_json::Error> for KioskPnlError {
    fn from(e: serde_json::Error) -> Self {
        KioskPnlError::SerializationError(e.to_string())
    }
}
