use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),
    #[error("Envelope not found: {0}")]
    EnvelopeNotFound(Uuid),
    #[error("Scheduled payment not found: {0}")]
    PaymentNotFound(Uuid),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}
