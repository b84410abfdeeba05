use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ServiceError {
    #[error("Account not found")]
    NotFound,
    #[error("{0}")]
    InvalidAmount(String),
    #[error("Low balance for this withdrawal")]
    InsufficientFunds,
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn invalid_amount() -> Self { Self::InvalidAmount("Invalid amount".to_string()) }

    pub fn non_positive_amount() -> Self {
        Self::InvalidAmount("Amount must be greater than zero".to_string())
    }

    pub fn storage(err: impl std::fmt::Display) -> Self { Self::Storage(err.to_string()) }
}
