use actix_web::{HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use thiserror::Error;

/// Domain error type for the banking backend.
///
/// Every variant is an expected, recoverable condition with a fixed HTTP
/// mapping; only `Storage` and `Internal` surface as server errors.
#[derive(Error, Debug, Clone)]
pub enum BankError {
    #[error("Account not found")]
    AccountNotFound(i64),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("User not found")]
    UserNotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BankError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    fn error_code(&self) -> &'static str {
        match self {
            BankError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            BankError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            BankError::InvalidTransactionType(_) => "INVALID_TRANSACTION_TYPE",
            BankError::Validation(_) => "VALIDATION_ERROR",
            BankError::Auth(_) => "AUTHENTICATION_FAILED",
            BankError::Conflict(_) => "CONFLICT",
            BankError::UserNotFound(_) => "USER_NOT_FOUND",
            BankError::Storage(_) => "STORAGE_ERROR",
            BankError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for BankError {
    fn status_code(&self) -> StatusCode {
        match self {
            BankError::AccountNotFound(_) | BankError::UserNotFound(_) => StatusCode::NOT_FOUND,
            BankError::InsufficientFunds
            | BankError::InvalidTransactionType(_)
            | BankError::Validation(_) => StatusCode::BAD_REQUEST,
            BankError::Auth(_) => StatusCode::UNAUTHORIZED,
            BankError::Conflict(_) => StatusCode::CONFLICT,
            BankError::Storage(_) | BankError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage details stay in the logs, not in the response body.
        let message = match self {
            BankError::Storage(_) | BankError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.error_code(),
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}

impl From<anyhow::Error> for BankError {
    fn from(err: anyhow::Error) -> Self {
        BankError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        BankError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        BankError::Storage(err.to_string())
    }
}
