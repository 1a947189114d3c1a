//! Error types for the gudang inventory system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GudangError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{entity} conflict: {message}")]
    Conflict { entity: String, message: String },

    #[error("insufficient stock: current {current}, requested {requested}")]
    InsufficientStock { current: i64, requested: i64 },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GudangError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

pub type GudangResult<T> = Result<T, GudangError>;
