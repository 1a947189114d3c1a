//! Authentication error types.

use gudang_core::error::GudangError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("invalid or expired reset token")]
    ResetTokenInvalid,

    #[error("reset token has expired")]
    ResetTokenExpired,

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("mail delivery failed: {0}")]
    Mail(String),

    #[error("invalid auth configuration: {0}")]
    Config(String),
}

impl From<AuthError> for GudangError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => GudangError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::ResetTokenInvalid | AuthError::ResetTokenExpired => {
                GudangError::Validation {
                    message: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => GudangError::Crypto(msg),
            AuthError::Mail(msg) => GudangError::Mail(msg),
            AuthError::Config(msg) => GudangError::Internal(msg),
        }
    }
}
