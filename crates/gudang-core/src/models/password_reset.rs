//! Password reset token model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored reset token. Only the SHA-256 hash of the raw token is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordReset {
    pub id: i64,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePasswordReset {
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of presenting a reset token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redemption {
    /// The token was valid and the new password is stored.
    Completed(PasswordReset),
    /// The token existed but had expired. It is burned; the password is
    /// unchanged.
    Expired(PasswordReset),
}

impl PasswordReset {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
