//! Authentication configuration.

use chrono::Duration;

use crate::error::AuthError;

/// Upper bound for both token lifetimes: ten years.
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 10 * 365 * 86_400;

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret for HS256 signing and verification.
    pub jwt_secret: String,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Access token lifetime in seconds (default: 86_400 = 24 hours).
    pub access_token_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
    /// Password reset token lifetime in seconds (default: 3600 = 1 hour).
    pub reset_token_lifetime_secs: u64,
    /// Front-end page that receives `?token=<raw>`.
    pub reset_url_base: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "your-secret-key".into(),
            jwt_issuer: "gudang".into(),
            access_token_lifetime_secs: 86_400,
            pepper: None,
            min_password_length: 6,
            reset_token_lifetime_secs: 3600,
            reset_url_base: "http://localhost:3000/reset-password".into(),
        }
    }
}

impl AuthConfig {
    /// Reject lifetimes that do not fit a signed timestamp offset.
    pub fn validate(&self) -> Result<(), AuthError> {
        self.access_token_lifetime()?;
        self.reset_token_lifetime()?;
        Ok(())
    }

    /// Access token lifetime in signed seconds, for the `exp` claim.
    pub fn access_token_lifetime(&self) -> Result<i64, AuthError> {
        lifetime_secs("access_token_lifetime_secs", self.access_token_lifetime_secs)
    }

    pub fn reset_token_lifetime(&self) -> Result<Duration, AuthError> {
        let secs = lifetime_secs("reset_token_lifetime_secs", self.reset_token_lifetime_secs)?;
        Ok(Duration::seconds(secs))
    }
}

fn lifetime_secs(field: &str, secs: u64) -> Result<i64, AuthError> {
    i64::try_from(secs)
        .ok()
        .filter(|_| secs <= MAX_TOKEN_LIFETIME_SECS)
        .ok_or_else(|| {
            AuthError::Config(format!(
                "{field} must be at most {MAX_TOKEN_LIFETIME_SECS} seconds, got {secs}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lifetimes_are_valid() {
        let config = AuthConfig::default();
        config.validate().unwrap();
        assert_eq!(config.access_token_lifetime().unwrap(), 86_400);
        assert_eq!(config.reset_token_lifetime().unwrap(), Duration::hours(1));
    }

    #[test]
    fn lifetime_past_i64_range_is_rejected() {
        let config = AuthConfig {
            access_token_lifetime_secs: u64::MAX,
            ..AuthConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(&err, AuthError::Config(msg) if msg.contains("access_token_lifetime_secs")),
            "got {err:?}"
        );

        let config = AuthConfig {
            reset_token_lifetime_secs: i64::MAX as u64 + 1,
            ..AuthConfig::default()
        };
        assert!(matches!(
            config.reset_token_lifetime().unwrap_err(),
            AuthError::Config(_)
        ));
    }

    #[test]
    fn lifetime_limit_is_inclusive() {
        let config = AuthConfig {
            access_token_lifetime_secs: MAX_TOKEN_LIFETIME_SECS,
            reset_token_lifetime_secs: MAX_TOKEN_LIFETIME_SECS + 1,
            ..AuthConfig::default()
        };
        assert!(config.access_token_lifetime().is_ok());
        assert!(config.reset_token_lifetime().is_err());
    }
}
