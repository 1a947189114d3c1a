//! HS256 JWT access tokens and password reset tokens.

use chrono::Utc;
use gudang_core::models::user::{Role, User};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject: user id, as a decimal string.
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

/// Issue a signed HS256 access token for `user`.
pub fn issue_access_token(user: &User, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let lifetime = config.access_token_lifetime()?;
    let claims = AccessTokenClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + lifetime,
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an HS256 access token (signature, expiry, issuer).
pub fn decode_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AccessTokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);
    validation.leeway = 0;

    jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Claims of a verified token, with the subject already parsed.
///
/// Produced by the request authentication middleware. Stateless: no
/// database lookup is performed.
#[derive(Debug, Clone)]
pub struct ValidatedClaims {
    pub user_id: i64,
    pub claims: AccessTokenClaims,
}

impl ValidatedClaims {
    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn is_admin(&self) -> bool {
        self.claims.role == Role::Admin
    }
}

/// Verify `token` and parse its subject.
pub fn validate_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<ValidatedClaims, AuthError> {
    let claims = decode_access_token(token, config)?;
    let user_id = claims
        .sub
        .parse()
        .map_err(|_| AuthError::TokenInvalid(format!("malformed subject: {}", claims.sub)))?;
    Ok(ValidatedClaims { user_id, claims })
}

/// Extract and verify the token from an `Authorization` header value.
///
/// Only the `Bearer` scheme is accepted.
pub fn validate_bearer(
    header: Option<&str>,
    config: &AuthConfig,
) -> Result<ValidatedClaims, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::TokenInvalid("expected 'Bearer <token>'".into()))?;

    validate_access_token(token, config)
}

/// Generate a cryptographically random reset token
/// (32 bytes, hex-encoded).
pub fn generate_reset_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    hex::encode(bytes)
}

/// SHA-256 hash of a raw reset token, hex-encoded.
///
/// This is the value stored as `password_resets.token_hash`.
pub fn hash_reset_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
