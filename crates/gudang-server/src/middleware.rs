//! Bearer token authentication.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use gudang_auth::{AuthError, ValidatedClaims};

use crate::error::ApiError;
use crate::state::AppState;

/// The caller identified by the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub ValidatedClaims);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.user_id
    }
}

/// Reject requests without a valid bearer token; otherwise attach the
/// verified claims to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = match state.auth.authenticate(header) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, path = %req.uri().path(), "Rejected unauthenticated request");
            return Err(err.into());
        }
    };

    req.extensions_mut().insert(AuthUser(claims));
    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}
