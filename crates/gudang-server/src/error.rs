//! HTTP mapping of [`GudangError`].

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gudang_auth::AuthError;
use gudang_core::error::GudangError;
use serde_json::json;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub GudangError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GudangError::Validation { .. } | GudangError::InsufficientStock { .. } => {
                StatusCode::BAD_REQUEST
            }
            GudangError::NotFound { .. } => StatusCode::NOT_FOUND,
            GudangError::Conflict { .. } => StatusCode::CONFLICT,
            GudangError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            GudangError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            GudangError::Database(_)
            | GudangError::Crypto(_)
            | GudangError::Mail(_)
            | GudangError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GudangError> for ApiError {
    fn from(err: GudangError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(GudangError::validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(GudangError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(GudangError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            GudangError::InsufficientStock { current, requested } => json!({
                "error": "Insufficient stock",
                "current_stock": current,
                "requested": requested,
            }),
            err if status.is_server_error() => {
                tracing::error!(error = %err, "Request failed");
                json!({ "error": "Internal server error" })
            }
            err => json!({ "error": err.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
