//! Login, registration and the password reset flow.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use gudang_auth::{LoginInput, RegisterInput, ResetPasswordInput};
use serde::Deserialize;
use serde_json::{Value, json};

use super::created;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RegisterRequest {
    #[serde(default)]
    pub(super) name: String,
    #[serde(default)]
    pub(super) email: String,
    #[serde(default)]
    pub(super) password: String,
    #[serde(default)]
    pub(super) role: String,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ForgotPasswordRequest {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResetPasswordRequest {
    #[serde(default)]
    token: String,
    #[serde(default)]
    new_password: String,
}

pub(super) async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let out = state
        .auth
        .login(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": out.access_token,
        "token_type": "Bearer",
        "expires_in": out.expires_in,
        "user": out.user,
    })))
}

/// Tokens are stateless; the client discards its copy.
pub(super) async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logout successful" }))
}

pub(super) async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = state.auth.register(req.into()).await?;
    Ok(created("User registered successfully", user))
}

pub(super) async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    state.auth.forgot_password(&req.email).await?;
    Ok(Json(json!({
        "message": "If the email exists, a password reset link has been sent",
    })))
}

pub(super) async fn reset_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .auth
        .reset_password(ResetPasswordInput {
            token: req.token,
            new_password: req.new_password,
        })
        .await?;
    Ok(Json(json!({ "message": "Password has been reset successfully" })))
}
