//! User directory. Reads need a token; writes need the admin role.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use super::auth::RegisterRequest;
use super::{created, data_body, list_body};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::AuthUser;
use crate::state::AppState;

pub(super) async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(list_body(state.auth.list_users().await?))
}

pub(super) async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    Ok(data_body(state.auth.get_user(id).await?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = state.auth.create_user(&actor, req.into()).await?;
    Ok(created("User created successfully", user))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    state.auth.delete_user(&actor, id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
