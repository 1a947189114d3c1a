use axum::Json;
use axum::extract::State;
use gudang_core::error::GudangError;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Inventory API is running" }))
}

pub(super) async fn db_test(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.db.ping().await.map_err(GudangError::from)?;
    Ok(Json(json!({
        "status": "connected",
        "message": "Database connection is working",
    })))
}
