//! Products and warehouses.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use gudang_core::models::product::{CreateProduct, UpdateProduct};
use gudang_core::models::warehouse::CreateWarehouse;
use serde_json::{Value, json};

use super::{created, data_body, list_body, message_body};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub(super) async fn list_products(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(list_body(state.catalog.list_products().await?))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    Ok(data_body(state.catalog.get_product(id).await?))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateProduct>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let product = state.catalog.create_product(input).await?;
    Ok(created("Product created successfully", product))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateProduct>,
) -> Result<Json<Value>, ApiError> {
    let product = state.catalog.update_product(id, input).await?;
    Ok(message_body("Product updated successfully", product))
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    state.catalog.delete_product(id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

pub(super) async fn list_warehouses(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    Ok(list_body(state.catalog.list_warehouses().await?))
}

pub(super) async fn create_warehouse(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateWarehouse>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let warehouse = state.catalog.create_warehouse(input).await?;
    Ok(created("Warehouse created successfully", warehouse))
}
