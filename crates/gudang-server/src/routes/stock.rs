//! Stock balances, ledger movements and opname records.
//!
//! The acting user always comes from the verified token; a `user_id` in
//! the request body is ignored.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use gudang_auth::service::ensure_admin;
use gudang_core::models::stock::{Direction, TransactionFilter};
use gudang_stock::{MovementInput, OpnameInput};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{created, data_body, list_body, message_body};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct MovementRequest {
    #[serde(alias = "produk_id")]
    product_id: i64,
    #[serde(alias = "gudang_id")]
    warehouse_id: i64,
    #[serde(alias = "tipe")]
    direction: Direction,
    #[serde(alias = "jumlah")]
    quantity: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct TransactionQuery {
    #[serde(default, alias = "produk_id")]
    product_id: Option<i64>,
    #[serde(default, alias = "tipe")]
    direction: Option<Direction>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    #[serde(default, alias = "produk_id")]
    product_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpnameRequest {
    #[serde(alias = "produk_id")]
    product_id: i64,
    #[serde(alias = "stok_sistem")]
    system_stock: i64,
    #[serde(alias = "stok_fisik")]
    physical_stock: i64,
    #[serde(default, alias = "keterangan")]
    note: Option<String>,
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

pub(super) async fn list_balances(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(list_body(state.ledger.list_balances(query.product_id).await?))
}

pub(super) async fn get_balance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    Ok(data_body(state.ledger.get_balance(id).await?))
}

pub(super) async fn total_stock(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    Ok(data_body(state.ledger.total_stock(product_id).await?))
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

pub(super) async fn record_movement(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<MovementRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .ledger
        .record_movement(
            user.id(),
            MovementInput {
                product_id: req.product_id,
                warehouse_id: req.warehouse_id,
                direction: req.direction,
                quantity: req.quantity,
            },
        )
        .await?;

    let tx = outcome.transaction;
    Ok(message_body(
        "Transaction created successfully",
        json!({
            "transaction_id": tx.id,
            "product_id": tx.product_id,
            "warehouse_id": tx.warehouse_id,
            "user_id": tx.user_id,
            "direction": tx.direction,
            "quantity": tx.quantity,
            "new_balance": outcome.new_balance,
            "created_at": tx.created_at,
        }),
    ))
}

pub(super) async fn list_movements(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = TransactionFilter {
        product_id: query.product_id,
        direction: query.direction,
    };
    Ok(list_body(state.ledger.list_movements(filter).await?))
}

pub(super) async fn get_movement(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    Ok(data_body(state.ledger.get_movement(id).await?))
}

// ---------------------------------------------------------------------------
// Opname
// ---------------------------------------------------------------------------

pub(super) async fn record_opname(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<OpnameRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let record = state
        .opnames
        .record(
            user.id(),
            OpnameInput {
                product_id: req.product_id,
                system_stock: req.system_stock,
                physical_stock: req.physical_stock,
                note: req.note,
            },
        )
        .await?;
    Ok(created("Stock opname record created successfully", record))
}

pub(super) async fn list_opnames(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(list_body(state.opnames.list(query.product_id).await?))
}

pub(super) async fn get_opname(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    Ok(data_body(state.opnames.get(id).await?))
}

pub(super) async fn approve_opname(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&actor)?;
    let record = state.opnames.approve(id, actor.user_id).await?;
    Ok(message_body("Stock opname approved", record))
}
