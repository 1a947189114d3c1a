//! Router assembly and the JSON envelopes shared by handlers.

mod auth;
mod catalog;
mod health;
mod stock;
mod users;

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::require_auth;
use crate::state::AppState;

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let public = Router::new()
        .route("/api/v1/db/test", get(health::db_test))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route("/api/v1/auth/reset-password", post(auth::reset_password));

    let protected = Router::new()
        .route("/api/v1/users", get(users::list).post(users::create))
        .route("/api/v1/users/{id}", get(users::get).delete(users::delete))
        .route(
            "/api/v1/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/api/v1/products/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route("/api/v1/products/stock/{id}", get(stock::total_stock))
        .route(
            "/api/v1/gudangs",
            get(catalog::list_warehouses).post(catalog::create_warehouse),
        )
        .route("/api/v1/stock", get(stock::list_balances))
        .route("/api/v1/stock/{id}", get(stock::get_balance))
        .route(
            "/api/v1/stock/transactions",
            get(stock::list_movements).post(stock::record_movement),
        )
        .route("/api/v1/stock/transactions/{id}", get(stock::get_movement))
        .route(
            "/api/v1/stock/opname",
            get(stock::list_opnames).post(stock::record_opname),
        )
        .route("/api/v1/stock/opname/{id}", get(stock::get_opname))
        .route("/api/v1/stock/opname/{id}/approve", post(stock::approve_opname))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health))
        .merge(public)
        .merge(protected)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `{"data": [...], "total": n}`
fn list_body<T: Serialize>(items: Vec<T>) -> Json<Value> {
    let total = items.len();
    Json(json!({ "data": items, "total": total }))
}

fn data_body<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "data": data }))
}

fn message_body<T: Serialize>(message: &str, data: T) -> Json<Value> {
    Json(json!({ "message": message, "data": data }))
}

fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, message_body(message, data))
}
