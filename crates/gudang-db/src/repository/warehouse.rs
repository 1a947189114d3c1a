//! SQLite implementation of [`WarehouseRepository`].

use chrono::{DateTime, Utc};
use gudang_core::error::GudangResult;
use gudang_core::models::warehouse::{CreateWarehouse, Warehouse};
use gudang_core::repository::WarehouseRepository;
use sqlx::SqlitePool;

use crate::error::DbError;

#[derive(Debug, sqlx::FromRow)]
struct WarehouseRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WarehouseRow> for Warehouse {
    fn from(row: WarehouseRow) -> Self {
        Warehouse {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct SqliteWarehouseRepository {
    pool: SqlitePool,
}

impl SqliteWarehouseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl WarehouseRepository for SqliteWarehouseRepository {
    async fn create(&self, input: CreateWarehouse) -> GudangResult<Warehouse> {
        let now = Utc::now();
        let row: WarehouseRow = sqlx::query_as(
            "INSERT INTO warehouses (name, created_at, updated_at) VALUES (?, ?, ?) \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(input.name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: i64) -> GudangResult<Warehouse> {
        let row: Option<WarehouseRow> = sqlx::query_as(
            "SELECT id, name, created_at, updated_at FROM warehouses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(row.ok_or_else(|| DbError::not_found("warehouse", id))?.into())
    }

    async fn list(&self) -> GudangResult<Vec<Warehouse>> {
        let rows: Vec<WarehouseRow> = sqlx::query_as(
            "SELECT id, name, created_at, updated_at FROM warehouses ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(rows.into_iter().map(Warehouse::from).collect())
    }
}
