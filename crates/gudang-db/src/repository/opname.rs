//! SQLite implementation of [`OpnameRepository`].

use chrono::{DateTime, Utc};
use gudang_core::error::{GudangError, GudangResult};
use gudang_core::models::opname::{CreateOpname, OpnameRecord};
use gudang_core::repository::OpnameRepository;
use sqlx::SqlitePool;

use crate::error::DbError;

const COLUMNS: &str = "id, product_id, system_stock, physical_stock, variance, user_id, \
                       note, approved, approved_by, approved_at, created_at";

#[derive(Debug, sqlx::FromRow)]
struct OpnameRow {
    id: i64,
    product_id: i64,
    system_stock: i64,
    physical_stock: i64,
    variance: i64,
    user_id: i64,
    note: String,
    approved: bool,
    approved_by: Option<i64>,
    approved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<OpnameRow> for OpnameRecord {
    fn from(row: OpnameRow) -> Self {
        OpnameRecord {
            id: row.id,
            product_id: row.product_id,
            system_stock: row.system_stock,
            physical_stock: row.physical_stock,
            variance: row.variance,
            user_id: row.user_id,
            note: row.note,
            approved: row.approved,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct SqliteOpnameRepository {
    pool: SqlitePool,
}

impl SqliteOpnameRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl OpnameRepository for SqliteOpnameRepository {
    async fn create(&self, input: CreateOpname) -> GudangResult<OpnameRecord> {
        let row: OpnameRow = sqlx::query_as(&format!(
            "INSERT INTO stock_opnames \
             (product_id, system_stock, physical_stock, variance, user_id, note, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(input.product_id)
        .bind(input.system_stock)
        .bind(input.physical_stock)
        .bind(input.variance)
        .bind(input.user_id)
        .bind(input.note)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: i64) -> GudangResult<OpnameRecord> {
        let row: Option<OpnameRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM stock_opnames WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::from)?;

        Ok(row.ok_or_else(|| DbError::not_found("opname", id))?.into())
    }

    async fn list(&self, product_id: Option<i64>) -> GudangResult<Vec<OpnameRecord>> {
        let rows: Vec<OpnameRow> = match product_id {
            Some(product_id) => sqlx::query_as(&format!(
                "SELECT {COLUMNS} FROM stock_opnames WHERE product_id = ? ORDER BY id"
            ))
            .bind(product_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?,
            None => sqlx::query_as(&format!("SELECT {COLUMNS} FROM stock_opnames ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(DbError::from)?,
        };

        Ok(rows.into_iter().map(OpnameRecord::from).collect())
    }

    async fn approve(&self, id: i64, approver_id: i64) -> GudangResult<OpnameRecord> {
        let row: Option<OpnameRow> = sqlx::query_as(&format!(
            "UPDATE stock_opnames SET approved = 1, approved_by = ?, approved_at = ? \
             WHERE id = ? AND approved = 0 RETURNING {COLUMNS}"
        ))
        .bind(approver_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        match row {
            Some(row) => Ok(row.into()),
            // Either missing or already approved; tell them apart.
            None => {
                let existing = self.get_by_id(id).await?;
                Err(GudangError::Conflict {
                    entity: "opname".into(),
                    message: format!("opname {} is already approved", existing.id),
                })
            }
        }
    }
}
