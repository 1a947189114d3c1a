//! SQLite implementation of [`StockRepository`]: the balance/ledger write
//! path and its read queries.
//!
//! A movement is one transaction whose first statement is a write, so a
//! second writer queues on the database lock (busy timeout) instead of
//! reading a snapshot that is already stale. The outgoing update is
//! conditional on `quantity >= ?`; a balance can therefore never go
//! negative even if two requests race for the same row. An incoming
//! movement is refused when the product's total across warehouses would
//! leave the `i64` range.

use chrono::{DateTime, Utc};
use gudang_core::error::{GudangError, GudangResult};
use gudang_core::models::stock::{
    CreateMovement, Direction, MovementOutcome, StockBalance, StockTransaction, TransactionFilter,
};
use gudang_core::repository::StockRepository;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbError;

const TRANSACTION_COLUMNS: &str =
    "id, product_id, warehouse_id, user_id, direction, quantity, created_at";
const BALANCE_COLUMNS: &str =
    "id, product_id, warehouse_id, quantity, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    product_id: i64,
    warehouse_id: i64,
    user_id: i64,
    direction: String,
    quantity: i64,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<StockTransaction, DbError> {
        Ok(StockTransaction {
            id: self.id,
            product_id: self.product_id,
            warehouse_id: self.warehouse_id,
            user_id: self.user_id,
            direction: parse_direction(&self.direction)?,
            quantity: self.quantity,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BalanceRow {
    id: i64,
    product_id: i64,
    warehouse_id: i64,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BalanceRow> for StockBalance {
    fn from(row: BalanceRow) -> Self {
        StockBalance {
            id: row.id,
            product_id: row.product_id,
            warehouse_id: row.warehouse_id,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn parse_direction(s: &str) -> Result<Direction, DbError> {
    s.parse().map_err(DbError::InvalidRow)
}

#[derive(Clone)]
pub struct SqliteStockRepository {
    pool: SqlitePool,
}

impl SqliteStockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl StockRepository for SqliteStockRepository {
    async fn record_movement(&self, input: CreateMovement) -> GudangResult<MovementOutcome> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Lazily create the balance row. Also takes the write lock.
        sqlx::query(
            "INSERT INTO stock_balances \
             (product_id, warehouse_id, quantity, created_at, updated_at) \
             VALUES (?, ?, 0, ?, ?) \
             ON CONFLICT (product_id, warehouse_id) DO NOTHING",
        )
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if input.direction == Direction::In {
            // Keeps every balance and the product-wide SUM inside i64.
            let product_total: i64 = sqlx::query_scalar(
                "SELECT COALESCE(SUM(quantity), 0) FROM stock_balances WHERE product_id = ?",
            )
            .bind(input.product_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if product_total.checked_add(input.quantity).is_none() {
                tx.rollback().await.map_err(DbError::from)?;
                warn!(
                    product_id = input.product_id,
                    product_total,
                    requested = input.quantity,
                    "Rejected incoming movement: total stock would overflow"
                );
                return Err(GudangError::validation(
                    "quantity would exceed the maximum total stock for this product",
                ));
            }
        }

        let updated: Option<i64> = match input.direction {
            Direction::In => sqlx::query_scalar(
                "UPDATE stock_balances SET quantity = quantity + ?, updated_at = ? \
                 WHERE product_id = ? AND warehouse_id = ? \
                 RETURNING quantity",
            )
            .bind(input.quantity)
            .bind(now)
            .bind(input.product_id)
            .bind(input.warehouse_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?,
            Direction::Out => sqlx::query_scalar(
                "UPDATE stock_balances SET quantity = quantity - ?, updated_at = ? \
                 WHERE product_id = ? AND warehouse_id = ? AND quantity >= ? \
                 RETURNING quantity",
            )
            .bind(input.quantity)
            .bind(now)
            .bind(input.product_id)
            .bind(input.warehouse_id)
            .bind(input.quantity)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?,
        };

        let Some(new_balance) = updated else {
            let current: Option<i64> = sqlx::query_scalar(
                "SELECT quantity FROM stock_balances \
                 WHERE product_id = ? AND warehouse_id = ?",
            )
            .bind(input.product_id)
            .bind(input.warehouse_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?;

            // Undo the lazily created row as well.
            tx.rollback().await.map_err(DbError::from)?;

            let current = current.unwrap_or(0);
            warn!(
                product_id = input.product_id,
                warehouse_id = input.warehouse_id,
                current,
                requested = input.quantity,
                "Rejected outgoing movement: insufficient stock"
            );
            return Err(GudangError::InsufficientStock {
                current,
                requested: input.quantity,
            });
        };

        let row: TransactionRow = sqlx::query_as(&format!(
            "INSERT INTO stock_transactions \
             (product_id, warehouse_id, user_id, direction, quantity, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(input.user_id)
        .bind(input.direction.as_str())
        .bind(input.quantity)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        let transaction = row.into_transaction()?;
        debug!(
            transaction_id = transaction.id,
            direction = %transaction.direction,
            quantity = transaction.quantity,
            new_balance,
            "Movement committed"
        );

        Ok(MovementOutcome {
            transaction,
            new_balance,
        })
    }

    async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> GudangResult<Vec<StockTransaction>> {
        let mut conditions = Vec::new();
        if filter.product_id.is_some() {
            conditions.push("product_id = ?");
        }
        if filter.direction.is_some() {
            conditions.push("direction = ?");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM stock_transactions {where_clause} \
             ORDER BY created_at DESC, id DESC"
        );

        let mut builder = sqlx::query_as::<_, TransactionRow>(&query);
        if let Some(product_id) = filter.product_id {
            builder = builder.bind(product_id);
        }
        if let Some(direction) = filter.direction {
            builder = builder.bind(direction.as_str());
        }

        let rows = builder.fetch_all(&self.pool).await.map_err(DbError::from)?;

        let transactions = rows
            .into_iter()
            .map(TransactionRow::into_transaction)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    async fn get_transaction(&self, id: i64) -> GudangResult<StockTransaction> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM stock_transactions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        let row = row.ok_or_else(|| DbError::not_found("stock transaction", id))?;
        Ok(row.into_transaction()?)
    }

    async fn total_stock(&self, product_id: i64) -> GudangResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM stock_balances WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(total)
    }

    async fn list_balances(&self, product_id: Option<i64>) -> GudangResult<Vec<StockBalance>> {
        let rows: Vec<BalanceRow> = match product_id {
            Some(product_id) => sqlx::query_as(&format!(
                "SELECT {BALANCE_COLUMNS} FROM stock_balances \
                 WHERE product_id = ? ORDER BY id"
            ))
            .bind(product_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?,
            None => sqlx::query_as(&format!(
                "SELECT {BALANCE_COLUMNS} FROM stock_balances ORDER BY id"
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?,
        };

        Ok(rows.into_iter().map(StockBalance::from).collect())
    }

    async fn get_balance(&self, id: i64) -> GudangResult<StockBalance> {
        let row: Option<BalanceRow> = sqlx::query_as(&format!(
            "SELECT {BALANCE_COLUMNS} FROM stock_balances WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(row.ok_or_else(|| DbError::not_found("stock balance", id))?.into())
    }
}
