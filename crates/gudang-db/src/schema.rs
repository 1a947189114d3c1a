//! Schema definitions and migration runner for SQLite.
//!
//! Enums are stored as lowercase text guarded by CHECK constraints.
//! Timestamps are RFC 3339 text written by the application. No foreign
//! keys are declared: deleting a product leaves its ledger, balance and
//! opname rows in place.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS _migration (
    version    INTEGER PRIMARY KEY,
    name       TEXT NOT NULL,
    applied_at TEXT NOT NULL
);
";

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "identity",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "inventory",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// v1: users and password reset tokens
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
CREATE TABLE users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL CHECK (role IN ('admin', 'staff')),
    created_at    TEXT NOT NULL
);
CREATE UNIQUE INDEX idx_users_email ON users (email);

CREATE TABLE password_resets (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    email      TEXT NOT NULL,
    token_hash TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    used       INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE UNIQUE INDEX idx_password_resets_token ON password_resets (token_hash);
CREATE INDEX idx_password_resets_email ON password_resets (email);
";

// -----------------------------------------------------------------------
// v2: catalog, balances, ledger and opname
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
CREATE TABLE products (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    code       TEXT NOT NULL,
    name       TEXT NOT NULL,
    category   TEXT NOT NULL,
    unit       TEXT NOT NULL,
    min_stock  INTEGER NOT NULL DEFAULT 0,
    weight_kg  REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE UNIQUE INDEX idx_products_code ON products (code);

CREATE TABLE warehouses (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE stock_balances (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id   INTEGER NOT NULL,
    warehouse_id INTEGER NOT NULL,
    quantity     INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
CREATE UNIQUE INDEX idx_stock_balances_pair
    ON stock_balances (product_id, warehouse_id);

-- Ledger: append-only.
CREATE TABLE stock_transactions (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id   INTEGER NOT NULL,
    warehouse_id INTEGER NOT NULL,
    user_id      INTEGER NOT NULL,
    direction    TEXT NOT NULL CHECK (direction IN ('in', 'out')),
    quantity     INTEGER NOT NULL CHECK (quantity > 0),
    created_at   TEXT NOT NULL
);
CREATE INDEX idx_stock_transactions_product
    ON stock_transactions (product_id, created_at);

CREATE TRIGGER stock_transactions_no_update
BEFORE UPDATE ON stock_transactions
BEGIN
    SELECT RAISE(ABORT, 'stock_transactions is append-only');
END;

CREATE TRIGGER stock_transactions_no_delete
BEFORE DELETE ON stock_transactions
BEGIN
    SELECT RAISE(ABORT, 'stock_transactions is append-only');
END;

CREATE TABLE stock_opnames (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id     INTEGER NOT NULL,
    system_stock   INTEGER NOT NULL CHECK (system_stock >= 0),
    physical_stock INTEGER NOT NULL CHECK (physical_stock >= 0),
    variance       INTEGER NOT NULL,
    user_id        INTEGER NOT NULL,
    note           TEXT NOT NULL DEFAULT '',
    approved       INTEGER NOT NULL DEFAULT 0,
    approved_by    INTEGER,
    approved_at    TEXT,
    created_at     TEXT NOT NULL
);
CREATE INDEX idx_stock_opnames_product ON stock_opnames (product_id);
";

/// Apply every pending migration.
///
/// Each migration and its `_migration` record commit together, so a
/// failure leaves the schema at the previous version.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::raw_sql(MIGRATION_TABLE_DDL).execute(pool).await?;

    let current_version: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM _migration")
            .fetch_one(pool)
            .await?;

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );

        let mut tx = pool.begin().await?;

        sqlx::raw_sql(migration.sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

        sqlx::query("INSERT INTO _migration (version, name, applied_at) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

        tx.commit().await?;

        info!(
            version = migration.version,
            "Migration applied successfully"
        );
    }

    Ok(())
}

/// Highest schema version known to this build.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_are_nonempty() {
        for migration in MIGRATIONS {
            assert!(!migration.sql.trim().is_empty(), "{} is empty", migration.name);
        }
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn latest_version_matches_last_migration() {
        assert_eq!(latest_version(), 2);
    }
}
