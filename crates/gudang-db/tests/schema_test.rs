//! Integration tests for schema initialization using in-memory SQLite.

use gudang_db::DbManager;

async fn table_names(pool: &sqlx::SqlitePool) -> Vec<String> {
    sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = DbManager::in_memory().await.unwrap();
    gudang_db::run_migrations(db.pool()).await.unwrap();

    let tables = table_names(db.pool()).await;
    for expected in [
        "_migration",
        "users",
        "password_resets",
        "products",
        "warehouses",
        "stock_balances",
        "stock_transactions",
        "stock_opnames",
    ] {
        assert!(
            tables.iter().any(|t| t == expected),
            "missing {expected} table"
        );
    }
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = DbManager::in_memory().await.unwrap();

    // Second run is a no-op.
    gudang_db::run_migrations(db.pool()).await.unwrap();
    gudang_db::run_migrations(db.pool()).await.unwrap();

    let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM _migration ORDER BY version")
        .fetch_all(db.pool())
        .await
        .unwrap();
    assert_eq!(versions, vec![1, 2]);
    assert_eq!(*versions.last().unwrap(), gudang_db::latest_version());
}

#[tokio::test]
async fn ledger_rejects_update_and_delete() {
    let db = DbManager::in_memory().await.unwrap();
    gudang_db::run_migrations(db.pool()).await.unwrap();

    sqlx::query(
        "INSERT INTO stock_transactions \
         (product_id, warehouse_id, user_id, direction, quantity, created_at) \
         VALUES (1, 1, 1, 'in', 5, '2024-01-01T00:00:00Z')",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let update = sqlx::query("UPDATE stock_transactions SET quantity = 50")
        .execute(db.pool())
        .await;
    assert!(update.is_err(), "ledger rows must not be updatable");

    let delete = sqlx::query("DELETE FROM stock_transactions")
        .execute(db.pool())
        .await;
    assert!(delete.is_err(), "ledger rows must not be deletable");
}

#[tokio::test]
async fn balance_check_constraint_rejects_negative_quantity() {
    let db = DbManager::in_memory().await.unwrap();
    gudang_db::run_migrations(db.pool()).await.unwrap();

    let result = sqlx::query(
        "INSERT INTO stock_balances \
         (product_id, warehouse_id, quantity, created_at, updated_at) \
         VALUES (1, 1, -1, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
    )
    .execute(db.pool())
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn ping_succeeds_on_open_pool() {
    let db = DbManager::in_memory().await.unwrap();
    db.ping().await.unwrap();
}
