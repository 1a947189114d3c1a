//! Integration tests for the stock ledger repository.
//!
//! Most tests run against in-memory SQLite; the concurrency test uses a
//! file-backed database so several pooled connections share one store.

use std::sync::Arc;
use std::time::Duration;

use gudang_core::error::GudangError;
use gudang_core::models::stock::{CreateMovement, Direction, TransactionFilter};
use gudang_core::repository::StockRepository;
use gudang_db::repository::SqliteStockRepository;
use gudang_db::{DbConfig, DbManager};
use sqlx::SqlitePool;

async fn setup() -> SqlitePool {
    let db = DbManager::in_memory().await.unwrap();
    gudang_db::run_migrations(db.pool()).await.unwrap();
    db.pool().clone()
}

fn movement(product_id: i64, warehouse_id: i64, direction: Direction, quantity: i64) -> CreateMovement {
    CreateMovement {
        product_id,
        warehouse_id,
        user_id: 1,
        direction,
        quantity,
    }
}

async fn balance_rows(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM stock_balances")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn ledger_rows(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM stock_transactions")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

#[tokio::test]
async fn incoming_movement_creates_balance_lazily() {
    let pool = setup().await;
    let repo = SqliteStockRepository::new(pool.clone());

    let outcome = repo
        .record_movement(movement(1, 1, Direction::In, 3))
        .await
        .unwrap();

    assert_eq!(outcome.new_balance, 3);
    assert_eq!(outcome.transaction.direction, Direction::In);
    assert_eq!(outcome.transaction.quantity, 3);

    let balances = repo.list_balances(Some(1)).await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].quantity, 3);
    assert_eq!(balances[0].warehouse_id, 1);
}

#[tokio::test]
async fn outgoing_within_balance_decrements() {
    let repo = SqliteStockRepository::new(setup().await);
    repo.record_movement(movement(1, 1, Direction::In, 10))
        .await
        .unwrap();

    let outcome = repo
        .record_movement(movement(1, 1, Direction::Out, 5))
        .await
        .unwrap();
    assert_eq!(outcome.new_balance, 5);

    let outcome = repo
        .record_movement(movement(1, 1, Direction::Out, 5))
        .await
        .unwrap();
    assert_eq!(outcome.new_balance, 0, "draining to exactly zero is allowed");
}

#[tokio::test]
async fn outgoing_beyond_balance_is_rejected_without_side_effects() {
    let pool = setup().await;
    let repo = SqliteStockRepository::new(pool.clone());
    repo.record_movement(movement(1, 1, Direction::In, 5))
        .await
        .unwrap();

    let err = repo
        .record_movement(movement(1, 1, Direction::Out, 10))
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            GudangError::InsufficientStock {
                current: 5,
                requested: 10
            }
        ),
        "got {err:?}"
    );

    assert_eq!(repo.total_stock(1).await.unwrap(), 5);
    assert_eq!(ledger_rows(&pool).await, 1);
}

#[tokio::test]
async fn outgoing_from_empty_pair_leaves_no_balance_row() {
    let pool = setup().await;
    let repo = SqliteStockRepository::new(pool.clone());

    let err = repo
        .record_movement(movement(1, 2, Direction::Out, 1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GudangError::InsufficientStock {
            current: 0,
            requested: 1
        }
    ));

    assert_eq!(balance_rows(&pool).await, 0);
    assert_eq!(ledger_rows(&pool).await, 0);
}

#[tokio::test]
async fn total_stock_sums_across_warehouses() {
    let repo = SqliteStockRepository::new(setup().await);
    assert_eq!(repo.total_stock(1).await.unwrap(), 0);

    repo.record_movement(movement(1, 1, Direction::In, 4))
        .await
        .unwrap();
    repo.record_movement(movement(1, 2, Direction::In, 6))
        .await
        .unwrap();
    repo.record_movement(movement(2, 1, Direction::In, 100))
        .await
        .unwrap();

    assert_eq!(repo.total_stock(1).await.unwrap(), 10);
}

#[tokio::test]
async fn incoming_past_i64_range_on_one_balance_is_rejected() {
    let pool = setup().await;
    let repo = SqliteStockRepository::new(pool.clone());
    repo.record_movement(movement(1, 1, Direction::In, i64::MAX - 1))
        .await
        .unwrap();

    let err = repo
        .record_movement(movement(1, 1, Direction::In, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, GudangError::Validation { .. }), "got {err:?}");

    let balances = repo.list_balances(Some(1)).await.unwrap();
    assert_eq!(balances[0].quantity, i64::MAX - 1);
    assert_eq!(ledger_rows(&pool).await, 1);

    // Filling exactly to the limit is still allowed.
    let outcome = repo
        .record_movement(movement(1, 1, Direction::In, 1))
        .await
        .unwrap();
    assert_eq!(outcome.new_balance, i64::MAX);
}

#[tokio::test]
async fn incoming_that_would_overflow_product_total_is_rejected() {
    let pool = setup().await;
    let repo = SqliteStockRepository::new(pool.clone());
    repo.record_movement(movement(1, 1, Direction::In, i64::MAX))
        .await
        .unwrap();

    let err = repo
        .record_movement(movement(1, 2, Direction::In, i64::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, GudangError::Validation { .. }), "got {err:?}");

    // No second balance row, no ledger line, and the sum still reads.
    assert_eq!(balance_rows(&pool).await, 1);
    assert_eq!(ledger_rows(&pool).await, 1);
    assert_eq!(repo.total_stock(1).await.unwrap(), i64::MAX);

    // Other products are unaffected.
    repo.record_movement(movement(2, 2, Direction::In, 5))
        .await
        .unwrap();
    assert_eq!(repo.total_stock(2).await.unwrap(), 5);
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_transactions_newest_first_with_filters() {
    let repo = SqliteStockRepository::new(setup().await);
    let first = repo
        .record_movement(movement(1, 1, Direction::In, 10))
        .await
        .unwrap();
    let second = repo
        .record_movement(movement(1, 1, Direction::Out, 2))
        .await
        .unwrap();
    let third = repo
        .record_movement(movement(2, 1, Direction::In, 7))
        .await
        .unwrap();

    let all = repo
        .list_transactions(TransactionFilter::default())
        .await
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|t| t.id).collect();
    assert_eq!(
        ids,
        vec![
            third.transaction.id,
            second.transaction.id,
            first.transaction.id
        ]
    );

    let product_one = repo
        .list_transactions(TransactionFilter {
            product_id: Some(1),
            direction: None,
        })
        .await
        .unwrap();
    assert_eq!(product_one.len(), 2);

    let incoming_one = repo
        .list_transactions(TransactionFilter {
            product_id: Some(1),
            direction: Some(Direction::In),
        })
        .await
        .unwrap();
    assert_eq!(incoming_one.len(), 1);
    assert_eq!(incoming_one[0].id, first.transaction.id);
}

#[tokio::test]
async fn get_transaction_and_balance_by_id() {
    let repo = SqliteStockRepository::new(setup().await);
    let outcome = repo
        .record_movement(movement(3, 4, Direction::In, 8))
        .await
        .unwrap();

    let fetched = repo.get_transaction(outcome.transaction.id).await.unwrap();
    assert_eq!(fetched, outcome.transaction);

    let balance_id = repo.list_balances(None).await.unwrap()[0].id;
    let balance = repo.get_balance(balance_id).await.unwrap();
    assert_eq!(balance.quantity, 8);

    assert!(matches!(
        repo.get_transaction(999).await.unwrap_err(),
        GudangError::NotFound { .. }
    ));
    assert!(matches!(
        repo.get_balance(999).await.unwrap_err(),
        GudangError::NotFound { .. }
    ));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dropped_movement_rolls_back() {
    let pool = setup().await;
    let repo = SqliteStockRepository::new(pool.clone());
    repo.record_movement(movement(1, 1, Direction::In, 10))
        .await
        .unwrap();

    // Stall the ledger insert, after the balance UPDATE, on a large scan.
    sqlx::raw_sql(
        "CREATE TABLE filler (n INTEGER NOT NULL); \
         INSERT INTO filler (n) \
             WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 3000) \
             SELECT x FROM c; \
         CREATE TRIGGER slow_ledger AFTER INSERT ON stock_transactions BEGIN \
             SELECT count(*) FROM filler a, filler b WHERE a.n + b.n < 0; \
         END;",
    )
    .execute(&pool)
    .await
    .unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_millis(10),
        repo.record_movement(movement(1, 1, Direction::Out, 4)),
    )
    .await;
    assert!(outcome.is_err(), "movement finished before the deadline");

    sqlx::raw_sql("DROP TRIGGER slow_ledger")
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(repo.total_stock(1).await.unwrap(), 10);
    assert_eq!(ledger_rows(&pool).await, 1);

    // The connection is usable again.
    let outcome = repo
        .record_movement(movement(1, 1, Direction::Out, 4))
        .await
        .unwrap();
    assert_eq!(outcome.new_balance, 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_outgoing_movements_never_oversell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let db = DbManager::connect(&DbConfig {
        url: format!("sqlite://{}", path.display()),
        max_connections: 8,
        acquire_timeout: Duration::from_secs(30),
        busy_timeout: Duration::from_secs(30),
    })
    .await
    .unwrap();
    gudang_db::run_migrations(db.pool()).await.unwrap();

    let repo = Arc::new(SqliteStockRepository::new(db.pool().clone()));
    repo.record_movement(movement(1, 1, Direction::In, 20))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..12 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.record_movement(movement(1, 1, Direction::Out, 3)).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(GudangError::InsufficientStock { .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    // 12 * 3 = 36 requested against 20 on hand: exactly 6 fit.
    assert_eq!(successes, 6);
    let total = repo.total_stock(1).await.unwrap();
    assert_eq!(total, 20 - successes * 3);
    assert!(total >= 0);

    let outgoing = repo
        .list_transactions(TransactionFilter {
            product_id: Some(1),
            direction: Some(Direction::Out),
        })
        .await
        .unwrap();
    assert_eq!(outgoing.len() as i64, successes);

    db.close().await;
}
