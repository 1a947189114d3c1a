//! Integration tests for the ledger service over in-memory SQLite.

use gudang_core::error::GudangError;
use gudang_core::models::product::CreateProduct;
use gudang_core::models::stock::{Direction, TransactionFilter};
use gudang_core::models::warehouse::CreateWarehouse;
use gudang_core::repository::{ProductRepository, WarehouseRepository};
use gudang_db::DbManager;
use gudang_db::repository::{
    SqliteProductRepository, SqliteStockRepository, SqliteWarehouseRepository,
};
use gudang_stock::{LedgerService, MovementInput};

type Ledger = LedgerService<SqliteProductRepository, SqliteWarehouseRepository, SqliteStockRepository>;

const USER: i64 = 7;

/// One product (`product_id`) and two warehouses (`w1`, `w2`).
struct Fixture {
    ledger: Ledger,
    product_id: i64,
    w1: i64,
    w2: i64,
}

async fn setup() -> Fixture {
    let db = DbManager::in_memory().await.unwrap();
    gudang_db::run_migrations(db.pool()).await.unwrap();
    let pool = db.pool().clone();

    let products = SqliteProductRepository::new(pool.clone());
    let warehouses = SqliteWarehouseRepository::new(pool.clone());

    let product = products
        .create(CreateProduct {
            code: "BRG-001".into(),
            name: "Semen Portland".into(),
            category: "Bahan Bangunan".into(),
            unit: "sak".into(),
            min_stock: 5,
            weight_kg: 50.0,
        })
        .await
        .unwrap();
    let w1 = warehouses
        .create(CreateWarehouse {
            name: "Gudang A".into(),
        })
        .await
        .unwrap();
    let w2 = warehouses
        .create(CreateWarehouse {
            name: "Gudang B".into(),
        })
        .await
        .unwrap();

    Fixture {
        ledger: LedgerService::new(products, warehouses, SqliteStockRepository::new(pool)),
        product_id: product.id,
        w1: w1.id,
        w2: w2.id,
    }
}

fn mv(product_id: i64, warehouse_id: i64, direction: Direction, quantity: i64) -> MovementInput {
    MovementInput {
        product_id,
        warehouse_id,
        direction,
        quantity,
    }
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_incoming_movement_creates_balance() {
    let f = setup().await;

    let outcome = f
        .ledger
        .record_movement(USER, mv(f.product_id, f.w1, Direction::In, 3))
        .await
        .unwrap();
    assert_eq!(outcome.new_balance, 3);
    assert_eq!(outcome.transaction.user_id, USER);

    let balances = f.ledger.list_balances(Some(f.product_id)).await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].quantity, 3);
}

#[tokio::test]
async fn outgoing_within_balance_succeeds() {
    let f = setup().await;
    f.ledger
        .record_movement(USER, mv(f.product_id, f.w1, Direction::In, 10))
        .await
        .unwrap();

    let outcome = f
        .ledger
        .record_movement(USER, mv(f.product_id, f.w1, Direction::Out, 5))
        .await
        .unwrap();
    assert_eq!(outcome.new_balance, 5);

    let ledger = f
        .ledger
        .list_movements(TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].direction, Direction::Out);
}

#[tokio::test]
async fn outgoing_beyond_balance_reports_current_and_requested() {
    let f = setup().await;
    f.ledger
        .record_movement(USER, mv(f.product_id, f.w1, Direction::In, 5))
        .await
        .unwrap();

    let err = f
        .ledger
        .record_movement(USER, mv(f.product_id, f.w1, Direction::Out, 10))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GudangError::InsufficientStock {
            current: 5,
            requested: 10
        }
    ));

    let total = f.ledger.total_stock(f.product_id).await.unwrap();
    assert_eq!(total.total_stock, 5);
    assert_eq!(
        f.ledger
            .list_movements(TransactionFilter::default())
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn balances_are_tracked_per_warehouse() {
    let f = setup().await;
    f.ledger
        .record_movement(USER, mv(f.product_id, f.w1, Direction::In, 4))
        .await
        .unwrap();

    // Stock in W1 does not cover an outgoing movement from W2.
    let err = f
        .ledger
        .record_movement(USER, mv(f.product_id, f.w2, Direction::Out, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, GudangError::InsufficientStock { current: 0, .. }));
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let f = setup().await;
    for quantity in [0, -3] {
        let err = f
            .ledger
            .record_movement(USER, mv(f.product_id, f.w1, Direction::In, quantity))
            .await
            .unwrap_err();
        assert!(matches!(err, GudangError::Validation { .. }));
    }
}

#[tokio::test]
async fn unknown_product_or_warehouse_is_not_found() {
    let f = setup().await;

    let err = f
        .ledger
        .record_movement(USER, mv(999, f.w1, Direction::In, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, GudangError::NotFound { ref entity, .. } if entity == "product"));

    let err = f
        .ledger
        .record_movement(USER, mv(f.product_id, 999, Direction::In, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, GudangError::NotFound { ref entity, .. } if entity == "warehouse"));
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn total_stock_across_warehouses() {
    let f = setup().await;

    let empty = f.ledger.total_stock(f.product_id).await.unwrap();
    assert_eq!(empty.total_stock, 0);
    assert_eq!(empty.product_name, "Semen Portland");

    f.ledger
        .record_movement(USER, mv(f.product_id, f.w1, Direction::In, 4))
        .await
        .unwrap();
    f.ledger
        .record_movement(USER, mv(f.product_id, f.w2, Direction::In, 6))
        .await
        .unwrap();

    let total = f.ledger.total_stock(f.product_id).await.unwrap();
    assert_eq!(total.total_stock, 10);
    assert_eq!(total.product_id, f.product_id);

    assert!(matches!(
        f.ledger.total_stock(999).await.unwrap_err(),
        GudangError::NotFound { .. }
    ));
}

#[tokio::test]
async fn movement_and_balance_lookup_by_id() {
    let f = setup().await;
    let outcome = f
        .ledger
        .record_movement(USER, mv(f.product_id, f.w2, Direction::In, 2))
        .await
        .unwrap();

    let fetched = f.ledger.get_movement(outcome.transaction.id).await.unwrap();
    assert_eq!(fetched.warehouse_id, f.w2);

    let balance_id = f.ledger.list_balances(None).await.unwrap()[0].id;
    assert_eq!(f.ledger.get_balance(balance_id).await.unwrap().quantity, 2);
}
