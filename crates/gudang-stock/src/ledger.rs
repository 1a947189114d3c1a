//! Stock ledger service: records in/out movements against per-warehouse
//! balances and answers stock queries.
//!
//! Existence checks run before the store transaction; the balance update
//! and ledger append themselves are a single atomic unit inside
//! [`StockRepository::record_movement`].

use gudang_core::error::{GudangError, GudangResult};
use gudang_core::models::product::ProductStock;
use gudang_core::models::stock::{
    CreateMovement, Direction, MovementOutcome, StockBalance, StockTransaction, TransactionFilter,
};
use gudang_core::repository::{ProductRepository, StockRepository, WarehouseRepository};
use tracing::info;

/// A movement as requested by a user. The acting user is supplied
/// separately, from the verified token.
#[derive(Debug, Clone, Copy)]
pub struct MovementInput {
    pub product_id: i64,
    pub warehouse_id: i64,
    pub direction: Direction,
    pub quantity: i64,
}

pub struct LedgerService<P: ProductRepository, W: WarehouseRepository, S: StockRepository> {
    products: P,
    warehouses: W,
    stock: S,
}

impl<P, W, S> LedgerService<P, W, S>
where
    P: ProductRepository,
    W: WarehouseRepository,
    S: StockRepository,
{
    pub fn new(products: P, warehouses: W, stock: S) -> Self {
        Self {
            products,
            warehouses,
            stock,
        }
    }

    /// Apply a movement and append it to the ledger.
    ///
    /// Fails with `Validation` for a non-positive quantity, `NotFound` for
    /// an unknown product or warehouse and `InsufficientStock` when an
    /// outgoing quantity exceeds the balance.
    pub async fn record_movement(
        &self,
        user_id: i64,
        input: MovementInput,
    ) -> GudangResult<MovementOutcome> {
        if input.quantity <= 0 {
            return Err(GudangError::validation("quantity must be greater than 0"));
        }

        self.products.get_by_id(input.product_id).await?;
        self.warehouses.get_by_id(input.warehouse_id).await?;

        let outcome = self
            .stock
            .record_movement(CreateMovement {
                product_id: input.product_id,
                warehouse_id: input.warehouse_id,
                user_id,
                direction: input.direction,
                quantity: input.quantity,
            })
            .await?;

        info!(
            transaction_id = outcome.transaction.id,
            product_id = input.product_id,
            warehouse_id = input.warehouse_id,
            direction = %input.direction,
            quantity = input.quantity,
            new_balance = outcome.new_balance,
            user_id,
            "Stock movement recorded"
        );
        Ok(outcome)
    }

    pub async fn list_movements(
        &self,
        filter: TransactionFilter,
    ) -> GudangResult<Vec<StockTransaction>> {
        self.stock.list_transactions(filter).await
    }

    pub async fn get_movement(&self, id: i64) -> GudangResult<StockTransaction> {
        self.stock.get_transaction(id).await
    }

    /// Total across every warehouse. Zero when the product has never
    /// moved; `NotFound` when the product does not exist.
    pub async fn total_stock(&self, product_id: i64) -> GudangResult<ProductStock> {
        let product = self.products.get_by_id(product_id).await?;
        let total_stock = self.stock.total_stock(product_id).await?;
        Ok(ProductStock {
            product_id: product.id,
            product_name: product.name,
            total_stock,
        })
    }

    pub async fn list_balances(&self, product_id: Option<i64>) -> GudangResult<Vec<StockBalance>> {
        self.stock.list_balances(product_id).await
    }

    pub async fn get_balance(&self, id: i64) -> GudangResult<StockBalance> {
        self.stock.get_balance(id).await
    }
}
