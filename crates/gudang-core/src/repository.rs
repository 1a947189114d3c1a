//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Services are generic over these
//! traits, so they never depend on the concrete store.

use chrono::{DateTime, Utc};

use crate::error::GudangResult;
use crate::models::{
    opname::{CreateOpname, OpnameRecord},
    password_reset::{CreatePasswordReset, PasswordReset, Redemption},
    product::{CreateProduct, Product, UpdateProduct},
    stock::{CreateMovement, MovementOutcome, StockBalance, StockTransaction, TransactionFilter},
    user::{CreateUser, User},
    warehouse::{CreateWarehouse, Warehouse},
};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub trait ProductRepository: Send + Sync {
    /// Fails with `Conflict` when the code is already taken.
    fn create(&self, input: CreateProduct) -> impl Future<Output = GudangResult<Product>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = GudangResult<Product>> + Send;
    fn update(
        &self,
        id: i64,
        input: UpdateProduct,
    ) -> impl Future<Output = GudangResult<Product>> + Send;
    /// Hard delete. Ledger, balance and opname rows are left in place.
    fn delete(&self, id: i64) -> impl Future<Output = GudangResult<()>> + Send;
    fn list(&self) -> impl Future<Output = GudangResult<Vec<Product>>> + Send;
}

pub trait WarehouseRepository: Send + Sync {
    fn create(
        &self,
        input: CreateWarehouse,
    ) -> impl Future<Output = GudangResult<Warehouse>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = GudangResult<Warehouse>> + Send;
    fn list(&self) -> impl Future<Output = GudangResult<Vec<Warehouse>>> + Send;
}

// ---------------------------------------------------------------------------
// Stock ledger
// ---------------------------------------------------------------------------

pub trait StockRepository: Send + Sync {
    /// Apply a movement to the (product, warehouse) balance and append the
    /// ledger entry in one store transaction.
    ///
    /// An outgoing movement larger than the balance fails with
    /// `InsufficientStock` and leaves no trace.
    fn record_movement(
        &self,
        input: CreateMovement,
    ) -> impl Future<Output = GudangResult<MovementOutcome>> + Send;

    /// Newest first.
    fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> impl Future<Output = GudangResult<Vec<StockTransaction>>> + Send;

    fn get_transaction(
        &self,
        id: i64,
    ) -> impl Future<Output = GudangResult<StockTransaction>> + Send;

    /// Sum of balances across every warehouse; zero when none exist.
    fn total_stock(&self, product_id: i64) -> impl Future<Output = GudangResult<i64>> + Send;

    fn list_balances(
        &self,
        product_id: Option<i64>,
    ) -> impl Future<Output = GudangResult<Vec<StockBalance>>> + Send;

    fn get_balance(&self, id: i64) -> impl Future<Output = GudangResult<StockBalance>> + Send;
}

// ---------------------------------------------------------------------------
// Opname
// ---------------------------------------------------------------------------

pub trait OpnameRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOpname,
    ) -> impl Future<Output = GudangResult<OpnameRecord>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = GudangResult<OpnameRecord>> + Send;
    /// Ordered by id ascending.
    fn list(
        &self,
        product_id: Option<i64>,
    ) -> impl Future<Output = GudangResult<Vec<OpnameRecord>>> + Send;
    /// Fails with `Conflict` if the record is already approved.
    fn approve(
        &self,
        id: i64,
        approver_id: i64,
    ) -> impl Future<Output = GudangResult<OpnameRecord>> + Send;
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Hashes the raw password before storage. Duplicate email → `Conflict`.
    fn create(&self, input: CreateUser) -> impl Future<Output = GudangResult<User>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = GudangResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = GudangResult<User>> + Send;
    fn delete(&self, id: i64) -> impl Future<Output = GudangResult<()>> + Send;
    fn list(&self) -> impl Future<Output = GudangResult<Vec<User>>> + Send;
}

pub trait PasswordResetRepository: Send + Sync {
    /// Store a new token, deleting every unused token for the same email in
    /// the same transaction.
    fn issue(
        &self,
        input: CreatePasswordReset,
    ) -> impl Future<Output = GudangResult<PasswordReset>> + Send;

    /// Mark the token used and, unless it expired before `now`, replace the
    /// owner's password, all in one store transaction.
    ///
    /// `NotFound` when the token is unknown, already used, or its user no
    /// longer exists; nothing is written in that case or on any failure.
    fn redeem(
        &self,
        token_hash: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> impl Future<Output = GudangResult<Redemption>> + Send;
}
