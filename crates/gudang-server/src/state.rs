//! Shared application state handed to every handler.

use std::sync::Arc;

use gudang_auth::{AuthConfig, AuthService, ConfiguredMailer};
use gudang_db::DbManager;
use gudang_db::repository::{
    SqliteOpnameRepository, SqlitePasswordResetRepository, SqliteProductRepository,
    SqliteStockRepository, SqliteUserRepository, SqliteWarehouseRepository,
};
use gudang_stock::{CatalogService, LedgerService, OpnameService};

pub type Auth = AuthService<SqliteUserRepository, SqlitePasswordResetRepository, ConfiguredMailer>;
pub type Catalog = CatalogService<SqliteProductRepository, SqliteWarehouseRepository>;
pub type Ledger =
    LedgerService<SqliteProductRepository, SqliteWarehouseRepository, SqliteStockRepository>;
pub type Opnames = OpnameService<SqliteProductRepository, SqliteOpnameRepository>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbManager,
    pub auth: Arc<Auth>,
    pub catalog: Arc<Catalog>,
    pub ledger: Arc<Ledger>,
    pub opnames: Arc<Opnames>,
}

impl AppState {
    /// Wire the SQLite repositories behind each service.
    pub fn new(db: DbManager, auth_config: AuthConfig, mailer: ConfiguredMailer) -> Self {
        let pool = db.pool().clone();
        let (users, resets) = match auth_config.pepper.clone() {
            Some(pepper) => (
                SqliteUserRepository::with_pepper(pool.clone(), pepper.clone()),
                SqlitePasswordResetRepository::with_pepper(pool.clone(), pepper),
            ),
            None => (
                SqliteUserRepository::new(pool.clone()),
                SqlitePasswordResetRepository::new(pool.clone()),
            ),
        };
        let auth = AuthService::new(
            users,
            resets,
            mailer,
            auth_config,
        );
        let catalog = CatalogService::new(
            SqliteProductRepository::new(pool.clone()),
            SqliteWarehouseRepository::new(pool.clone()),
        );
        let ledger = LedgerService::new(
            SqliteProductRepository::new(pool.clone()),
            SqliteWarehouseRepository::new(pool.clone()),
            SqliteStockRepository::new(pool.clone()),
        );
        let opnames = OpnameService::new(
            SqliteProductRepository::new(pool.clone()),
            SqliteOpnameRepository::new(pool),
        );

        Self {
            db,
            auth: Arc::new(auth),
            catalog: Arc::new(catalog),
            ledger: Arc::new(ledger),
            opnames: Arc::new(opnames),
        }
    }
}
