//! SQLite repository implementations.

mod opname;
mod password_reset;
mod product;
mod stock;
mod user;
mod warehouse;

pub use opname::SqliteOpnameRepository;
pub use password_reset::SqlitePasswordResetRepository;
pub use product::SqliteProductRepository;
pub use stock::SqliteStockRepository;
pub use user::{SqliteUserRepository, hash_password};
pub use warehouse::SqliteWarehouseRepository;
