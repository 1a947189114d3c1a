//! Gudang stock — catalog management, the stock ledger and opname
//! reconciliation.
//!
//! Services are generic over the `gudang-core` repository traits.

pub mod catalog;
pub mod ledger;
pub mod opname;

pub use catalog::CatalogService;
pub use ledger::{LedgerService, MovementInput};
pub use opname::{OpnameInput, OpnameService, variance};
