//! Domain models for gudang.
//!
//! These are the core types shared across all crates. Identifiers are
//! store-assigned 64-bit integers, timestamps are UTC.

pub mod opname;
pub mod password_reset;
pub mod product;
pub mod stock;
pub mod user;
pub mod warehouse;
