//! Stock ledger domain models: per-warehouse balances and the append-only
//! movement log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "masuk")]
    In,
    #[serde(alias = "keluar")]
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" | "masuk" => Ok(Direction::In),
            "out" | "keluar" => Ok(Direction::Out),
            other => Err(format!("invalid direction: {other} (expected 'in' or 'out')")),
        }
    }
}

/// Quantity of one product held in one warehouse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockBalance {
    pub id: i64,
    pub product_id: i64,
    pub warehouse_id: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ledger entry. Never updated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockTransaction {
    pub id: i64,
    pub product_id: i64,
    pub warehouse_id: i64,
    pub user_id: i64,
    pub direction: Direction,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMovement {
    pub product_id: i64,
    pub warehouse_id: i64,
    pub user_id: i64,
    pub direction: Direction,
    pub quantity: i64,
}

/// Result of a committed movement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovementOutcome {
    pub transaction: StockTransaction,
    pub new_balance: i64,
}

/// Filter for ledger queries. Empty filter matches every entry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub product_id: Option<i64>,
    pub direction: Option<Direction>,
}
