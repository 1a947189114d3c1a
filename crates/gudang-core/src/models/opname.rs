//! Opname (physical stock count reconciliation) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpnameRecord {
    pub id: i64,
    pub product_id: i64,
    pub system_stock: i64,
    pub physical_stock: i64,
    /// `physical_stock - system_stock`.
    pub variance: i64,
    pub user_id: i64,
    pub note: String,
    pub approved: bool,
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOpname {
    pub product_id: i64,
    pub system_stock: i64,
    pub physical_stock: i64,
    pub variance: i64,
    pub user_id: i64,
    pub note: String,
}
