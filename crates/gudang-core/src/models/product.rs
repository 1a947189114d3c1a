//! Product (catalog item) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    /// Unique item code.
    pub code: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    /// Reorder threshold; informational only.
    pub min_stock: i64,
    pub weight_kg: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    #[serde(alias = "kode_barang")]
    pub code: String,
    #[serde(alias = "nama_barang")]
    pub name: String,
    #[serde(alias = "jenis_barang")]
    pub category: String,
    #[serde(alias = "satuan")]
    pub unit: String,
    #[serde(default, alias = "stok_minimal")]
    pub min_stock: i64,
    #[serde(default, alias = "berat_kg")]
    pub weight_kg: f64,
}

/// Partial update: `Some` overwrites (including zero), `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateProduct {
    #[serde(default, alias = "kode_barang")]
    pub code: Option<String>,
    #[serde(default, alias = "nama_barang")]
    pub name: Option<String>,
    #[serde(default, alias = "jenis_barang")]
    pub category: Option<String>,
    #[serde(default, alias = "satuan")]
    pub unit: Option<String>,
    #[serde(default, alias = "stok_minimal")]
    pub min_stock: Option<i64>,
    #[serde(default, alias = "berat_kg")]
    pub weight_kg: Option<f64>,
}

impl UpdateProduct {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.name.is_none()
            && self.category.is_none()
            && self.unit.is_none()
            && self.min_stock.is_none()
            && self.weight_kg.is_none()
    }
}

/// Aggregate stock of one product across every warehouse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductStock {
    pub product_id: i64,
    pub product_name: String,
    pub total_stock: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_with_zero_value_is_not_empty() {
        assert!(UpdateProduct::default().is_empty());
        let patch = UpdateProduct {
            min_stock: Some(0),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
