//! Opname service: records physical counts against the system count.
//!
//! Recording a count never changes balances or the ledger. Approval only
//! flags the record.

use gudang_core::error::{GudangError, GudangResult};
use gudang_core::models::opname::{CreateOpname, OpnameRecord};
use gudang_core::repository::{OpnameRepository, ProductRepository};
use tracing::info;

#[derive(Debug, Clone)]
pub struct OpnameInput {
    pub product_id: i64,
    pub system_stock: i64,
    pub physical_stock: i64,
    pub note: Option<String>,
}

/// Physical minus system. Negative means stock is missing.
pub fn variance(system_stock: i64, physical_stock: i64) -> i64 {
    physical_stock - system_stock
}

pub struct OpnameService<P: ProductRepository, O: OpnameRepository> {
    products: P,
    opnames: O,
}

impl<P: ProductRepository, O: OpnameRepository> OpnameService<P, O> {
    pub fn new(products: P, opnames: O) -> Self {
        Self { products, opnames }
    }

    pub async fn record(&self, user_id: i64, input: OpnameInput) -> GudangResult<OpnameRecord> {
        if input.system_stock < 0 || input.physical_stock < 0 {
            return Err(GudangError::validation(
                "system_stock and physical_stock must not be negative",
            ));
        }

        self.products.get_by_id(input.product_id).await?;

        let record = self
            .opnames
            .create(CreateOpname {
                product_id: input.product_id,
                system_stock: input.system_stock,
                physical_stock: input.physical_stock,
                variance: variance(input.system_stock, input.physical_stock),
                user_id,
                note: input.note.unwrap_or_default(),
            })
            .await?;

        info!(
            opname_id = record.id,
            product_id = record.product_id,
            variance = record.variance,
            user_id,
            "Opname recorded"
        );
        Ok(record)
    }

    pub async fn list(&self, product_id: Option<i64>) -> GudangResult<Vec<OpnameRecord>> {
        self.opnames.list(product_id).await
    }

    pub async fn get(&self, id: i64) -> GudangResult<OpnameRecord> {
        self.opnames.get_by_id(id).await
    }

    /// Mark a record approved. Role checks are the caller's concern.
    pub async fn approve(&self, id: i64, approver_id: i64) -> GudangResult<OpnameRecord> {
        let record = self.opnames.approve(id, approver_id).await?;
        info!(opname_id = id, approver_id, "Opname approved");
        Ok(record)
    }
}
