//! Catalog service: products and warehouses.

use gudang_core::error::{GudangError, GudangResult};
use gudang_core::models::product::{CreateProduct, Product, UpdateProduct};
use gudang_core::models::warehouse::{CreateWarehouse, Warehouse};
use gudang_core::repository::{ProductRepository, WarehouseRepository};
use tracing::{debug, info};

pub struct CatalogService<P: ProductRepository, W: WarehouseRepository> {
    products: P,
    warehouses: W,
}

impl<P: ProductRepository, W: WarehouseRepository> CatalogService<P, W> {
    pub fn new(products: P, warehouses: W) -> Self {
        Self {
            products,
            warehouses,
        }
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    pub async fn create_product(&self, input: CreateProduct) -> GudangResult<Product> {
        let input = validate_create(input)?;
        let product = self.products.create(input).await?;
        info!(product_id = product.id, code = %product.code, "Product created");
        Ok(product)
    }

    pub async fn update_product(&self, id: i64, input: UpdateProduct) -> GudangResult<Product> {
        let input = validate_update(input)?;
        if input.is_empty() {
            debug!(product_id = id, "Empty product patch; only updated_at changes");
        }
        let product = self.products.update(id, input).await?;
        info!(product_id = product.id, "Product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, id: i64) -> GudangResult<()> {
        self.products.delete(id).await?;
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    pub async fn get_product(&self, id: i64) -> GudangResult<Product> {
        self.products.get_by_id(id).await
    }

    pub async fn list_products(&self) -> GudangResult<Vec<Product>> {
        self.products.list().await
    }

    // -----------------------------------------------------------------------
    // Warehouses
    // -----------------------------------------------------------------------

    pub async fn create_warehouse(&self, input: CreateWarehouse) -> GudangResult<Warehouse> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(GudangError::validation("name is required"));
        }
        let warehouse = self
            .warehouses
            .create(CreateWarehouse {
                name: name.to_string(),
            })
            .await?;
        info!(warehouse_id = warehouse.id, "Warehouse created");
        Ok(warehouse)
    }

    pub async fn get_warehouse(&self, id: i64) -> GudangResult<Warehouse> {
        self.warehouses.get_by_id(id).await
    }

    pub async fn list_warehouses(&self) -> GudangResult<Vec<Warehouse>> {
        self.warehouses.list().await
    }
}

fn required(field: &str, value: String) -> GudangResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(GudangError::validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

fn non_negative(field: &str, value: i64) -> GudangResult<i64> {
    if value < 0 {
        Err(GudangError::validation(format!("{field} must not be negative")))
    } else {
        Ok(value)
    }
}

fn valid_weight(value: f64) -> GudangResult<f64> {
    if !value.is_finite() || value < 0.0 {
        Err(GudangError::validation("weight_kg must be a non-negative number"))
    } else {
        Ok(value)
    }
}

fn validate_create(input: CreateProduct) -> GudangResult<CreateProduct> {
    Ok(CreateProduct {
        code: required("code", input.code)?,
        name: required("name", input.name)?,
        category: required("category", input.category)?,
        unit: required("unit", input.unit)?,
        min_stock: non_negative("min_stock", input.min_stock)?,
        weight_kg: valid_weight(input.weight_kg)?,
    })
}

/// Present text fields must not be blank; absent fields stay absent.
fn validate_update(input: UpdateProduct) -> GudangResult<UpdateProduct> {
    Ok(UpdateProduct {
        code: input.code.map(|v| required("code", v)).transpose()?,
        name: input.name.map(|v| required("name", v)).transpose()?,
        category: input.category.map(|v| required("category", v)).transpose()?,
        unit: input.unit.map(|v| required("unit", v)).transpose()?,
        min_stock: input
            .min_stock
            .map(|v| non_negative("min_stock", v))
            .transpose()?,
        weight_kg: input.weight_kg.map(valid_weight).transpose()?,
    })
}
