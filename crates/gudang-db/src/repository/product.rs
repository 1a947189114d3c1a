//! SQLite implementation of [`ProductRepository`].

use chrono::{DateTime, Utc};
use gudang_core::error::GudangResult;
use gudang_core::models::product::{CreateProduct, Product, UpdateProduct};
use gudang_core::repository::ProductRepository;
use sqlx::SqlitePool;

use crate::error::DbError;

const COLUMNS: &str =
    "id, code, name, category, unit, min_stock, weight_kg, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    code: String,
    name: String,
    category: String,
    unit: String,
    min_stock: i64,
    weight_kg: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: self.id,
            code: self.code,
            name: self.name,
            category: self.category,
            unit: self.unit,
            min_stock: self.min_stock,
            weight_kg: self.weight_kg,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const DUPLICATE_CODE: &str = "product code already exists";

/// SQLite implementation of the Product repository.
#[derive(Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for SqliteProductRepository {
    async fn create(&self, input: CreateProduct) -> GudangResult<Product> {
        let now = Utc::now();

        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products \
             (code, name, category, unit, min_stock, weight_kg, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(input.code)
        .bind(input.name)
        .bind(input.category)
        .bind(input.unit)
        .bind(input.min_stock)
        .bind(input.weight_kg)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::unique_violation(e, "product", DUPLICATE_CODE))?;

        Ok(row.into_product())
    }

    async fn get_by_id(&self, id: i64) -> GudangResult<Product> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM products WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::from)?;

        let row = row.ok_or_else(|| DbError::not_found("product", id))?;
        Ok(row.into_product())
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> GudangResult<Product> {
        let mut sets = Vec::new();
        if input.code.is_some() {
            sets.push("code = ?");
        }
        if input.name.is_some() {
            sets.push("name = ?");
        }
        if input.category.is_some() {
            sets.push("category = ?");
        }
        if input.unit.is_some() {
            sets.push("unit = ?");
        }
        if input.min_stock.is_some() {
            sets.push("min_stock = ?");
        }
        if input.weight_kg.is_some() {
            sets.push("weight_kg = ?");
        }
        sets.push("updated_at = ?");

        let query = format!(
            "UPDATE products SET {} WHERE id = ? RETURNING {COLUMNS}",
            sets.join(", ")
        );

        // Bind order must follow the SET list above.
        let mut builder = sqlx::query_as::<_, ProductRow>(&query);
        if let Some(code) = input.code {
            builder = builder.bind(code);
        }
        if let Some(name) = input.name {
            builder = builder.bind(name);
        }
        if let Some(category) = input.category {
            builder = builder.bind(category);
        }
        if let Some(unit) = input.unit {
            builder = builder.bind(unit);
        }
        if let Some(min_stock) = input.min_stock {
            builder = builder.bind(min_stock);
        }
        if let Some(weight_kg) = input.weight_kg {
            builder = builder.bind(weight_kg);
        }

        let row = builder
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::unique_violation(e, "product", DUPLICATE_CODE))?;

        let row = row.ok_or_else(|| DbError::not_found("product", id))?;
        Ok(row.into_product())
    }

    async fn delete(&self, id: i64) -> GudangResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", id).into());
        }
        Ok(())
    }

    async fn list(&self) -> GudangResult<Vec<Product>> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM products ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(DbError::from)?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }
}
