//! PostgreSQL store backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::StoreBackend;
use catalog_shared::{Product, ProductStatus, ProductUpdate};

const SELECT_COLUMNS: &str = "id, sku, name, description, price, category, status, \
     created_at, updated_at, deleted_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    sku: String,
    name: String,
    description: Option<String>,
    price: f64,
    category: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, StoreError> {
        let status = ProductStatus::parse(&self.status)
            .ok_or_else(|| StoreError::decode(format!("Unknown product status: {}", self.status)))?;

        Ok(Product {
            id: self.id,
            sku: self.sku,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

/// PostgreSQL storage backend for the product store.
pub struct PostgresBackend {
    pool: sqlx::Pool<Postgres>,
}

impl PostgresBackend {
    /// Create a new backend connected to the database.
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await?;

        Ok(PostgresBackend { pool })
    }
}

#[async_trait]
impl StoreBackend for PostgresBackend {
    async fn insert(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products \
             (id, sku, name, description, price, category, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.status.as_str())
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, id: &Uuid) -> Result<Option<Product>, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE id = $1 AND deleted_at IS NULL",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE sku = $1 AND deleted_at IS NULL",
            SELECT_COLUMNS
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    async fn update(&self, id: &Uuid, changes: &ProductUpdate) -> Result<bool, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE products SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(sku) = &changes.sku {
            builder.push(", sku = ");
            builder.push_bind(sku);
        }
        if let Some(name) = &changes.name {
            builder.push(", name = ");
            builder.push_bind(name);
        }
        if let Some(description) = &changes.description {
            builder.push(", description = ");
            builder.push_bind(description);
        }
        if let Some(price) = changes.price {
            builder.push(", price = ");
            builder.push_bind(price);
        }
        if let Some(category) = &changes.category {
            builder.push(", category = ");
            builder.push_bind(category);
        }
        if let Some(status) = changes.status {
            builder.push(", status = ");
            builder.push_bind(status.as_str());
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" AND deleted_at IS NULL");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = $1, updated_at = $1 \
             WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<Vec<Product>, StoreError> {
        let offset = (page.saturating_sub(1) as i64) * per_page as i64;

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE deleted_at IS NULL \
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }
}
