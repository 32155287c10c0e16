//! 产品仓储：对 `products` 表的增删改查

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::model::{NewProduct, Product, ProductSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 按 id 排序列出所有产品
    pub async fn list(&self, order: SortOrder) -> Result<Vec<ProductSummary>, sqlx::Error> {
        let sql = match order {
            SortOrder::Asc => "SELECT id, name, price, availability FROM products ORDER BY id ASC",
            SortOrder::Desc => "SELECT id, name, price, availability FROM products ORDER BY id DESC",
        };

        let products = sqlx::query_as::<_, ProductSummary>(sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), ?order, "Listed products");
        Ok(products)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price, availability, created_at, updated_at FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// availability 使用表的默认值
    pub async fn create(&self, new_product: &NewProduct) -> Result<Product, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, price, availability, created_at, updated_at
            "#,
        )
        .bind(&new_product.name)
        .bind(new_product.price)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// 写回可变字段并刷新 updated_at
    pub async fn save(&self, product: &Product) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = ?, price = ?, availability = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, price, availability, created_at, updated_at
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.availability)
        .bind(Utc::now())
        .bind(product.id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn delete(&self, product: &Product) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(product.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
