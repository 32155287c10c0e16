//! 数据库基础设施

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Error,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        name         TEXT    NOT NULL CHECK (name <> ''),
        price        REAL    NOT NULL CHECK (price > 0),
        availability INTEGER NOT NULL DEFAULT 1,
        created_at   TEXT    NOT NULL,
        updated_at   TEXT    NOT NULL
    )
"#;

pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

        // 内存数据库随连接关闭而消失
        if config.is_in_memory() {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        info!(
            max_connections = config.max_connections,
            in_memory = config.is_in_memory(),
            "Connected to database"
        );

        Ok(Self { pool })
    }

    /// 创建缺失的表，可重复执行
    pub async fn sync_schema(&self) -> Result<(), Error> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(&self.pool)
            .await?;

        info!("Database schema synchronized");
        Ok(())
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sync_schema_is_idempotent() {
        let db = DatabaseManager::connect(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        db.sync_schema().await.unwrap();
        db.sync_schema().await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(db.get_pool())
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_check_constraints_hold() {
        let db = DatabaseManager::connect(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        db.sync_schema().await.unwrap();

        let result = sqlx::query(
            "INSERT INTO products (name, price, created_at, updated_at) VALUES ('Cable', 0, '', '')",
        )
        .execute(db.get_pool())
        .await;
        assert!(result.is_err());

        let result = sqlx::query(
            "INSERT INTO products (name, price, created_at, updated_at) VALUES ('', 10, '', '')",
        )
        .execute(db.get_pool())
        .await;
        assert!(result.is_err());
    }
}
