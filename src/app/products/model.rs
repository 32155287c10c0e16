//! 产品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 完整的产品记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Monitor 32 inches")]
    pub name: String,
    #[schema(example = 300)]
    pub price: f64,
    #[schema(example = true)]
    pub availability: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// 整体替换可变字段
    pub fn apply(&mut self, changes: ProductChanges) {
        self.name = changes.name;
        self.price = changes.price;
        self.availability = changes.availability;
    }

    pub fn toggle_availability(&mut self) {
        self.availability = !self.availability;
    }
}

/// 列表和详情返回的记录，不含时间戳
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ProductSummary {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Monitor 32 inches")]
    pub name: String,
    #[schema(example = 300)]
    pub price: f64,
    #[schema(example = true)]
    pub availability: bool,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            availability: product.availability,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductId(pub i64);

/// 创建请求
#[derive(Debug, Clone, PartialEq, ToSchema)]
pub struct NewProduct {
    #[schema(example = "Monitor 32 inches")]
    pub name: String,
    #[schema(example = 300)]
    pub price: f64,
}

/// 更新请求体
#[derive(Debug, Clone, PartialEq, ToSchema)]
pub struct ProductChanges {
    #[schema(example = "Monitor 32 inches")]
    pub name: String,
    #[schema(example = 300)]
    pub price: f64,
    #[schema(example = true)]
    pub availability: bool,
}

/// 更新请求：路径中的 id 加请求体
#[derive(Debug, Clone, PartialEq)]
pub struct ProductReplacement {
    pub id: ProductId,
    pub changes: ProductChanges,
}
