//! # 产品管理 REST API
//!
//! 对单一 `Product` 资源提供增删改查，分层如下：
//! - `app`: 路由、处理器、校验规则与仓储
//! - `core`: 错误、响应、中间件与请求校验
//! - `infrastructure`: 数据库连接与日志
//! - `config` / `docs`: 配置加载与 OpenAPI 文档

pub mod app;
pub mod config;
pub mod core;
pub mod docs;
pub mod infrastructure;

use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use app::AppState;
use config::{ConfigError, HttpConfig};
use crate::core::middleware::{origin_guard, request_logging_middleware, AllowedOrigin};

/// 组装完整的应用路由和中间件
pub fn create_app(state: AppState, http: &HttpConfig) -> Result<Router, ConfigError> {
    let origin = AllowedOrigin::new(&http.frontend_url).map_err(|_| {
        ConfigError::Validation(format!("invalid frontend_url: {}", http.frontend_url))
    })?;

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(origin.cors_layer())
        .layer(middleware::from_fn_with_state(origin, origin_guard));

    Ok(Router::new()
        .nest("/api/products", app::products::routes())
        .route("/api/products/", app::products::collection())
        .merge(docs::routes())
        .layer(layers)
        .with_state(state))
}
