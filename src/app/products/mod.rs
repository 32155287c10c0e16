//! 产品资源：`/api/products`

pub mod handler;
pub mod model;
pub mod repository;
pub mod rules;

use axum::{
    routing::{get, MethodRouter},
    Router,
};

use handler::AppState;

/// 集合路由，同时挂在 `/api/products` 和 `/api/products/`
pub fn collection() -> MethodRouter<AppState> {
    get(handler::get_products).post(handler::create_product)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", collection())
        .route(
            "/:id",
            get(handler::get_product_by_id)
                .put(handler::update_product)
                .patch(handler::update_availability)
                .delete(handler::delete_product),
        )
}
