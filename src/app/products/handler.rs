//! 产品处理器

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::SqlitePool;
use tracing::info;

use super::{
    model::{NewProduct, Product, ProductId, ProductReplacement, ProductSummary},
    repository::{ProductRepository, SortOrder},
};
use crate::core::{error::ApiError, response::ApiResponse, validation::Validated};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const PRODUCT_DELETED: &str = "Product deleted";

#[derive(Clone)]
pub struct AppState {
    pub products: ProductRepository,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }
}

async fn find_product(state: &AppState, id: i64) -> Result<Product, ApiError> {
    state
        .products
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

/// Get a list of products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "Products ordered by id, newest first", body = crate::docs::ProductListResponse)
    )
)]
pub async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductSummary>>>, ApiError> {
    let products = state.products.list(SortOrder::Desc).await?;
    Ok(Json(ApiResponse::success(products)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "The ID of the product to retrieve")),
    responses(
        (status = 200, description = "Successful response", body = crate::docs::ProductSummaryResponse),
        (status = 400, description = "Bad request - invalid ID", body = crate::core::error::ValidationErrorResponse),
        (status = 404, description = "Product not found", body = crate::core::error::ErrorResponse)
    )
)]
pub async fn get_product_by_id(
    State(state): State<AppState>,
    Validated(ProductId(id)): Validated<ProductId>,
) -> Result<Json<ApiResponse<ProductSummary>>, ApiError> {
    let product = find_product(&state, id).await?;
    Ok(Json(ApiResponse::success(product.into())))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = crate::docs::ProductResponse),
        (status = 400, description = "Bad request - invalid input data", body = crate::core::error::ValidationErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Validated(new_product): Validated<NewProduct>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    let product = state.products.create(&new_product).await?;
    info!("Created product: {} ({})", product.name, product.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

/// Replace a product with user input
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "The ID of the product to update")),
    request_body = crate::app::products::model::ProductChanges,
    responses(
        (status = 200, description = "Product updated", body = crate::docs::ProductResponse),
        (status = 400, description = "Bad request - invalid ID or input data", body = crate::core::error::ValidationErrorResponse),
        (status = 404, description = "Product not found", body = crate::core::error::ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Validated(replacement): Validated<ProductReplacement>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let mut product = find_product(&state, replacement.id.0).await?;
    product.apply(replacement.changes);

    let product = state.products.save(&product).await?;
    info!("Updated product: {} ({})", product.name, product.id);

    Ok(Json(ApiResponse::success(product)))
}

/// Toggle product availability
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "The ID of the product to update")),
    responses(
        (status = 200, description = "Availability toggled", body = crate::docs::ProductResponse),
        (status = 400, description = "Bad request - invalid ID", body = crate::core::error::ValidationErrorResponse),
        (status = 404, description = "Product not found", body = crate::core::error::ErrorResponse)
    )
)]
pub async fn update_availability(
    State(state): State<AppState>,
    Validated(ProductId(id)): Validated<ProductId>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let mut product = find_product(&state, id).await?;
    product.toggle_availability();

    let product = state.products.save(&product).await?;
    info!(
        "Product {} availability set to {}",
        product.id, product.availability
    );

    Ok(Json(ApiResponse::success(product)))
}

/// Delete a product by ID
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "The ID of the product to delete")),
    responses(
        (status = 200, description = "Confirmation message", body = crate::docs::MessageResponse),
        (status = 400, description = "Bad request - invalid ID", body = crate::core::error::ValidationErrorResponse),
        (status = 404, description = "Product not found", body = crate::core::error::ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Validated(ProductId(id)): Validated<ProductId>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    let product = find_product(&state, id).await?;
    state.products.delete(&product).await?;
    info!("Deleted product: {}", id);

    Ok(Json(ApiResponse::success(PRODUCT_DELETED)))
}
