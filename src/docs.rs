//! OpenAPI 文档
//!
//! `GET /docs/openapi.json` 返回由处理器注解生成的文档，`GET /docs` 用 Swagger UI 展示。

use axum::{
    response::{Html, Json},
    routing::get,
    Router,
};
use utoipa::{OpenApi, ToSchema};

use crate::app::{
    products::{
        handler,
        model::{NewProduct, Product, ProductChanges, ProductSummary},
    },
    AppState,
};
use crate::core::{
    error::{ErrorResponse, ValidationErrorResponse},
    validation::{FieldError, Location},
};

/// `{data: Product}`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProductResponse {
    pub data: Product,
}

/// `{data: ProductSummary}`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProductSummaryResponse {
    pub data: ProductSummary,
}

/// `{data: [ProductSummary]}`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProductListResponse {
    pub data: Vec<ProductSummary>,
}

/// `{data: "Product deleted"}`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct MessageResponse {
    #[schema(example = "Product deleted")]
    pub data: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product API",
        description = "REST API for managing products"
    ),
    paths(
        handler::get_products,
        handler::get_product_by_id,
        handler::create_product,
        handler::update_product,
        handler::update_availability,
        handler::delete_product
    ),
    components(schemas(
        Product,
        ProductSummary,
        NewProduct,
        ProductChanges,
        FieldError,
        Location,
        ErrorResponse,
        ValidationErrorResponse,
        ProductResponse,
        ProductSummaryResponse,
        ProductListResponse,
        MessageResponse
    )),
    tags((name = "Products", description = "Product management"))
)]
pub struct ApiDoc;

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <title>Product API - Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({ url: "/docs/openapi.json", dom_id: "#swagger-ui" });
        };
    </script>
</body>
</html>
"##;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/docs", get(swagger_ui))
        .route("/docs/openapi.json", get(openapi_json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_product_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/products"));
        assert!(paths.contains_key("/api/products/{id}"));

        let schemas = doc.components.as_ref().map(|c| &c.schemas).unwrap();
        assert!(schemas.contains_key("Product"));
        assert!(schemas.contains_key("ValidationErrorResponse"));
    }

    #[test]
    fn test_swagger_page_loads_document() {
        assert!(SWAGGER_UI.contains(r#"url: "/docs/openapi.json""#));
        assert!(SWAGGER_UI.contains(r##"dom_id: "#swagger-ui""##));
        assert!(SWAGGER_UI.trim_end().ends_with("</html>"));
    }
}
