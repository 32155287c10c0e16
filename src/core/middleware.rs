//! 核心中间件模块

use axum::{
    extract::{Request, State},
    http::{
        header::{CONTENT_TYPE, ORIGIN},
        HeaderName, HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;

pub const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let mut response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID, value);
    }

    info!(
        %request_id,
        "{} {} {} - {}ms",
        method,
        uri,
        status.as_u16(),
        duration.as_millis()
    );

    response
}

/// 允许跨域访问的唯一前端来源
#[derive(Debug, Clone)]
pub struct AllowedOrigin(HeaderValue);

impl AllowedOrigin {
    pub fn new(origin: &str) -> Result<Self, axum::http::header::InvalidHeaderValue> {
        // 浏览器发送的 Origin 不带结尾斜杠
        HeaderValue::from_str(origin.trim_end_matches('/')).map(Self)
    }

    pub fn matches(&self, origin: &HeaderValue) -> bool {
        *origin == self.0
    }

    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.0.clone())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([CONTENT_TYPE])
    }
}

/// 拒绝来源不匹配的跨域请求；没有 Origin 头的请求直接放行
pub async fn origin_guard(
    State(allowed): State<AllowedOrigin>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(origin) = req.headers().get(ORIGIN) {
        if !allowed.matches(origin) {
            let origin = String::from_utf8_lossy(origin.as_bytes()).into_owned();
            return Err(ApiError::OriginNotAllowed(origin));
        }
    }

    Ok(next.run(req).await)
}
