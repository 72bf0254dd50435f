use std::any::Any;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use crate::api::error::{ApiError, FORBIDDEN_ORIGIN, INTERNAL_ERROR};
use crate::server::AppState;

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let content_length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        method = %method,
        url = %uri,
        status = status,
        length = content_length,
        "HTTP request"
    );

    response
}

/// CORS for the admin-only routes: preflights are answered here, and only
/// the admin origin gets an `Access-Control-Allow-Origin` back.
pub fn admin_cors(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Browsers always send `Origin` on cross-origin requests; a foreign one
/// never reaches the handler. Requests without the header pass.
pub async fn require_admin_origin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        if origin != state.admin_origin {
            warn!(origin = ?origin, path = %req.uri().path(), "Rejected request from foreign origin");
            return ApiError::Forbidden(FORBIDDEN_ORIGIN.to_string()).into_response();
        }
    }
    next.run(req).await
}

/// Turns a handler panic into the generic 500 body.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");
    ApiError::Unexpected(INTERNAL_ERROR.to_string()).into_response()
}
