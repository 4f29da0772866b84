//! HTTP routes and the middleware stack around them.

pub mod health;
pub mod waitlist;

use std::any::Any;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Requests handled at once before new ones wait for a slot.
const MAX_IN_FLIGHT: usize = 256;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    // CORS — the landing page form posts from the browser.
    let allow_origin = config
        .cors_origin
        .clone()
        .map_or_else(AllowOrigin::any, AllowOrigin::exact);

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(waitlist::router())
        .merge(health::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(in_flight_limit(MAX_IN_FLIGHT))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

/// Cap on requests in flight across every route.
///
/// `Router::layer` wraps each route separately, so the semaphore has to be
/// shared by the layer rather than created per service.
pub fn in_flight_limit(max: usize) -> GlobalConcurrencyLimitLayer {
    GlobalConcurrencyLimitLayer::new(max)
}

/// Turn a handler panic into the generic 500 body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}
