//! Route configuration for the Prixli edge server.

use crate::{
    error::EdgeError,
    middleware::GateLayer,
    state::AppState,
};
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

/// Create the main application router.
///
/// The gate layer wraps everything; statically excluded paths and the
/// `/internal` endpoints are skipped inside the layer itself.
pub fn create_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    // Common middleware stack applied to all routes
    let common_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new());

    Router::new()
        // Internal routes (health, readiness)
        .route("/internal/health", get(health_handler))
        // Everything else is gated, then forwarded upstream
        .fallback(proxy_handler)
        .layer(GateLayer::new(state.gate.clone()))
        .layer(common_middleware)
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn proxy_handler(
    State(state): State<AppState>,
    req: Request<Body>,
) -> Result<Response, EdgeError> {
    state.proxy.forward(req).await
}
