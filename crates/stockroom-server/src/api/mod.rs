//! HTTP surface
//!
//! [`create_router`] assembles the full application: `/health` at the root,
//! every feature under `/api/v1`, and the middleware stack.

pub mod response;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::error::AppError;
use crate::features::{self, FeatureState};
use crate::middleware;
use crate::store::Stores;

/// API version prefix
pub const API_PREFIX: &str = "/api/v1";

/// Create the application router with all routes and middleware
pub fn create_router(stores: Stores, config: &Config) -> Router {
    let feature_routes = features::router(FeatureState {
        stores: stores.clone(),
        upload: config.upload.clone(),
    });

    Router::new()
        .route("/health", get(health_check))
        .with_state(stores)
        .nest(API_PREFIX, feature_routes)
        .fallback(route_not_found)
        // Apply layers from innermost to outermost
        .layer(DefaultBodyLimit::max(config.upload.max_bytes))
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(stores): State<Stores>) -> Response {
    match stores.products.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "store": "connected"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Store health check failed: {:?}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "store": "unreachable"
                })),
            )
                .into_response()
        },
    }
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
