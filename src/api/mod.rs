//! HTTP facade.
//!
//! Thin axum layer over the store, the query layer, and the upstream
//! clients. Handlers return `Result<_, AppError>`; the error type renders
//! itself, so failure mapping lives in one place.

pub mod handlers;
pub mod icons;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::error::AppError;
use crate::pipeline::Hydrator;
use crate::services::{BlizzardClient, WowheadClient};
use crate::storage::SetStore;
use icons::IconCache;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SetStore>,
    pub blizzard: Arc<BlizzardClient>,
    pub wowhead: Arc<WowheadClient>,
    pub hydrator: Arc<Hydrator>,
    pub icons: Arc<IconCache>,
}

/// Build the application router.
pub fn router(state: AppState, frontend_url: Option<&str>) -> Router {
    let cors = cors_layer(frontend_url);

    Router::new()
        .route("/api/transmogs", get(handlers::list_sets))
        .route("/api/transmogs/filters", get(handlers::filter_options))
        .route("/api/transmogs/batch", get(handlers::batch_sets))
        .route("/api/transmogs/{id}", get(handlers::set_detail))
        .route("/api/health", get(handlers::health))
        .route("/api/cache/clear", post(handlers::clear_cache))
        .layer(cors)
        .with_state(state)
}

/// Restrict CORS to the configured frontend origin; permissive when unset
/// or unparseable.
fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = frontend_url.and_then(|url| url.parse::<HeaderValue>().ok());
    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, axum::Json(json!({ "error": message }))).into_response()
            }
            other => {
                log::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({
                        "error": "Internal server error",
                        "message": other.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}
