use axum::{extract::State, middleware, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    models::HealthResponse,
    services::{PosterService, Recommender},
};

pub mod movies;
pub mod recommendations;

/// Shared application state
///
/// Everything here is immutable after startup.
pub struct AppState {
    pub recommender: Recommender,
    pub posters: PosterService,
    pub default_recommendations: usize,
    pub max_recommendations: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(movies::list))
        .route("/recommendations", get(recommendations::recommend))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        movies: state.recommender.catalog().len(),
        loaded_at: state.loaded_at,
    })
}
