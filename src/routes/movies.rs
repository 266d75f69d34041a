use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{data::CatalogEntry, routes::AppState};

/// Handler listing the catalog in position order
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogEntry>> {
    Json(state.recommender.catalog().entries().collect())
}
