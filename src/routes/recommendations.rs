use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationResponse, RecommendedMovie},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub count: Option<usize>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let count = query.count.unwrap_or(state.default_recommendations);

    if query.title.trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "title cannot be empty".to_string(),
        ));
    }
    if count < 1 || count > state.max_recommendations {
        return Err(AppError::InvalidArgument(format!(
            "count must be between 1 and {}",
            state.max_recommendations
        )));
    }

    tracing::info!(
        request_id = %request_id,
        title = %query.title,
        count,
        "Processing recommendation request"
    );

    let ranked = state.recommender.recommend_scored(&query.title, count)?;
    let titles: Vec<String> = ranked.iter().map(|r| r.title.clone()).collect();
    let posters = state.posters.posters_for(&titles).await;

    let recommendations: Vec<RecommendedMovie> = ranked
        .into_iter()
        .zip(posters)
        .map(|(rec, poster)| RecommendedMovie {
            title: rec.title,
            score: rec.score,
            poster_url: poster.url,
            placeholder: poster.placeholder,
        })
        .collect();

    tracing::info!(
        request_id = %request_id,
        returned = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationResponse {
        title: query.title,
        count: recommendations.len(),
        recommendations,
    }))
}
