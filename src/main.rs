use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_recommender::{
    config::Config,
    data::{ensure_artifact, load_artifacts},
    routes::{create_router, AppState},
    services::{posters::omdb::OmdbProvider, PosterService, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let http_client = reqwest::Client::new();

    ensure_artifact(&http_client, &config.catalog_path, config.catalog_url.as_deref())
        .await
        .context("Failed to fetch catalog artifact")?;
    ensure_artifact(
        &http_client,
        &config.similarity_path,
        config.similarity_url.as_deref(),
    )
    .await
    .context("Failed to fetch similarity artifact")?;

    let (catalog, similarity) = load_artifacts(&config.catalog_path, &config.similarity_path)
        .context("Failed to load recommendation data")?;

    let recommender = Recommender::new(Arc::new(catalog), Arc::new(similarity))?
        .with_count_policy(config.count_policy);

    let provider = OmdbProvider::new(
        http_client,
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
    );
    let posters = PosterService::new(
        Arc::new(provider),
        config.poster_placeholder_url.clone(),
        Duration::from_millis(config.poster_timeout_ms),
        config.poster_concurrency,
    );

    let state = Arc::new(AppState {
        recommender,
        posters,
        default_recommendations: config.default_recommendations,
        max_recommendations: config.max_recommendations,
        loaded_at: Utc::now(),
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
