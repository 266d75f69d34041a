//! Poster lookup
//!
//! A `PosterProvider` talks to a movie-metadata API and reports every failure as
//! an error. `PosterService` sits in front of it: it bounds each lookup with a
//! timeout, fans lookups for a whole recommendation list out concurrently, and
//! turns any failure into the placeholder image so the recommendation itself
//! always succeeds.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::{error::AppResult, models::Poster};

pub mod omdb;

/// Trait for poster metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Resolve a title to a poster URL
    ///
    /// `Ok(None)` means the provider answered but has no usable poster.
    async fn fetch_poster(&self, title: &str) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

#[derive(Clone)]
pub struct PosterService {
    provider: Arc<dyn PosterProvider>,
    placeholder_url: String,
    timeout: Duration,
    concurrency: usize,
}

impl PosterService {
    pub fn new(
        provider: Arc<dyn PosterProvider>,
        placeholder_url: String,
        timeout: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            provider,
            placeholder_url,
            timeout,
            concurrency: concurrency.max(1),
        }
    }

    /// Poster for one title, falling back to the placeholder on any failure
    pub async fn poster_for(&self, title: &str) -> Poster {
        let outcome = tokio::time::timeout(self.timeout, self.provider.fetch_poster(title)).await;

        match outcome {
            Ok(Ok(Some(url))) => {
                return Poster {
                    title: title.to_string(),
                    url,
                    placeholder: false,
                }
            }
            Ok(Ok(None)) => {
                tracing::debug!(title = %title, provider = self.provider.name(), "No poster available");
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    title = %title,
                    provider = self.provider.name(),
                    error = %e,
                    "Poster lookup failed"
                );
            }
            Err(_) => {
                tracing::warn!(
                    title = %title,
                    provider = self.provider.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Poster lookup timed out"
                );
            }
        }

        self.placeholder(title)
    }

    /// Posters for several titles, looked up concurrently, returned in input order
    pub async fn posters_for(&self, titles: &[String]) -> Vec<Poster> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = Vec::with_capacity(titles.len());

        for title in titles {
            let service = self.clone();
            let semaphore = semaphore.clone();
            let title = title.clone();
            let task = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                service.poster_for(&title).await
            });
            tasks.push(task);
        }

        let mut posters = Vec::with_capacity(tasks.len());
        for (task, title) in tasks.into_iter().zip(titles) {
            match task.await {
                Ok(poster) => posters.push(poster),
                Err(e) => {
                    tracing::error!(title = %title, error = %e, "Poster task join error");
                    posters.push(self.placeholder(title));
                }
            }
        }

        let found = posters.iter().filter(|p| !p.placeholder).count();
        tracing::info!(
            requested = titles.len(),
            found,
            provider = self.provider.name(),
            "Poster lookups completed"
        );

        posters
    }

    fn placeholder(&self, title: &str) -> Poster {
        Poster {
            title: title.to_string(),
            url: self.placeholder_url.clone(),
            placeholder: true,
        }
    }
}
