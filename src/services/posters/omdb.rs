/// OMDb API provider
///
/// Resolves a title to its poster with a single `GET /?t=<title>&apikey=<key>`.
/// OMDb reports unknown titles with a 200 and `"Response": "False"`, and a
/// missing poster as the literal `"N/A"`; both come back as `Ok(None)`.
use crate::{
    error::{AppError, AppResult},
    models::OmdbTitle,
    services::posters::PosterProvider,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl PosterProvider for OmdbProvider {
    async fn fetch_poster(&self, title: &str) -> AppResult<Option<String>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Poster title cannot be empty".to_string(),
            ));
        }

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let details: OmdbTitle = response.json().await?;
        if let Some(error) = details.error.as_deref() {
            tracing::debug!(title = %title, error = %error, "OMDb reported an error");
        }

        let poster = details.poster_url();

        tracing::debug!(
            title = %title,
            found = poster.is_some(),
            provider = "omdb",
            "Poster fetched"
        );

        Ok(poster)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
