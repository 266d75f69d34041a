use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Poster resolved for a recommended title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Poster {
    pub title: String,
    pub url: String,
    /// True when no poster was found and `url` points at the placeholder image
    pub placeholder: bool,
}

/// A recommended title as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedMovie {
    pub title: String,
    pub score: f32,
    pub poster_url: String,
    pub placeholder: bool,
}

/// Response body for a recommendation request
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub count: usize,
    pub recommendations: Vec<RecommendedMovie>,
}

/// Health payload describing the loaded artifacts
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub movies: usize,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// The subset of an OMDb title response we read
///
/// OMDb answers unknown titles with `200 OK` and `"Response": "False"`, and uses
/// the literal `"N/A"` for a missing poster.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbTitle {
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl OmdbTitle {
    /// The poster URL, if the response carries a usable one
    pub fn poster_url(self) -> Option<String> {
        if self.response.as_deref() == Some("False") {
            return None;
        }
        self.poster
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty() && p != "N/A")
    }
}
