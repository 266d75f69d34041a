use serde::Deserialize;

use crate::services::recommender::CountPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the catalog artifact (column-oriented JSON with a `title` column)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path of the similarity artifact (JSON array of rows)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Optional remote location to fetch the catalog from when it is absent locally
    #[serde(default)]
    pub catalog_url: Option<String>,

    /// Optional remote location to fetch the similarity matrix from when it is absent locally
    #[serde(default)]
    pub similarity_url: Option<String>,

    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Image shown when no poster could be resolved
    #[serde(default = "default_poster_placeholder_url")]
    pub poster_placeholder_url: String,

    /// Per-call poster lookup timeout in milliseconds
    #[serde(default = "default_poster_timeout_ms")]
    pub poster_timeout_ms: u64,

    /// Maximum number of poster lookups in flight per request
    #[serde(default = "default_poster_concurrency")]
    pub poster_concurrency: usize,

    /// Recommendation count used when the request does not specify one
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Upper bound on the count a client may request
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// What to do when the requested count exceeds the catalog size minus one
    #[serde(default)]
    pub count_policy: CountPolicy,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_path() -> String {
    "data/movie_dict.json".to_string()
}

fn default_similarity_path() -> String {
    "data/similarity.json".to_string()
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_poster_placeholder_url() -> String {
    "https://via.placeholder.com/200x300?text=No+Poster".to_string()
}

fn default_poster_timeout_ms() -> u64 {
    5000
}

fn default_poster_concurrency() -> usize {
    4
}

fn default_recommendations() -> usize {
    5
}

fn default_max_recommendations() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.max_recommendations == 0 {
            anyhow::bail!("MAX_RECOMMENDATIONS must be at least 1");
        }
        if self.default_recommendations == 0
            || self.default_recommendations > self.max_recommendations
        {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS must lie in [1, {}]",
                self.max_recommendations
            );
        }
        if self.poster_concurrency == 0 {
            anyhow::bail!("POSTER_CONCURRENCY must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(vars: Vec<(&str, &str)>) -> Result<Config, envy::Error> {
        envy::from_iter(
            vars.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse(vec![("OMDB_API_KEY", "abc123")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.catalog_path, "data/movie_dict.json");
        assert_eq!(config.omdb_api_url, "http://www.omdbapi.com/");
        assert_eq!(config.poster_timeout_ms, 5000);
        assert_eq!(config.default_recommendations, 5);
        assert_eq!(config.max_recommendations, 10);
        assert_eq!(config.count_policy, CountPolicy::Reject);
        assert!(config.similarity_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_required() {
        assert!(parse(vec![]).is_err());
    }

    #[test]
    fn test_count_policy_clamp() {
        let config = parse(vec![("OMDB_API_KEY", "k"), ("COUNT_POLICY", "clamp")]).unwrap();
        assert_eq!(config.count_policy, CountPolicy::Clamp);
    }

    #[test]
    fn test_validate_rejects_default_above_max() {
        let config = parse(vec![
            ("OMDB_API_KEY", "k"),
            ("DEFAULT_RECOMMENDATIONS", "12"),
            ("MAX_RECOMMENDATIONS", "10"),
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = parse(vec![("OMDB_API_KEY", "k"), ("POSTER_CONCURRENCY", "0")]).unwrap();
        assert!(config.validate().is_err());
    }
}
