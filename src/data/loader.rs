//! Artifact loading
//!
//! Both artifacts are produced offline. The catalog is a column-oriented JSON
//! object with at least a `title` column; each column is either an array (row
//! order is array order) or an object keyed by decimal row labels, which is the
//! shape a pandas `DataFrame.to_dict()` dump takes. The similarity artifact is
//! a JSON array of rows.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    data::{Catalog, SimilarityMatrix},
    error::{AppError, AppResult},
};

const TITLE_COLUMN: &str = "title";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Column {
    List(Vec<Value>),
    Labeled(HashMap<String, Value>),
}

/// Loads and cross-checks both artifacts
pub fn load_artifacts(
    catalog_path: impl AsRef<Path>,
    similarity_path: impl AsRef<Path>,
) -> AppResult<(Catalog, SimilarityMatrix)> {
    let catalog = load_catalog(catalog_path)?;
    let similarity = load_similarity(similarity_path)?;

    if similarity.size() != catalog.len() {
        return Err(AppError::Load(format!(
            "similarity matrix is {}x{} but the catalog has {} titles",
            similarity.size(),
            similarity.size(),
            catalog.len()
        )));
    }

    let duplicates = catalog.duplicate_count();
    if duplicates > 0 {
        tracing::warn!(
            duplicates,
            "Catalog contains duplicate titles; lookups resolve to the first occurrence"
        );
    }

    tracing::info!(
        titles = catalog.len(),
        "Loaded catalog and similarity matrix"
    );

    Ok((catalog, similarity))
}

/// Reads the catalog artifact
pub fn load_catalog(path: impl AsRef<Path>) -> AppResult<Catalog> {
    let path = path.as_ref();
    let columns: HashMap<String, Column> = read_json(path)?;

    let column = columns.get(TITLE_COLUMN).ok_or_else(|| {
        AppError::Load(format!(
            "catalog {} has no '{}' column",
            path.display(),
            TITLE_COLUMN
        ))
    })?;

    let titles = match column {
        Column::List(values) => values
            .iter()
            .enumerate()
            .map(|(row, value)| title_from_value(row.to_string(), value))
            .collect::<AppResult<Vec<_>>>()?,
        Column::Labeled(cells) => {
            let mut rows = cells
                .iter()
                .map(|(label, value)| {
                    let row = label.parse::<usize>().map_err(|_| {
                        AppError::Load(format!("catalog row label '{}' is not an integer", label))
                    })?;
                    Ok((row, title_from_value(label.clone(), value)?))
                })
                .collect::<AppResult<Vec<(usize, String)>>>()?;

            rows.sort_by_key(|(row, _)| *row);
            if let Some(pair) = rows.windows(2).find(|pair| pair[0].0 == pair[1].0) {
                return Err(AppError::Load(format!(
                    "catalog row label {} appears more than once",
                    pair[0].0
                )));
            }

            rows.into_iter().map(|(_, title)| title).collect()
        }
    };

    Ok(Catalog::new(titles))
}

/// Reads the similarity artifact
pub fn load_similarity(path: impl AsRef<Path>) -> AppResult<SimilarityMatrix> {
    let rows: Vec<Vec<f32>> = read_json(path.as_ref())?;
    SimilarityMatrix::from_rows(rows)
}

fn title_from_value(row: String, value: &Value) -> AppResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::Load(format!("catalog title at row {} is not a string", row)))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let file = File::open(path)
        .map_err(|e| AppError::Load(format!("cannot open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::Load(format!("malformed {}: {}", path.display(), e)))
}

/// Downloads an artifact once if it is absent locally
///
/// Does nothing when the file already exists or no remote location is configured;
/// a missing file then surfaces as a load error.
pub async fn ensure_artifact(
    http_client: &HttpClient,
    path: impl AsRef<Path>,
    url: Option<&str>,
) -> AppResult<()> {
    let path = path.as_ref();

    if tokio::fs::try_exists(path).await? {
        tracing::debug!(path = %path.display(), "Artifact already present");
        return Ok(());
    }

    let Some(url) = url else {
        return Ok(());
    };

    tracing::info!(path = %path.display(), url = %url, "Downloading missing artifact");

    let response = http_client.get(url).send().await?;
    if !response.status().is_success() {
        let status = response.status();
        return Err(AppError::ExternalApi(format!(
            "artifact download from {} returned status {}",
            url, status
        )));
    }
    let bytes = response.bytes().await?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Write beside the target and rename so a failed download never leaves a partial artifact
    let partial = path.with_extension("part");
    tokio::fs::write(&partial, &bytes).await?;
    tokio::fs::rename(&partial, path).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Artifact downloaded");

    Ok(())
}
