use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    data::{Catalog, SimilarityMatrix},
    error::{AppError, AppResult},
};

/// How to treat a requested count larger than the number of other titles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPolicy {
    /// Fail with `InvalidArgument`
    #[default]
    Reject,
    /// Return every other title instead
    Clamp,
}

/// A ranked neighbour of the query title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub index: usize,
    pub title: String,
    pub score: f32,
}

/// Nearest-neighbour lookup over the precomputed similarity matrix
///
/// Holds shared, immutable handles to the catalog and matrix, so clones are cheap
/// and every clone sees the same data.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityMatrix>,
    count_policy: CountPolicy,
}

impl Recommender {
    /// Creates a recommender; the matrix must be sized to the catalog
    pub fn new(catalog: Arc<Catalog>, similarity: Arc<SimilarityMatrix>) -> AppResult<Self> {
        if similarity.size() != catalog.len() {
            return Err(AppError::Load(format!(
                "similarity matrix size {} does not match catalog size {}",
                similarity.size(),
                catalog.len()
            )));
        }

        Ok(Self {
            catalog,
            similarity,
            count_policy: CountPolicy::default(),
        })
    }

    pub fn with_count_policy(mut self, count_policy: CountPolicy) -> Self {
        self.count_policy = count_policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Titles most similar to `title`, best first, never including `title` itself
    pub fn recommend(&self, title: &str, count: usize) -> AppResult<Vec<String>> {
        Ok(self
            .recommend_scored(title, count)?
            .into_iter()
            .map(|r| r.title)
            .collect())
    }

    /// Like [`recommend`](Self::recommend), keeping each neighbour's index and score
    pub fn recommend_scored(&self, title: &str, count: usize) -> AppResult<Vec<Recommendation>> {
        let query = self
            .catalog
            .index_of(title)
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' is not in the catalog", title)))?;

        let count = self.resolve_count(count)?;

        let row = self.similarity.row(query).ok_or_else(|| {
            AppError::Internal(format!("no similarity row for catalog index {}", query))
        })?;

        let mut ranked: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
        // Stable: equal scores keep ascending index order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let recommendations = ranked
            .into_iter()
            .filter(|(index, _)| *index != query)
            .take(count)
            .filter_map(|(index, score)| {
                self.catalog.title(index).map(|t| Recommendation {
                    index,
                    title: t.to_string(),
                    score,
                })
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            title = %title,
            query_index = query,
            requested = count,
            returned = recommendations.len(),
            "Recommendation lookup"
        );

        Ok(recommendations)
    }

    fn resolve_count(&self, count: usize) -> AppResult<usize> {
        if count < 1 {
            return Err(AppError::InvalidArgument(
                "count must be at least 1".to_string(),
            ));
        }

        let available = self.catalog.len().saturating_sub(1);
        if count <= available {
            return Ok(count);
        }

        match self.count_policy {
            CountPolicy::Clamp => Ok(available),
            CountPolicy::Reject => Err(AppError::InvalidArgument(format!(
                "count {} exceeds the {} other titles in the catalog",
                count, available
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn recommender(titles: &[&str], rows: Vec<Vec<f32>>) -> Recommender {
        let catalog = Catalog::new(titles.iter().map(|t| t.to_string()).collect());
        let similarity = SimilarityMatrix::from_rows(rows).unwrap();
        Recommender::new(Arc::new(catalog), Arc::new(similarity)).unwrap()
    }

    fn abcd() -> Recommender {
        recommender(
            &["A", "B", "C", "D"],
            vec![
                vec![1.0, 0.9, 0.2, 0.5],
                vec![0.9, 1.0, 0.4, 0.1],
                vec![0.2, 0.4, 1.0, 0.7],
                vec![0.5, 0.1, 0.7, 1.0],
            ],
        )
    }

    #[test]
    fn test_recommend_ranks_by_score() {
        assert_eq!(abcd().recommend("A", 2).unwrap(), vec!["B", "D"]);
    }

    #[test]
    fn test_recommend_scored_carries_scores() {
        let recs = abcd().recommend_scored("C", 3).unwrap();
        let scores: Vec<f32> = recs.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.7, 0.4, 0.2]);
        assert_eq!(recs[0].index, 3);
        assert_eq!(recs[0].title, "D");
    }

    #[test]
    fn test_recommend_properties_hold_for_every_title_and_count() {
        let r = abcd();
        let all: HashSet<&str> = ["A", "B", "C", "D"].into_iter().collect();

        for title in ["A", "B", "C", "D"] {
            for count in 1..=3 {
                let recs = r.recommend_scored(title, count).unwrap();
                assert_eq!(recs.len(), count);

                let titles: HashSet<&str> = recs.iter().map(|r| r.title.as_str()).collect();
                assert_eq!(titles.len(), count, "duplicates for {} / {}", title, count);
                assert!(!titles.contains(title));
                assert!(titles.is_subset(&all));

                assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
            }
        }
    }

    #[test]
    fn test_recommend_all_other_titles_at_boundary() {
        let mut recs = abcd().recommend("B", 3).unwrap();
        recs.sort();
        assert_eq!(recs, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let r = abcd();
        assert_eq!(r.recommend("D", 2).unwrap(), r.recommend("D", 2).unwrap());
    }

    #[test]
    fn test_ties_broken_by_catalog_order() {
        let r = recommender(
            &["Q", "X", "Y", "Z"],
            vec![
                vec![1.0, 0.5, 0.5, 0.5],
                vec![0.5, 1.0, 0.0, 0.0],
                vec![0.5, 0.0, 1.0, 0.0],
                vec![0.5, 0.0, 0.0, 1.0],
            ],
        );
        assert_eq!(r.recommend("Q", 3).unwrap(), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_query_excluded_even_when_another_ties_at_top() {
        let r = recommender(
            &["Twin", "Query", "Other"],
            vec![
                vec![1.0, 1.0, 0.1],
                vec![1.0, 1.0, 0.3],
                vec![0.1, 0.3, 1.0],
            ],
        );
        assert_eq!(r.recommend("Query", 2).unwrap(), vec!["Twin", "Other"]);
    }

    #[test]
    fn test_duplicate_titles_use_first_match() {
        let r = recommender(
            &["Heat", "Alien", "Heat"],
            vec![
                vec![1.0, 0.8, 0.1],
                vec![0.8, 1.0, 0.2],
                vec![0.1, 0.2, 1.0],
            ],
        );
        assert_eq!(r.recommend("Heat", 1).unwrap(), vec!["Alien"]);
    }

    #[test]
    fn test_unknown_title_not_found() {
        let err = abcd().recommend("Z", 1).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = abcd().recommend("A", 0).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_oversized_count_rejected_by_default() {
        let err = abcd().recommend("A", 4).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_oversized_count_clamped() {
        let r = abcd().with_count_policy(CountPolicy::Clamp);
        assert_eq!(r.recommend("A", 10).unwrap(), vec!["B", "D", "C"]);
    }

    #[test]
    fn test_single_title_catalog_clamps_to_empty() {
        let r = recommender(&["Solo"], vec![vec![1.0]]).with_count_policy(CountPolicy::Clamp);
        assert!(r.recommend("Solo", 1).unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_sizes_rejected() {
        let catalog = Catalog::new(vec!["A".to_string(), "B".to_string()]);
        let similarity = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();
        let err = Recommender::new(Arc::new(catalog), Arc::new(similarity)).unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
    }
}
