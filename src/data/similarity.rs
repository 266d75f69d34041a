use crate::error::{AppError, AppResult};

/// Square, row-major matrix of precomputed pairwise similarity scores
///
/// Entry `(i, j)` scores how similar catalog item `i` is to item `j`; higher is
/// more similar. Symmetry is expected but not checked.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from its rows, rejecting ragged or non-finite input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(AppError::Load(format!(
                    "similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            if let Some(j) = row.iter().position(|s| !s.is_finite()) {
                return Err(AppError::Load(format!(
                    "similarity matrix has a non-finite score at ({}, {})",
                    i, j
                )));
            }
            scores.extend(row);
        }

        Ok(Self { size, scores })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.scores[start..start + self.size])
    }

    pub fn score(&self, i: usize, j: usize) -> Option<f32> {
        self.row(i).and_then(|row| row.get(j).copied())
    }
}
