pub mod catalog;
pub mod loader;
pub mod similarity;

pub use catalog::{Catalog, CatalogEntry};
pub use loader::{ensure_artifact, load_artifacts};
pub use similarity::SimilarityMatrix;
