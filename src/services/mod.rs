pub mod posters;
pub mod recommender;

pub use posters::{PosterProvider, PosterService};
pub use recommender::{CountPolicy, Recommendation, Recommender};
