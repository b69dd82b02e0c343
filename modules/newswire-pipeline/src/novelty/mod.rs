pub mod metric;
pub mod scorer;

pub use metric::SimilarityMetric;
pub use scorer::{score_novelty, NoveltyScores, PriorVectors, NO_DATA};
