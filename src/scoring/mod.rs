pub mod band;
pub mod comparator;
pub mod config;
pub mod curve;
pub mod engine;
pub mod market;
pub mod validation;
pub mod weights;

pub use band::Band;
pub use config::{ScoringContext, ScoringSettings};
pub use engine::{compute_score, PreferenceScore, ScoreResult};
pub use market::{MarketMetric, MarketMetrics, MarketSubScores};
pub use validation::{validate_preferences, validate_snapshot};
