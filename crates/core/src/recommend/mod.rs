//! Template recommender
//!
//! Filters the catalog down to candidates for a [`BusinessProfile`], scores
//! them against a fixed point table, keeps the best few and explains each one
//! with reasoning, expected benefits, an implementation plan and a cost.
//!
//! [`BusinessProfile`]: crate::domain::profile::BusinessProfile

mod engine;
mod explain;
mod plan;
mod scoring;

pub use engine::{recommend, TemplateRecommender};
pub use plan::implementation_plan;
pub use scoring::{ScoreBreakdown, ScoreCalculator, ScoringWeights, SizeFit};

/// Default point table
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    category_match: 50,
    industry_match: 30,
    size_exact: 15,
    size_startup_small: 10,
    size_medium_small: 8,
    per_goal_tag: 4,
    per_automation_feature: 5,
    per_integration_feature: 5,
    per_speed_feature: 3,
    high_roi: 10,
    solid_roi: 5,
    startup_basic: 10,
    enterprise_advanced: 10,
    medium_intermediate: 8,
    generic_intermediate: 5,
};

/// Scores at or below this are never recommended.
pub const MIN_RECOMMENDATION_SCORE: u8 = 60;

/// Maximum recommendations to return
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Upper bound applied to the raw point sum.
pub const SCORE_CAP: u32 = 100;

/// ROI (percent) strictly above which the high tier applies.
pub const HIGH_ROI_THRESHOLD: u32 = 300;

/// ROI (percent) strictly above which the solid tier applies.
pub const SOLID_ROI_THRESHOLD: u32 = 200;

/// Maximum expected-benefit lines per recommendation.
pub const MAX_BENEFITS: usize = 6;
