use serde::{Deserialize, Serialize};

use crate::domain::template::BusinessSize;

pub const GENERAL_INDUSTRY: &str = "General";
pub const DEFAULT_GOAL: &str = "process automation";
pub const DEFAULT_PAIN_POINT: &str = "inefficient manual processes";

/// Structured summary of a user's business, rebuilt from the transcript on
/// every recommendation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub industry: String,
    pub size: BusinessSize,
    pub goals: Vec<String>,
    pub pain_points: Vec<String>,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            industry: GENERAL_INDUSTRY.to_string(),
            size: BusinessSize::Small,
            goals: vec![DEFAULT_GOAL.to_string()],
            pain_points: vec![DEFAULT_PAIN_POINT.to_string()],
        }
    }
}

impl BusinessProfile {
    pub fn goals_text(&self) -> String {
        self.goals.join(" ").to_lowercase()
    }

    pub fn has_pain_point(&self, keyword: &str) -> bool {
        self.pain_points.iter().any(|pain| pain.to_lowercase().contains(keyword))
    }
}
