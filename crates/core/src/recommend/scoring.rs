//! Candidate filter and point scoring for templates

use crate::domain::profile::BusinessProfile;
use crate::domain::template::{BusinessSize, Complexity, Template};

use super::{HIGH_ROI_THRESHOLD, SCORE_CAP, SOLID_ROI_THRESHOLD};

const AUTOMATION_MARKERS: &[&str] = &["automat"];
const INTEGRATION_MARKERS: &[&str] = &["integrat"];
const SPEED_MARKERS: &[&str] = &["real-time", "real time", "fast", "instant"];

/// Points awarded per signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub category_match: u32,
    pub industry_match: u32,
    pub size_exact: u32,
    /// Startup profile with small template, or the reverse.
    pub size_startup_small: u32,
    /// Medium profile with small template, or the reverse.
    pub size_medium_small: u32,
    pub per_goal_tag: u32,
    pub per_automation_feature: u32,
    pub per_integration_feature: u32,
    pub per_speed_feature: u32,
    pub high_roi: u32,
    pub solid_roi: u32,
    pub startup_basic: u32,
    pub enterprise_advanced: u32,
    pub medium_intermediate: u32,
    pub generic_intermediate: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// How a template's size relates to the profile's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeFit {
    Exact,
    Adjacent,
    None,
}

/// Which signals fired for a template, and the capped total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub category_match: bool,
    pub industry_match: bool,
    pub size_points: u32,
    pub matched_tags: Vec<String>,
    pub automation_features: u32,
    pub integration_features: u32,
    pub speed_features: u32,
    pub roi_points: u32,
    pub alignment_points: u32,
    pub raw_total: u32,
    pub score: u8,
}

impl ScoreBreakdown {
    pub fn size_fit(&self, weights: &ScoringWeights) -> SizeFit {
        match self.size_points {
            0 => SizeFit::None,
            points if points == weights.size_exact => SizeFit::Exact,
            _ => SizeFit::Adjacent,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
}

impl ScoreCalculator {
    pub fn new() -> Self {
        Self { weights: ScoringWeights::default() }
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// A template is a candidate when its category or industry list fits the
    /// profile, or when its size fits and one of its tags overlaps a goal.
    pub fn is_candidate(&self, profile: &BusinessProfile, template: &Template) -> bool {
        if template.category.matches_label(&profile.industry)
            || template.serves_industry(&profile.industry)
        {
            return true;
        }

        size_accepts(profile.size, template.business_size)
            && template.tags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                !tag.is_empty()
                    && profile.goals.iter().any(|goal| {
                        let goal = goal.to_lowercase();
                        goal.contains(&tag) || tag.contains(&goal)
                    })
            })
    }

    pub fn score(&self, profile: &BusinessProfile, template: &Template) -> ScoreBreakdown {
        let weights = &self.weights;
        let goals_text = profile.goals_text();

        let category_match = template.category.matches_label(&profile.industry);
        let industry_match = template.serves_industry(&profile.industry);
        let size_points = self.size_points(profile.size, template.business_size);

        let matched_tags = template
            .tags
            .iter()
            .filter(|tag| !tag.trim().is_empty() && goals_text.contains(&tag.to_lowercase()))
            .cloned()
            .collect::<Vec<_>>();

        let automation_features = if profile.has_pain_point("manual") {
            count_features(template, AUTOMATION_MARKERS)
        } else {
            0
        };
        let integration_features = if profile.has_pain_point("integration") {
            count_features(template, INTEGRATION_MARKERS)
        } else {
            0
        };
        let speed_features = if profile.has_pain_point("slow") {
            count_features(template, SPEED_MARKERS)
        } else {
            0
        };

        let roi_points = if template.estimated_roi > HIGH_ROI_THRESHOLD {
            weights.high_roi
        } else if template.estimated_roi > SOLID_ROI_THRESHOLD {
            weights.solid_roi
        } else {
            0
        };

        let alignment_points = self.alignment_points(profile.size, template.complexity);

        let raw_total = u32::from(category_match) * weights.category_match
            + u32::from(industry_match) * weights.industry_match
            + size_points
            + matched_tags.len() as u32 * weights.per_goal_tag
            + automation_features * weights.per_automation_feature
            + integration_features * weights.per_integration_feature
            + speed_features * weights.per_speed_feature
            + roi_points
            + alignment_points;

        // SCORE_CAP fits in u8
        let score = raw_total.min(SCORE_CAP) as u8;

        ScoreBreakdown {
            category_match,
            industry_match,
            size_points,
            matched_tags,
            automation_features,
            integration_features,
            speed_features,
            roi_points,
            alignment_points,
            raw_total,
            score,
        }
    }

    fn size_points(&self, profile: BusinessSize, template: BusinessSize) -> u32 {
        use BusinessSize::{Medium, Small, Startup};

        if profile == template {
            return self.weights.size_exact;
        }
        match (profile, template) {
            (Startup, Small) | (Small, Startup) => self.weights.size_startup_small,
            (Medium, Small) | (Small, Medium) => self.weights.size_medium_small,
            _ => 0,
        }
    }

    fn alignment_points(&self, profile: BusinessSize, complexity: Complexity) -> u32 {
        match (profile, complexity) {
            (BusinessSize::Startup, Complexity::Basic) => self.weights.startup_basic,
            (BusinessSize::Enterprise, Complexity::Advanced) => self.weights.enterprise_advanced,
            (BusinessSize::Medium, Complexity::Intermediate) => self.weights.medium_intermediate,
            (_, Complexity::Intermediate) => self.weights.generic_intermediate,
            _ => 0,
        }
    }
}

/// Filter relaxation is one-directional: startup and medium profiles also
/// accept small templates.
fn size_accepts(profile: BusinessSize, template: BusinessSize) -> bool {
    profile == template
        || matches!(
            (profile, template),
            (BusinessSize::Startup, BusinessSize::Small) | (BusinessSize::Medium, BusinessSize::Small)
        )
}

fn count_features(template: &Template, markers: &[&str]) -> u32 {
    template
        .features
        .iter()
        .filter(|feature| {
            let feature = feature.to_lowercase();
            markers.iter().any(|marker| feature.contains(marker))
        })
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::{TemplateCategory, TemplateId};

    fn template(category: TemplateCategory, industry: &[&str], roi: u32) -> Template {
        Template {
            id: TemplateId("t".to_string()),
            name: "T".to_string(),
            description: String::new(),
            category,
            industry: industry.iter().map(|value| (*value).to_string()).collect(),
            business_size: BusinessSize::Enterprise,
            complexity: Complexity::Advanced,
            estimated_roi: roi,
            implementation_time: "1 week".to_string(),
            price: 100,
            features: Vec::new(),
            tags: Vec::new(),
        }
    }

    fn profile(industry: &str, size: BusinessSize) -> BusinessProfile {
        BusinessProfile { industry: industry.to_string(), size, ..BusinessProfile::default() }
    }

    #[test]
    fn roi_of_exactly_three_hundred_gets_the_lower_tier() {
        let calculator = ScoreCalculator::new();
        let profile = profile("Nothing", BusinessSize::Small);

        let at_edge = calculator.score(&profile, &template(TemplateCategory::Sales, &[], 300));
        let above = calculator.score(&profile, &template(TemplateCategory::Sales, &[], 301));
        let at_lower_edge = calculator.score(&profile, &template(TemplateCategory::Sales, &[], 200));

        assert_eq!(at_edge.roi_points, 5);
        assert_eq!(above.roi_points, 10);
        assert_eq!(at_lower_edge.roi_points, 0);
    }

    #[test]
    fn size_points_are_symmetric_for_adjacent_sizes() {
        let calculator = ScoreCalculator::new();
        assert_eq!(calculator.size_points(BusinessSize::Startup, BusinessSize::Small), 10);
        assert_eq!(calculator.size_points(BusinessSize::Small, BusinessSize::Startup), 10);
        assert_eq!(calculator.size_points(BusinessSize::Medium, BusinessSize::Small), 8);
        assert_eq!(calculator.size_points(BusinessSize::Small, BusinessSize::Medium), 8);
        assert_eq!(calculator.size_points(BusinessSize::Small, BusinessSize::Small), 15);
        assert_eq!(calculator.size_points(BusinessSize::Startup, BusinessSize::Enterprise), 0);
    }

    #[test]
    fn filter_size_relaxation_only_runs_one_way() {
        assert!(size_accepts(BusinessSize::Startup, BusinessSize::Small));
        assert!(size_accepts(BusinessSize::Medium, BusinessSize::Small));
        assert!(!size_accepts(BusinessSize::Small, BusinessSize::Startup));
        assert!(!size_accepts(BusinessSize::Small, BusinessSize::Medium));
    }

    #[test]
    fn tag_goal_overlap_admits_a_template_without_industry_match() {
        let calculator = ScoreCalculator::new();
        let mut candidate = template(TemplateCategory::Sales, &["Retail"], 100);
        candidate.business_size = BusinessSize::Small;
        candidate.tags = vec!["automation".to_string()];

        let profile = profile("Healthcare", BusinessSize::Startup);
        assert!(calculator.is_candidate(&profile, &candidate));

        candidate.tags = vec!["inventory".to_string()];
        assert!(!calculator.is_candidate(&profile, &candidate));
    }

    #[test]
    fn wildcard_industry_matches_every_profile() {
        let calculator = ScoreCalculator::new();
        let candidate = template(TemplateCategory::Finance, &["any"], 100);
        let breakdown = calculator.score(&profile("Healthcare", BusinessSize::Small), &candidate);

        assert!(breakdown.industry_match);
        assert!(!breakdown.category_match);
    }

    #[test]
    fn pain_point_features_are_counted_per_feature() {
        let calculator = ScoreCalculator::new();
        let mut candidate = template(TemplateCategory::Operations, &[], 0);
        candidate.features = vec![
            "Automated sync".to_string(),
            "Automatic retries".to_string(),
            "API integration".to_string(),
            "Real-time alerts".to_string(),
        ];
        let profile = BusinessProfile {
            pain_points: vec!["manual processes".to_string(), "slow processes".to_string()],
            ..profile("Nothing", BusinessSize::Small)
        };

        let breakdown = calculator.score(&profile, &candidate);
        assert_eq!(breakdown.automation_features, 2);
        assert_eq!(breakdown.integration_features, 0);
        assert_eq!(breakdown.speed_features, 1);
        assert_eq!(breakdown.raw_total, 2 * 5 + 3);
    }

    #[test]
    fn score_is_capped_at_one_hundred() {
        let calculator = ScoreCalculator::new();
        let mut candidate = template(TemplateCategory::ECommerce, &["E-commerce"], 500);
        candidate.business_size = BusinessSize::Small;
        candidate.complexity = Complexity::Intermediate;
        candidate.tags = vec!["automation".to_string(), "sales".to_string()];

        let breakdown = calculator.score(&profile("E-commerce", BusinessSize::Small), &candidate);
        assert!(breakdown.raw_total > 100);
        assert_eq!(breakdown.score, 100);
    }
}
