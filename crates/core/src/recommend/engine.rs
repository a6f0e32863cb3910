use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::Catalog;
use crate::domain::profile::BusinessProfile;
use crate::domain::recommendation::Recommendation;
use crate::domain::template::Template;

use super::explain::{expected_benefits, reasoning};
use super::plan::implementation_plan;
use super::scoring::{ScoreCalculator, ScoringWeights};
use super::{MAX_RECOMMENDATIONS, MIN_RECOMMENDATION_SCORE};

/// Implementation cost multiplier applied to the list price (x1.3).
fn cost_multiplier() -> Decimal {
    Decimal::new(13, 1)
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRecommender {
    calculator: ScoreCalculator,
}

impl TemplateRecommender {
    pub fn new() -> Self {
        Self { calculator: ScoreCalculator::new() }
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { calculator: ScoreCalculator::with_weights(weights) }
    }

    /// Ranks catalog templates for `profile`.
    ///
    /// Returns at most [`MAX_RECOMMENDATIONS`] entries, all scoring above
    /// [`MIN_RECOMMENDATION_SCORE`], in non-increasing score order with
    /// catalog order breaking ties. Pure: identical inputs give identical
    /// output.
    pub fn recommend(&self, profile: &BusinessProfile, catalog: &Catalog) -> Vec<Recommendation> {
        let mut scored = catalog
            .templates()
            .iter()
            .filter(|template| self.calculator.is_candidate(profile, template))
            .map(|template| (template, self.calculator.score(profile, template)))
            .filter(|(_, breakdown)| breakdown.score > MIN_RECOMMENDATION_SCORE)
            .collect::<Vec<_>>();

        // sort_by is stable, so equal scores keep catalog order.
        scored.sort_by(|(_, left), (_, right)| right.score.cmp(&left.score));
        scored.truncate(MAX_RECOMMENDATIONS);

        debug!(
            event_name = "recommend.ranked",
            industry = %profile.industry,
            size = %profile.size,
            catalog_size = catalog.len(),
            selected = scored.len(),
            "ranked catalog templates for profile"
        );

        scored
            .into_iter()
            .map(|(template, breakdown)| Recommendation {
                template: Arc::clone(template),
                score: breakdown.score,
                reasoning: reasoning(profile, template, &breakdown, self.calculator.weights()),
                expected_benefits: expected_benefits(profile, template),
                implementation_plan: implementation_plan(template),
                estimated_cost: estimated_cost(template),
            })
            .collect()
    }
}

/// Convenience wrapper over [`TemplateRecommender`] with the default weights.
pub fn recommend(profile: &BusinessProfile, catalog: &Catalog) -> Vec<Recommendation> {
    TemplateRecommender::new().recommend(profile, catalog)
}

pub(crate) fn estimated_cost(template: &Template) -> Decimal {
    (Decimal::from(template.price) * cost_multiplier()).round_dp(2)
}
