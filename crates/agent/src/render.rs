use anyhow::{Context as _, Result};
use autobiz_core::domain::recommendation::Recommendation;
use serde::Serialize;
use tera::{Context, Tera};

const SUMMARY_TEMPLATE: &str = "summary.md.tera";

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    name: &'a str,
    score: u8,
    roi: u32,
    implementation_time: &'a str,
    effort_hours: u32,
    cost: String,
    reasoning: &'a str,
}

impl<'a> From<&'a Recommendation> for SummaryRow<'a> {
    fn from(recommendation: &'a Recommendation) -> Self {
        Self {
            name: &recommendation.template.name,
            score: recommendation.score,
            roi: recommendation.template.estimated_roi,
            implementation_time: &recommendation.template.implementation_time,
            effort_hours: recommendation.total_effort_hours(),
            cost: format!("{:.2}", recommendation.estimated_cost),
            reasoning: &recommendation.reasoning,
        }
    }
}

/// Renders the recommendation summary appended to consultant replies.
#[derive(Clone, Debug)]
pub struct SummaryRenderer {
    tera: Tera,
}

impl SummaryRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(SUMMARY_TEMPLATE, include_str!("../templates/summary.md.tera"))
            .context("failed to load summary template")?;
        Ok(Self { tera })
    }

    pub fn render(&self, recommendations: &[Recommendation]) -> Result<String> {
        let rows = recommendations.iter().map(SummaryRow::from).collect::<Vec<_>>();
        let mut context = Context::new();
        context.insert("recommendations", &rows);

        let rendered = self
            .tera
            .render(SUMMARY_TEMPLATE, &context)
            .context("failed to render recommendation summary")?;
        Ok(rendered.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use autobiz_core::catalog::Catalog;
    use autobiz_core::domain::profile::BusinessProfile;
    use autobiz_core::domain::template::BusinessSize;
    use autobiz_core::recommend::recommend;

    use super::SummaryRenderer;

    #[test]
    fn summary_lists_each_recommendation_with_cost() {
        let profile = BusinessProfile {
            industry: "E-commerce".to_string(),
            size: BusinessSize::Small,
            goals: vec!["process automation".to_string()],
            pain_points: vec!["manual processes".to_string()],
        };
        let recommendations = recommend(&profile, &Catalog::builtin());
        assert!(!recommendations.is_empty());

        let summary = SummaryRenderer::new().expect("renderer").render(&recommendations).expect("render");

        assert!(summary.starts_with("**Recommended automations for your business**"));
        assert!(summary.contains("1. **E-commerce Order Automation**"));
        assert!(summary.contains("Estimated ROI: 320%"));
        assert!(summary.contains("Estimated cost: $1950.00"));
        assert!(summary.contains("Implementation time: 2-3 weeks"));

        let effort = recommendations[0].total_effort_hours();
        assert!(effort > 0);
        assert!(summary.contains(&format!("Estimated effort: {effort} hours")));
    }
}
