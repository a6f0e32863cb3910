//! Human-readable reasoning and benefit lines for a scored template.

use crate::domain::profile::BusinessProfile;
use crate::domain::template::{Complexity, Template};

use super::scoring::{ScoreBreakdown, ScoringWeights, SizeFit};
use super::{HIGH_ROI_THRESHOLD, MAX_BENEFITS, SOLID_ROI_THRESHOLD};

const MAX_REASONING_CLAUSES: usize = 3;
const FEATURE_BENEFITS: usize = 2;

const PAIN_POINT_BENEFITS: &[(&str, &str)] = &[
    ("manual", "70-90% reduction in manual tasks"),
    ("slow", "Up to 10x faster processing"),
    ("error", "Eliminates human error in repetitive steps"),
    ("integration", "Unifies your systems into a single flow"),
];
const MAX_PAIN_POINT_BENEFITS: usize = 3;

const BOILERPLATE_BENEFITS: [&str; 2] =
    ["24/7 unattended operation", "Scales with your business without extra headcount"];

const FALLBACK_REASONING: &str = "A solid general-purpose automation for your business.";

pub(super) fn reasoning(
    profile: &BusinessProfile,
    template: &Template,
    breakdown: &ScoreBreakdown,
    weights: &ScoringWeights,
) -> String {
    let mut clauses = Vec::with_capacity(6);

    if breakdown.category_match {
        clauses.push(format!("built specifically for {} businesses", profile.industry));
    } else if breakdown.industry_match {
        clauses.push(format!("proven in the {} industry", profile.industry));
    }

    match breakdown.size_fit(weights) {
        SizeFit::Exact => clauses.push(format!("sized for {} companies", profile.size)),
        SizeFit::Adjacent => clauses.push(format!("adapts well to a {} company", profile.size)),
        SizeFit::None => {}
    }

    if template.estimated_roi > HIGH_ROI_THRESHOLD {
        clauses.push(format!("high estimated ROI of {}%", template.estimated_roi));
    } else if template.estimated_roi > SOLID_ROI_THRESHOLD {
        clauses.push(format!("solid estimated ROI of {}%", template.estimated_roi));
    }

    if template.complexity == Complexity::Basic {
        clauses.push(format!("quick to implement ({})", template.implementation_time));
    }

    if breakdown.alignment_points > 0 {
        clauses.push(format!("{} complexity matches your team's scale", template.complexity));
    }

    if let Some(tag) = breakdown.matched_tags.first() {
        clauses.push(format!("directly supports your {tag} goals"));
    }

    if clauses.is_empty() {
        return FALLBACK_REASONING.to_string();
    }

    clauses.truncate(MAX_REASONING_CLAUSES);
    let mut sentence = capitalize(&clauses.join(", "));
    sentence.push('.');
    sentence
}

pub(super) fn expected_benefits(profile: &BusinessProfile, template: &Template) -> Vec<String> {
    let mut benefits = template.features.iter().take(FEATURE_BENEFITS).cloned().collect::<Vec<_>>();

    benefits.push(format!("Estimated ROI of {}%", template.estimated_roi));
    benefits.push(format!("Up and running in {}", template.implementation_time));

    benefits.extend(
        PAIN_POINT_BENEFITS
            .iter()
            .filter(|(keyword, _)| profile.has_pain_point(keyword))
            .take(MAX_PAIN_POINT_BENEFITS)
            .map(|(_, benefit)| (*benefit).to_string()),
    );
    benefits.extend(BOILERPLATE_BENEFITS.iter().map(|benefit| (*benefit).to_string()));

    benefits.truncate(MAX_BENEFITS);
    benefits
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
