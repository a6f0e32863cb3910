use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::template::Template;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationStep {
    pub step: u8,
    pub name: String,
    pub description: String,
    pub effort_hours: u32,
    pub depends_on: Option<u8>,
    pub deliverables: Vec<String>,
}

/// A scored, explained and costed catalog template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub template: Arc<Template>,
    pub score: u8,
    pub reasoning: String,
    pub expected_benefits: Vec<String>,
    pub implementation_plan: Vec<ImplementationStep>,
    pub estimated_cost: Decimal,
}

impl Recommendation {
    pub fn total_effort_hours(&self) -> u32 {
        self.implementation_plan.iter().map(|step| step.effort_hours).sum()
    }
}
