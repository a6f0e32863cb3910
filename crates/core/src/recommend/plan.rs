use crate::domain::recommendation::ImplementationStep;
use crate::domain::template::{Complexity, Template};

struct StepSeed {
    name: &'static str,
    description: &'static str,
    /// `None` means the effort depends on template complexity.
    effort_hours: Option<u32>,
    deliverables: &'static [&'static str],
}

const STEP_SEEDS: [StepSeed; 6] = [
    StepSeed {
        name: "Analysis & Planning",
        description: "Map the current process, confirm requirements and agree on success metrics.",
        effort_hours: Some(16),
        deliverables: &["Process map", "Requirements document", "Success metrics"],
    },
    StepSeed {
        name: "Environment Setup",
        description: "Provision the automation environment and connect credentials for every system involved.",
        effort_hours: Some(12),
        deliverables: &["Configured workspace", "Connected accounts", "Access checklist"],
    },
    StepSeed {
        name: "Core Development",
        description: "Build and configure the workflow on top of the template.",
        effort_hours: None,
        deliverables: &["Working workflow", "Configuration notes", "Error handling rules"],
    },
    StepSeed {
        name: "Integration & Testing",
        description: "Wire the workflow to production systems and test it with real scenarios.",
        effort_hours: Some(24),
        deliverables: &["Integration tests", "Test report", "Fixed issues log"],
    },
    StepSeed {
        name: "Deployment",
        description: "Roll the workflow out to production and enable monitoring.",
        effort_hours: Some(16),
        deliverables: &["Production release", "Monitoring dashboard", "Rollback plan"],
    },
    StepSeed {
        name: "Training & Support",
        description: "Train the team and hand over operating documentation.",
        effort_hours: Some(8),
        deliverables: &["Training session", "User guide", "Support contact"],
    },
];

fn core_development_hours(complexity: Complexity) -> u32 {
    match complexity {
        Complexity::Basic => 40,
        Complexity::Intermediate => 80,
        Complexity::Advanced => 120,
    }
}

/// Six-step plan; each step depends on the one before it.
pub fn implementation_plan(template: &Template) -> Vec<ImplementationStep> {
    STEP_SEEDS
        .iter()
        .zip(1u8..)
        .map(|(seed, step)| ImplementationStep {
            step,
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            effort_hours: seed
                .effort_hours
                .unwrap_or_else(|| core_development_hours(template.complexity)),
            depends_on: step.checked_sub(1).filter(|previous| *previous > 0),
            deliverables: seed.deliverables.iter().map(|value| (*value).to_string()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::implementation_plan;
    use crate::catalog::Catalog;
    use crate::domain::template::Complexity;

    #[test]
    fn plan_has_six_chained_steps() {
        let catalog = Catalog::builtin();
        let template = catalog.templates()[0].as_ref();
        let plan = implementation_plan(template);

        assert_eq!(plan.len(), 6);
        assert_eq!(plan[0].depends_on, None);
        for pair in plan.windows(2) {
            assert_eq!(pair[1].depends_on, Some(pair[0].step));
        }
        assert_eq!(
            plan.iter().map(|step| step.name.as_str()).collect::<Vec<_>>(),
            vec![
                "Analysis & Planning",
                "Environment Setup",
                "Core Development",
                "Integration & Testing",
                "Deployment",
                "Training & Support",
            ]
        );
    }

    #[test]
    fn only_core_development_effort_varies_with_complexity() {
        let catalog = Catalog::builtin();
        let mut template = catalog.templates()[0].as_ref().clone();

        for (complexity, hours) in
            [(Complexity::Basic, 40), (Complexity::Intermediate, 80), (Complexity::Advanced, 120)]
        {
            template.complexity = complexity;
            let efforts =
                implementation_plan(&template).iter().map(|step| step.effort_hours).collect::<Vec<_>>();
            assert_eq!(efforts, vec![16, 12, hours, 24, 16, 8]);
        }
    }
}
