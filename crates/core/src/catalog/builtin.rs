//! Built-in workflow catalog used when no catalog file is configured.

use crate::domain::template::{BusinessSize, Complexity, Template, TemplateCategory, TemplateId};

#[derive(Debug, Clone, Copy)]
struct TemplateSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: TemplateCategory,
    industry: &'static [&'static str],
    business_size: BusinessSize,
    complexity: Complexity,
    estimated_roi: u32,
    implementation_time: &'static str,
    price: u32,
    features: &'static [&'static str],
    tags: &'static [&'static str],
}

const TEMPLATE_SEEDS: &[TemplateSeed] = &[
    TemplateSeed {
        id: "ecommerce-order-automation",
        name: "E-commerce Order Automation",
        description: "Processes orders end to end, keeps stock in sync across channels and recovers abandoned carts.",
        category: TemplateCategory::ECommerce,
        industry: &["E-commerce", "Retail"],
        business_size: BusinessSize::Small,
        complexity: Complexity::Intermediate,
        estimated_roi: 320,
        implementation_time: "2-3 weeks",
        price: 1_500,
        features: &[
            "Automated order processing",
            "Real-time inventory sync",
            "Shopify and WooCommerce integration",
            "Abandoned cart recovery emails",
        ],
        tags: &["ecommerce", "automation", "sales", "inventory", "integration"],
    },
    TemplateSeed {
        id: "crm-lead-pipeline",
        name: "CRM Lead Pipeline",
        description: "Captures leads from every channel, scores them and routes them to the right sales rep.",
        category: TemplateCategory::Crm,
        industry: &["CRM", "Sales", "Services"],
        business_size: BusinessSize::Medium,
        complexity: Complexity::Intermediate,
        estimated_roi: 280,
        implementation_time: "3-4 weeks",
        price: 2_000,
        features: &[
            "Automated lead capture and scoring",
            "HubSpot and Salesforce integration",
            "Follow-up sequences",
            "Pipeline health reports",
        ],
        tags: &["crm", "leads", "sales", "automation"],
    },
    TemplateSeed {
        id: "marketing-email-campaigns",
        name: "Email Marketing Automation",
        description: "Sends segmented, behaviour-triggered campaigns and tracks engagement automatically.",
        category: TemplateCategory::Marketing,
        industry: &["Marketing", "E-commerce"],
        business_size: BusinessSize::Small,
        complexity: Complexity::Basic,
        estimated_roi: 350,
        implementation_time: "1-2 weeks",
        price: 900,
        features: &[
            "Behaviour-triggered email automation",
            "Automatic audience segmentation",
            "MailChimp integration",
            "Engagement dashboards",
        ],
        tags: &["marketing", "email", "automation", "segmentation"],
    },
    TemplateSeed {
        id: "finance-invoice-automation",
        name: "Invoice and Billing Automation",
        description: "Generates, sends and reconciles invoices and chases late payments without manual work.",
        category: TemplateCategory::Finance,
        industry: &["Finance", "Accounting", "any"],
        business_size: BusinessSize::Small,
        complexity: Complexity::Basic,
        estimated_roi: 250,
        implementation_time: "1-2 weeks",
        price: 1_200,
        features: &[
            "Automated invoice generation",
            "Payment reminder automation",
            "Accounting software integration",
            "Cash-flow reports",
        ],
        tags: &["finance", "invoicing", "billing", "automation"],
    },
    TemplateSeed {
        id: "hr-employee-onboarding",
        name: "Employee Onboarding Workflow",
        description: "Coordinates accounts, documents and training for every new hire from offer to first week.",
        category: TemplateCategory::Hr,
        industry: &["HR"],
        business_size: BusinessSize::Medium,
        complexity: Complexity::Intermediate,
        estimated_roi: 180,
        implementation_time: "2-3 weeks",
        price: 1_800,
        features: &[
            "Automated account provisioning",
            "Document signature tracking",
            "Training schedule generation",
            "Manager notifications",
        ],
        tags: &["hr", "onboarding", "efficiency", "automation"],
    },
    TemplateSeed {
        id: "operations-erp-sync",
        name: "CRM-ERP Synchronization",
        description: "Keeps CRM and ERP records synchronized in real time and removes duplicate data entry.",
        category: TemplateCategory::Operations,
        industry: &["Operations", "Manufacturing", "any"],
        business_size: BusinessSize::Enterprise,
        complexity: Complexity::Advanced,
        estimated_roi: 400,
        implementation_time: "6-8 weeks",
        price: 5_000,
        features: &[
            "Bidirectional real-time sync",
            "Salesforce and SAP integration",
            "Automated duplicate detection",
            "Error alerting and replay",
        ],
        tags: &["integration", "sync", "erp", "crm", "monitoring"],
    },
    TemplateSeed {
        id: "sales-reporting-dashboard",
        name: "Sales Reporting Dashboard",
        description: "Collects sales data from every source into a daily dashboard with alerting on targets.",
        category: TemplateCategory::Sales,
        industry: &["Sales", "CRM"],
        business_size: BusinessSize::Startup,
        complexity: Complexity::Basic,
        estimated_roi: 220,
        implementation_time: "1 week",
        price: 700,
        features: &[
            "Automated daily sales reports",
            "Fast KPI dashboards",
            "Target alerts",
        ],
        tags: &["sales", "analytics", "reporting", "dashboard"],
    },
    TemplateSeed {
        id: "support-ticket-triage",
        name: "Support Ticket Triage",
        description: "Classifies incoming tickets, drafts replies and escalates urgent cases to the right agent.",
        category: TemplateCategory::Support,
        industry: &["Support", "SaaS"],
        business_size: BusinessSize::Small,
        complexity: Complexity::Intermediate,
        estimated_roi: 300,
        implementation_time: "2 weeks",
        price: 1_100,
        features: &[
            "Automated ticket classification",
            "Instant reply drafts",
            "Helpdesk integration",
            "SLA breach alerts",
        ],
        tags: &["support", "customer experience", "automation", "tickets"],
    },
];

pub(crate) fn builtin_templates() -> Vec<Template> {
    TEMPLATE_SEEDS
        .iter()
        .map(|seed| Template {
            id: TemplateId(seed.id.to_owned()),
            name: seed.name.to_owned(),
            description: seed.description.to_owned(),
            category: seed.category,
            industry: seed.industry.iter().map(|value| (*value).to_owned()).collect(),
            business_size: seed.business_size,
            complexity: seed.complexity,
            estimated_roi: seed.estimated_roi,
            implementation_time: seed.implementation_time.to_owned(),
            price: seed.price,
            features: seed.features.iter().map(|value| (*value).to_owned()).collect(),
            tags: seed.tags.iter().map(|value| (*value).to_owned()).collect(),
        })
        .collect()
}
