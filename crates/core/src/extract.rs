//! Keyword classifier that turns a chat transcript into a [`BusinessProfile`].
//!
//! Single-valued fields (industry, size) take the first matching rule in table
//! order. Goals and pain points accumulate every matching rule, also in table
//! order, and fall back to a single default entry when nothing matches.
//!
//! A keyword only counts when it starts a word, so "shop" does not fire on
//! "workshop" and "erp" does not fire on "enterprise".

use crate::domain::conversation::ChatMessage;
use crate::domain::profile::{BusinessProfile, DEFAULT_GOAL, DEFAULT_PAIN_POINT, GENERAL_INDUSTRY};
use crate::domain::template::BusinessSize;

struct KeywordRule<T> {
    keywords: &'static [&'static str],
    label: T,
}

impl<T> KeywordRule<T> {
    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|keyword| starts_word(text, keyword))
    }
}

fn starts_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(index, _)| {
        text[..index].chars().next_back().map_or(true, |previous| !previous.is_alphanumeric())
    })
}

const INDUSTRY_RULES: &[KeywordRule<&str>] = &[
    KeywordRule {
        keywords: &[
            "ecommerce",
            "e-commerce",
            "online store",
            "web store",
            "my store",
            "our store",
            "shop",
            "our products",
            "my products",
            "shopping cart",
            "inventory",
            "tienda",
            "productos",
            "carrito",
            "inventario",
        ],
        label: "E-commerce",
    },
    KeywordRule {
        keywords: &["crm", "client", "leads", "salesforce", "hubspot", "pipedrive", "cliente"],
        label: "CRM",
    },
    KeywordRule {
        keywords: &[
            "marketing",
            "campaign",
            "newsletter",
            "social media",
            "seo",
            "campaña",
            "redes sociales",
        ],
        label: "Marketing",
    },
    KeywordRule {
        keywords: &[
            "finance",
            "invoice",
            "accounting",
            "billing",
            "payment",
            "finanzas",
            "factura",
            "contabilidad",
            "pago",
        ],
        label: "Finance",
    },
    KeywordRule {
        keywords: &[
            "human resources",
            "recruit",
            "hiring",
            "onboarding",
            "employee",
            "payroll",
            "recursos humanos",
            "empleado",
            "nómina",
            "contratación",
        ],
        label: "HR",
    },
    KeywordRule {
        keywords: &[
            "support",
            "ticket",
            "helpdesk",
            "customer service",
            "soporte",
            "atención al cliente",
        ],
        label: "Support",
    },
    KeywordRule {
        keywords: &[
            "operations",
            "logistics",
            "supply chain",
            "warehouse",
            "erp system",
            "erp",
            "operaciones",
            "logística",
            "almacén",
        ],
        label: "Operations",
    },
];

const SIZE_RULES: &[KeywordRule<BusinessSize>] = &[
    KeywordRule { keywords: &["startup", "start-up", "emprendimiento"], label: BusinessSize::Startup },
    KeywordRule {
        keywords: &[
            "large company",
            "enterprise",
            "corporation",
            "multinational",
            "empresa grande",
            "corporación",
            "multinacional",
        ],
        label: BusinessSize::Enterprise,
    },
    KeywordRule {
        keywords: &["medium company", "medium-sized", "smb", "empresa mediana", "mediana empresa", "pyme"],
        label: BusinessSize::Medium,
    },
];

const GOAL_RULES: &[KeywordRule<&str>] = &[
    KeywordRule { keywords: &["automat", "automatiz"], label: "process automation" },
    KeywordRule {
        keywords: &["sales", "sell", "revenue", "ventas", "vender", "ingresos"],
        label: "increase sales",
    },
    KeywordRule {
        keywords: &["efficien", "productiv", "save time", "eficien", "ahorrar tiempo"],
        label: "improve efficiency",
    },
    KeywordRule {
        keywords: &[
            "customer experience",
            "customer satisfaction",
            "experiencia del cliente",
            "satisfacción",
        ],
        label: "enhance customer experience",
    },
    KeywordRule {
        keywords: &["integrat", "connect", "sync", "integra", "conectar"],
        label: "systems integration",
    },
    KeywordRule {
        keywords: &["analytic", "report", "dashboard", "metric", "análisis", "informe", "métrica"],
        label: "data analytics",
    },
    KeywordRule {
        keywords: &["monitor", "alert", "notif", "alerta"],
        label: "monitoring and alerts",
    },
];

const PAIN_POINT_RULES: &[KeywordRule<&str>] = &[
    KeywordRule {
        keywords: &["manual", "repetitive", "by hand", "repetitiv", "a mano"],
        label: "manual processes",
    },
    KeywordRule {
        keywords: &["slow", "bottleneck", "delay", "takes too long", "lento", "cuello de botella", "retraso"],
        label: "slow processes",
    },
    KeywordRule { keywords: &["error", "mistake", "equivoca"], label: "human errors" },
    KeywordRule {
        keywords: &[
            "disconnected",
            "not integrated",
            "no integration",
            "lack of integration",
            "silo",
            "desconectad",
            "sin integración",
        ],
        label: "lacks integration",
    },
    KeywordRule {
        keywords: &["visibility", "no insight", "don't know", "visibilidad", "no sabemos"],
        label: "lack of visibility",
    },
    KeywordRule {
        keywords: &["scale", "scaling", "scalab", "growing fast", "can't keep up", "crecimiento"],
        label: "scalability limits",
    },
];

/// Builds a profile from user-authored message bodies.
///
/// Total and deterministic: an empty slice yields [`BusinessProfile::default`].
pub fn extract_profile<S: AsRef<str>>(user_messages: &[S]) -> BusinessProfile {
    let text = normalize_text(user_messages);

    let industry = INDUSTRY_RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map_or(GENERAL_INDUSTRY, |rule| rule.label)
        .to_string();

    let size = SIZE_RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map_or(BusinessSize::Small, |rule| rule.label);

    BusinessProfile {
        industry,
        size,
        goals: collect_labels(GOAL_RULES, &text, DEFAULT_GOAL),
        pain_points: collect_labels(PAIN_POINT_RULES, &text, DEFAULT_PAIN_POINT),
    }
}

/// Same as [`extract_profile`] but filters assistant turns out first.
pub fn extract_from_transcript(transcript: &[ChatMessage]) -> BusinessProfile {
    let user_messages = transcript
        .iter()
        .filter(|message| message.is_user())
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>();
    extract_profile(&user_messages)
}

fn normalize_text<S: AsRef<str>>(messages: &[S]) -> String {
    messages.iter().map(|message| message.as_ref().to_lowercase()).collect::<Vec<_>>().join(" ")
}

fn collect_labels(rules: &[KeywordRule<&'static str>], text: &str, fallback: &str) -> Vec<String> {
    let labels = rules
        .iter()
        .filter(|rule| rule.matches(text))
        .map(|rule| rule.label.to_string())
        .collect::<Vec<_>>();

    if labels.is_empty() {
        vec![fallback.to_string()]
    } else {
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_from_transcript, extract_profile};
    use crate::domain::conversation::ChatMessage;
    use crate::domain::profile::BusinessProfile;
    use crate::domain::template::BusinessSize;

    #[test]
    fn empty_transcript_yields_default_profile() {
        let empty: [&str; 0] = [];
        let profile = extract_profile(&empty);

        assert_eq!(profile, BusinessProfile::default());
        assert_eq!(profile.industry, "General");
        assert_eq!(profile.size, BusinessSize::Small);
        assert_eq!(profile.goals, vec!["process automation".to_string()]);
        assert_eq!(profile.pain_points, vec!["inefficient manual processes".to_string()]);
    }

    #[test]
    fn unrelated_text_keeps_defaults() {
        let profile = extract_profile(&["Hello there, nice weather today."]);
        assert_eq!(profile, BusinessProfile::default());
    }

    #[test]
    fn industry_takes_first_rule_in_table_order() {
        // "client" (CRM) and "invoice" (Finance) both appear; "my store" wins over both.
        let profile = extract_profile(&[
            "I send an invoice to every client of my store",
        ]);
        assert_eq!(profile.industry, "E-commerce");

        let profile = extract_profile(&["We invoice each client monthly"]);
        assert_eq!(profile.industry, "CRM");
    }

    #[test]
    fn size_takes_first_rule_in_table_order() {
        let profile = extract_profile(&["A startup spun out of a large company"]);
        assert_eq!(profile.size, BusinessSize::Startup);

        let profile = extract_profile(&["We are a corporation, not an SMB"]);
        assert_eq!(profile.size, BusinessSize::Enterprise);

        let profile = extract_profile(&["Somos una pyme"]);
        assert_eq!(profile.size, BusinessSize::Medium);
    }

    #[test]
    fn goals_and_pain_points_accumulate_in_table_order() {
        let profile = extract_profile(&[
            "We want to automate order handling and increase sales.",
            "Processing is slow, everything is manual and full of errors.",
            "We also need better reports.",
        ]);

        assert_eq!(
            profile.goals,
            vec![
                "process automation".to_string(),
                "increase sales".to_string(),
                "data analytics".to_string(),
            ]
        );
        assert_eq!(
            profile.pain_points,
            vec![
                "manual processes".to_string(),
                "slow processes".to_string(),
                "human errors".to_string(),
            ]
        );
    }

    #[test]
    fn matching_is_case_insensitive_and_covers_spanish() {
        let profile = extract_profile(&[
            "Tengo una TIENDA online y quiero AUTOMATIZAR el inventario, todo es MANUAL y LENTO",
        ]);

        assert_eq!(profile.industry, "E-commerce");
        assert_eq!(profile.goals, vec!["process automation".to_string()]);
        assert_eq!(
            profile.pain_points,
            vec!["manual processes".to_string(), "slow processes".to_string()]
        );
    }

    #[test]
    fn transcript_helper_ignores_assistant_turns() {
        let transcript = vec![
            ChatMessage::assistant("Do you run an online store with inventory?"),
            ChatMessage::user("No, we handle hiring and onboarding for a medium company."),
        ];

        let profile = extract_from_transcript(&transcript);
        assert_eq!(profile.industry, "HR");
        assert_eq!(profile.size, BusinessSize::Medium);
    }

    #[test]
    fn keywords_inside_unrelated_words_do_not_fire() {
        let profile = extract_profile(&["We want to improve productivity of our law firm"]);
        assert_eq!(profile.industry, "General");
        assert_eq!(profile.goals, vec!["improve efficiency".to_string()]);

        let profile = extract_profile(&["We are an enterprise law firm"]);
        assert_eq!(profile.industry, "General");
        assert_eq!(profile.size, BusinessSize::Enterprise);

        let profile = extract_profile(&["Our fiscal reporting takes forever"]);
        assert!(!profile.pain_points.contains(&"scalability limits".to_string()));
        assert_eq!(profile.goals, vec!["data analytics".to_string()]);

        let profile = extract_profile(&["Our team leader runs a workshop"]);
        assert_eq!(profile.industry, "General");
    }

    #[test]
    fn whole_word_keywords_still_match() {
        let profile = extract_profile(&["We need to scale our ERP and chase more leads"]);
        assert_eq!(profile.industry, "CRM");
        assert_eq!(profile.pain_points, vec!["scalability limits".to_string()]);

        let profile = extract_profile(&["Our ERP system is a mess"]);
        assert_eq!(profile.industry, "Operations");

        let profile = extract_profile(&["We sell our products in a small e-shop"]);
        assert_eq!(profile.industry, "E-commerce");
    }

    #[test]
    fn extraction_is_deterministic() {
        let messages = ["Our shop sells products online and we want more revenue"];
        assert_eq!(extract_profile(&messages), extract_profile(&messages));
    }
}
