use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Industry entry that makes a template relevant to every profile industry.
pub const ANY_INDUSTRY: &str = "any";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    ECommerce,
    Crm,
    Finance,
    Marketing,
    Hr,
    Operations,
    Sales,
    Support,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 8] = [
        Self::ECommerce,
        Self::Crm,
        Self::Finance,
        Self::Marketing,
        Self::Hr,
        Self::Operations,
        Self::Sales,
        Self::Support,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ECommerce => "e-commerce",
            Self::Crm => "crm",
            Self::Finance => "finance",
            Self::Marketing => "marketing",
            Self::Hr => "hr",
            Self::Operations => "operations",
            Self::Sales => "sales",
            Self::Support => "support",
        }
    }

    /// Compares against a free-text industry label, ignoring case.
    pub fn matches_label(&self, label: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(label.trim())
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let normalized = if normalized == "ecommerce" { "e-commerce".to_string() } else { normalized };
        Self::ALL.into_iter().find(|category| category.as_str() == normalized).ok_or_else(|| {
            DomainError::InvariantViolation(format!("unknown template category `{value}`"))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessSize {
    Startup,
    Small,
    Medium,
    Enterprise,
}

impl BusinessSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for BusinessSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessSize {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "startup" => Ok(Self::Startup),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown business size `{other}` (expected startup|small|medium|enterprise)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Basic,
    Intermediate,
    Advanced,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown complexity `{other}` (expected basic|intermediate|advanced)"
            ))),
        }
    }
}

/// A price-tagged automation workflow offered in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub industry: Vec<String>,
    pub business_size: BusinessSize,
    pub complexity: Complexity,
    #[serde(rename = "estimatedROI")]
    pub estimated_roi: u32,
    pub implementation_time: String,
    pub price: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Template {
    /// True when any industry entry is the wildcard or overlaps `industry`
    /// as a substring in either direction.
    pub fn serves_industry(&self, industry: &str) -> bool {
        let industry = industry.trim().to_lowercase();
        if industry.is_empty() {
            return false;
        }

        self.industry.iter().any(|entry| {
            let entry = entry.trim().to_lowercase();
            if entry.is_empty() {
                return false;
            }
            entry == ANY_INDUSTRY || entry.contains(&industry) || industry.contains(&entry)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BusinessSize, Complexity, Template, TemplateCategory, TemplateId};

    fn template(industry: &[&str]) -> Template {
        Template {
            id: TemplateId::from("t-1"),
            name: "Test".to_string(),
            description: "Test template".to_string(),
            category: TemplateCategory::Operations,
            industry: industry.iter().map(ToString::to_string).collect(),
            business_size: BusinessSize::Small,
            complexity: Complexity::Basic,
            estimated_roi: 100,
            implementation_time: "1 week".to_string(),
            price: 100,
            features: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn industry_match_is_bidirectional_substring() {
        assert!(template(&["E-commerce"]).serves_industry("e-commerce"));
        assert!(template(&["Retail E-commerce"]).serves_industry("E-commerce"));
        assert!(template(&["CRM"]).serves_industry("CRM & Sales"));
        assert!(!template(&["Finance"]).serves_industry("Marketing"));
    }

    #[test]
    fn wildcard_industry_serves_everyone() {
        assert!(template(&["any"]).serves_industry("General"));
    }

    #[test]
    fn blank_entries_never_match() {
        assert!(!template(&[""]).serves_industry("General"));
        assert!(!template(&["Finance"]).serves_industry("  "));
    }

    #[test]
    fn category_parses_loose_spellings() {
        assert_eq!("ecommerce".parse::<TemplateCategory>().ok(), Some(TemplateCategory::ECommerce));
        assert_eq!("E-Commerce".parse::<TemplateCategory>().ok(), Some(TemplateCategory::ECommerce));
        assert_eq!("HR".parse::<TemplateCategory>().ok(), Some(TemplateCategory::Hr));
        assert!("legal".parse::<TemplateCategory>().is_err());
        assert!(TemplateCategory::ECommerce.matches_label("E-commerce"));
    }

    #[test]
    fn template_json_uses_catalog_field_names() {
        let raw = r#"{
            "id": "x",
            "name": "X",
            "description": "d",
            "category": "e-commerce",
            "industry": ["E-commerce"],
            "businessSize": "small",
            "complexity": "basic",
            "estimatedROI": 250,
            "implementationTime": "1-2 weeks",
            "price": 900
        }"#;
        let parsed: Template = serde_json::from_str(raw).expect("template should parse");
        assert_eq!(parsed.category, TemplateCategory::ECommerce);
        assert_eq!(parsed.estimated_roi, 250);
        assert!(parsed.features.is_empty());
    }
}
