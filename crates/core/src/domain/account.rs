use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Subscription tiers from the pricing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Freemium,
    Starter,
    Pro,
    Business,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Self::Freemium, Self::Starter, Self::Pro, Self::Business];

    /// Consultations included per billing period.
    pub fn credits(&self) -> u32 {
        match self {
            Self::Freemium => 1,
            Self::Starter => 3,
            Self::Pro => 6,
            Self::Business => 15,
        }
    }

    pub fn monthly_price(&self) -> u32 {
        match self {
            Self::Freemium => 0,
            Self::Starter => 29,
            Self::Pro => 49,
            Self::Business => 78,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Freemium => "freemium",
            Self::Starter => "starter",
            Self::Pro => "pro",
            Self::Business => "business",
        }
    }
}

impl FromStr for Plan {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "freemium" | "free" => Ok(Self::Freemium),
            "starter" => Ok(Self::Starter),
            "pro" => Ok(Self::Pro),
            "business" | "empresa" => Ok(Self::Business),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown plan `{other}` (expected freemium|starter|pro|business)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub plan: Plan,
    pub credits: u32,
    pub created_at: DateTime<Utc>,
}
