//! In-memory demo account directory with plan credits.
//!
//! Authentication here is a toy check (known email plus a non-empty password);
//! nothing is persisted beyond the process.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use tracing::info;

use crate::domain::account::{Plan, User, UserId};
use crate::errors::DomainError;

pub const DEMO_EMAIL: &str = "demo@autobusiness.ai";
pub const DEMO_NAME: &str = "Demo User";

#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-populated with the demo account on the Pro plan.
    pub fn with_demo_user() -> Self {
        let directory = Self::new();
        let demo = User {
            id: UserId::new(),
            name: DEMO_NAME.to_string(),
            email: DEMO_EMAIL.to_string(),
            plan: Plan::Pro,
            credits: Plan::Pro.credits(),
            created_at: Utc::now(),
        };
        directory.users.write().unwrap_or_else(PoisonError::into_inner).insert(demo.id, demo);
        directory
    }

    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, user_id: UserId) -> Option<User> {
        self.users.read().unwrap_or_else(PoisonError::into_inner).get(&user_id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let email = normalize_email(email);
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|user| user.email == email)
            .cloned()
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        if password.trim().is_empty() {
            return Err(DomainError::InvalidCredentials);
        }
        self.find_by_email(email).ok_or(DomainError::InvalidCredentials)
    }

    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        plan: Plan,
    ) -> Result<User, DomainError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() {
            return Err(DomainError::InvariantViolation("name must not be empty".to_string()));
        }
        if !email.contains('@') {
            return Err(DomainError::InvariantViolation(format!("`{email}` is not a valid email")));
        }
        if password.trim().is_empty() {
            return Err(DomainError::InvariantViolation("password must not be empty".to_string()));
        }

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.values().any(|user| user.email == email) {
            return Err(DomainError::DuplicateAccount(email));
        }

        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            email,
            plan,
            credits: plan.credits(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());

        info!(
            event_name = "accounts.user.registered",
            user_id = %user.id,
            plan = plan.as_str(),
            "registered account"
        );
        Ok(user)
    }

    /// Spends one consultation credit and returns the updated user.
    pub fn consume_credit(&self, user_id: UserId) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| DomainError::AccountNotFound(user_id.to_string()))?;

        if user.credits == 0 {
            return Err(DomainError::InsufficientCredits { plan: user.plan.as_str().to_string() });
        }
        user.credits -= 1;
        Ok(user.clone())
    }

    /// Switches plan and resets credits to the new plan's allowance.
    pub fn change_plan(&self, user_id: UserId, plan: Plan) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| DomainError::AccountNotFound(user_id.to_string()))?;

        user.plan = plan;
        user.credits = plan.credits();

        info!(
            event_name = "accounts.plan.changed",
            user_id = %user_id,
            plan = plan.as_str(),
            "changed account plan"
        );
        Ok(user.clone())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
