//! Simulated purchase confirmation.
//!
//! No money moves: a purchase succeeds after a fixed delay when the template id
//! resolves in the current catalog snapshot.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use autobiz_core::catalog::CatalogStore;
use autobiz_core::domain::account::UserId;
use autobiz_core::domain::template::TemplateId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

pub const TEMPLATE_NOT_FOUND: &str = "template not found";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PurchaseOutcome {
    pub success: bool,
    pub message: String,
    pub order_id: Option<Uuid>,
    pub template_id: TemplateId,
    pub user_id: UserId,
    pub amount: Option<Decimal>,
    pub processed_at: DateTime<Utc>,
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn process_purchase(&self, template_id: &str, user_id: UserId) -> PurchaseOutcome;
}

#[derive(Debug, Clone)]
pub struct SimulatedCheckout {
    catalog: Arc<CatalogStore>,
    confirmation_delay: Duration,
}

impl SimulatedCheckout {
    pub fn new(catalog: Arc<CatalogStore>, confirmation_delay: Duration) -> Self {
        Self { catalog, confirmation_delay }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedCheckout {
    async fn process_purchase(&self, template_id: &str, user_id: UserId) -> PurchaseOutcome {
        tokio::time::sleep(self.confirmation_delay).await;

        let snapshot = self.catalog.snapshot();
        let Some(template) = snapshot.find(template_id) else {
            info!(
                event_name = "checkout.purchase.rejected",
                template_id,
                user_id = %user_id,
                "purchase rejected for unknown template"
            );
            return PurchaseOutcome {
                success: false,
                message: TEMPLATE_NOT_FOUND.to_string(),
                order_id: None,
                template_id: TemplateId(template_id.to_string()),
                user_id,
                amount: None,
                processed_at: Utc::now(),
            };
        };

        let order_id = Uuid::new_v4();
        info!(
            event_name = "checkout.purchase.confirmed",
            template_id,
            user_id = %user_id,
            order_id = %order_id,
            "simulated purchase confirmed"
        );

        PurchaseOutcome {
            success: true,
            message: format!("Purchase of `{}` confirmed", template.name),
            order_id: Some(order_id),
            template_id: template.id.clone(),
            user_id,
            amount: Some(Decimal::from(template.price)),
            processed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use autobiz_core::catalog::CatalogStore;
    use autobiz_core::domain::account::UserId;
    use rust_decimal::Decimal;

    use super::{PaymentProcessor, SimulatedCheckout, TEMPLATE_NOT_FOUND};

    #[tokio::test]
    async fn known_template_purchase_succeeds() {
        let checkout = SimulatedCheckout::new(Arc::new(CatalogStore::default()), Duration::ZERO);
        let outcome = checkout.process_purchase("crm-lead-pipeline", UserId::new()).await;

        assert!(outcome.success);
        assert!(outcome.order_id.is_some());
        assert_eq!(outcome.amount, Some(Decimal::from(2_000u32)));
    }

    #[tokio::test]
    async fn unknown_template_reports_not_found() {
        let checkout = SimulatedCheckout::new(Arc::new(CatalogStore::default()), Duration::ZERO);
        let outcome = checkout.process_purchase("missing", UserId::new()).await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, TEMPLATE_NOT_FOUND);
        assert!(outcome.order_id.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn confirmation_waits_for_the_configured_delay() {
        let checkout =
            SimulatedCheckout::new(Arc::new(CatalogStore::default()), Duration::from_secs(2));
        let started = tokio::time::Instant::now();

        let outcome = checkout.process_purchase("crm-lead-pipeline", UserId::new()).await;
        assert!(outcome.success);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
