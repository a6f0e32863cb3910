use std::sync::Arc;

use anyhow::Result;
use autobiz_core::catalog::CatalogStore;
use autobiz_core::domain::conversation::ChatMessage;
use autobiz_core::domain::profile::BusinessProfile;
use autobiz_core::domain::recommendation::Recommendation;
use autobiz_core::errors::DomainError;
use autobiz_core::extract::extract_from_transcript;
use autobiz_core::recommend::TemplateRecommender;
use serde::Serialize;
use tracing::{info, warn};

use crate::conversation::ChatSession;
use crate::llm::{CompletionRequest, LlmClient, OfflineLlmClient};
use crate::render::SummaryRenderer;

/// Prior messages needed before a reply carries the recommendation summary.
pub const SUMMARY_AFTER_MESSAGES: usize = 2;

#[derive(Clone, Debug, Serialize)]
pub struct ConsultantReply {
    pub reply: String,
    pub profile: BusinessProfile,
    pub recommendations: Vec<Recommendation>,
    pub used_fallback: bool,
}

pub struct ConsultantRuntime {
    catalog: Arc<CatalogStore>,
    llm: Arc<dyn LlmClient>,
    recommender: TemplateRecommender,
    renderer: SummaryRenderer,
    temperature: f32,
}

impl ConsultantRuntime {
    pub fn new(catalog: Arc<CatalogStore>, llm: Arc<dyn LlmClient>) -> Result<Self> {
        Ok(Self {
            catalog,
            llm,
            recommender: TemplateRecommender::new(),
            renderer: SummaryRenderer::new()?,
            temperature: 0.7,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn llm_name(&self) -> &str {
        self.llm.name()
    }

    /// Records the user turn, re-derives the profile from the whole transcript
    /// and answers. A failing LLM call degrades to the canned reply.
    pub async fn respond(
        &self,
        session: &mut ChatSession,
        text: &str,
    ) -> Result<ConsultantReply, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::InvariantViolation("message must not be empty".to_string()));
        }

        let prior_messages = session.len();
        session.push(ChatMessage::user(text));

        let profile = extract_from_transcript(&session.messages);
        let catalog = self.catalog.snapshot();
        let recommendations = self.recommender.recommend(&profile, &catalog);

        let request = CompletionRequest::new(session.messages.clone()).with_temperature(self.temperature);
        let (mut reply, used_fallback) = match self.llm.complete(&request).await {
            Ok(reply) => (reply, false),
            Err(error) => {
                warn!(
                    event_name = "consultant.llm.fallback",
                    session_id = %session.id,
                    provider = self.llm.name(),
                    error = %error,
                    "llm completion failed, using canned reply"
                );
                (OfflineLlmClient::reply_for(text).to_string(), true)
            }
        };

        if !recommendations.is_empty() && prior_messages >= SUMMARY_AFTER_MESSAGES {
            match self.renderer.render(&recommendations) {
                Ok(summary) => {
                    reply.push_str("\n\n");
                    reply.push_str(&summary);
                }
                Err(error) => warn!(
                    event_name = "consultant.summary.render_failed",
                    session_id = %session.id,
                    error = %error,
                    "could not render recommendation summary"
                ),
            }
        }

        session.push(ChatMessage::assistant(reply.clone()));

        info!(
            event_name = "consultant.reply.sent",
            session_id = %session.id,
            industry = %profile.industry,
            recommendations = recommendations.len(),
            used_fallback,
            "consultant replied"
        );

        Ok(ConsultantReply { reply, profile, recommendations, used_fallback })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use autobiz_core::catalog::CatalogStore;
    use autobiz_core::errors::DomainError;

    use super::ConsultantRuntime;
    use crate::conversation::ChatSession;
    use crate::llm::{CompletionRequest, LlmClient, OfflineLlmClient};

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Err(anyhow!("upstream unavailable"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn runtime(llm: Arc<dyn LlmClient>) -> ConsultantRuntime {
        ConsultantRuntime::new(Arc::new(CatalogStore::default()), llm).expect("runtime")
    }

    #[tokio::test]
    async fn first_reply_has_no_summary_but_later_replies_do() {
        let runtime = runtime(Arc::new(OfflineLlmClient::new()));
        let mut session = ChatSession::new(None);

        let first = runtime
            .respond(&mut session, "I run an online store and process orders by hand")
            .await
            .expect("first reply");
        assert_eq!(first.profile.industry, "E-commerce");
        assert!(!first.recommendations.is_empty());
        assert!(!first.reply.contains("Recommended automations"));
        assert!(!first.used_fallback);

        let second = runtime
            .respond(&mut session, "We want to automate and increase sales")
            .await
            .expect("second reply");
        assert!(second.reply.contains("Recommended automations"));
        assert_eq!(session.len(), 4);
    }

    #[tokio::test]
    async fn failing_llm_falls_back_to_canned_reply() {
        let runtime = runtime(Arc::new(FailingLlm));
        let mut session = ChatSession::new(None);

        let reply = runtime.respond(&mut session, "Our CRM is a mess").await.expect("reply");
        assert!(reply.used_fallback);
        assert_eq!(reply.reply, OfflineLlmClient::reply_for("Our CRM is a mess"));
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_touching_the_session() {
        let runtime = runtime(Arc::new(OfflineLlmClient::new()));
        let mut session = ChatSession::new(None);

        let result = runtime.respond(&mut session, "   ").await;
        assert!(matches!(result, Err(DomainError::InvariantViolation(_))));
        assert!(session.is_empty());
    }
}
