//! Chat completion seam.
//!
//! [`HttpLlmClient`] speaks the OpenAI-compatible chat completions API (OpenAI,
//! Ollama) and the Anthropic messages API. [`OfflineLlmClient`] answers from a
//! small keyword table and doubles as the fallback when a hosted call fails.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use autobiz_core::config::{AppConfig, LlmProvider};
use autobiz_core::domain::conversation::{ChatMessage, Role};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const SYSTEM_PROMPT: &str = "You are an expert business process automation consultant. \
When a user describes their business, ask specific questions to understand their processes, \
identify automation opportunities, suggest concrete workflows and explain the business value \
of each suggestion. Keep a professional but friendly tone and focus on practical solutions.";

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1_000;
const RETRY_BACKOFF_MS: u64 = 250;

#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            messages,
            temperature: 0.7,
            max_tokens: MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Content of the most recent user turn, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages.iter().rev().find(|message| message.is_user()).map(|message| message.content.as_str())
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    fn name(&self) -> &str;
}

const CANNED_REPLIES: &[(&[&str], &str)] = &[
    (
        &["email", "correo", "newsletter"],
        "To automate your emails, have a look at our marketing automation and automatic \
notification templates. What kind of emails do you need to automate?",
    ),
    (
        &["crm", "client", "cliente", "leads"],
        "We have strong templates for CRM integration and customer management. \
Which CRM are you using today?",
    ),
    (
        &["inventory", "inventario", "stock"],
        "For inventory management we can help with stock synchronization workflows, \
low-stock alerts and automatic reports. Which inventory system do you use?",
    ),
];

pub const DEFAULT_CANNED_REPLY: &str = "I understand you want to automate processes in your \
business. Could you tell me more specifically which repetitive tasks you would like to automate?";

/// Keyword-matched replies that never touch the network.
#[derive(Clone, Debug, Default)]
pub struct OfflineLlmClient;

impl OfflineLlmClient {
    pub fn new() -> Self {
        Self
    }

    pub fn reply_for(message: &str) -> &'static str {
        let message = message.to_lowercase();
        CANNED_REPLIES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| message.contains(keyword)))
            .map_or(DEFAULT_CANNED_REPLY, |(_, reply)| *reply)
    }
}

#[async_trait]
impl LlmClient for OfflineLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        Ok(Self::reply_for(request.last_user_message().unwrap_or_default()).to_string())
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self { role, content: &message.content }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Hosted completion client with per-request timeout and bounded retries.
pub struct HttpLlmClient {
    client: Client,
    provider: LlmProvider,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    max_retries: u32,
}

impl std::fmt::Debug for HttpLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLlmClient")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl HttpLlmClient {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = config.llm.provider;
        if provider == LlmProvider::Offline {
            bail!("offline provider does not use an HTTP client");
        }
        let base_url = config
            .llm_base_url()
            .ok_or_else(|| anyhow!("no base url for llm provider `{}`", provider.as_str()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()
            .context("failed to build llm http client")?;

        Ok(Self {
            client,
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            max_retries: config.llm.max_retries,
        })
    }

    async fn send_once(&self, request: &CompletionRequest) -> Result<String> {
        match self.provider {
            LlmProvider::Anthropic => self.send_anthropic(request).await,
            _ => self.send_openai_compatible(request).await,
        }
    }

    async fn send_openai_compatible(&self, request: &CompletionRequest) -> Result<String> {
        let mut messages = vec![WireMessage { role: "system", content: &request.system }];
        messages.extend(request.messages.iter().map(WireMessage::from));
        let body = OpenAiRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut builder = self.client.post(format!("{}/chat/completions", self.base_url)).json(&body);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.context("llm request failed")?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("llm provider returned {status}: {detail}");
        }

        let parsed: OpenAiResponse = response.json().await.context("malformed llm response")?;
        parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| anyhow!("llm response contained no content"))
    }

    async fn send_anthropic(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("anthropic provider requires an api key"))?;
        let body = AnthropicRequest {
            model: &self.model,
            system: &request.system,
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .context("llm request failed")?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("llm provider returned {status}: {detail}");
        }

        let parsed: AnthropicResponse = response.json().await.context("malformed llm response")?;
        let text = parsed
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            bail!("llm response contained no content");
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await {
                Ok(reply) => {
                    debug!(
                        event_name = "consultant.llm.completed",
                        provider = self.provider.as_str(),
                        attempt,
                        "llm completion succeeded"
                    );
                    return Ok(reply);
                }
                Err(error) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        event_name = "consultant.llm.retry",
                        provider = self.provider.as_str(),
                        attempt,
                        error = %error,
                        "llm completion failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt)))
                        .await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }
}

/// Builds the client for the configured provider.
pub fn client_from_config(config: &AppConfig) -> Result<Arc<dyn LlmClient>> {
    match config.llm.provider {
        LlmProvider::Offline => Ok(Arc::new(OfflineLlmClient::new())),
        _ => Ok(Arc::new(HttpLlmClient::from_config(config)?)),
    }
}
