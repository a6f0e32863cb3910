//! Consultant runtime
//!
//! Wraps the deterministic core (profile extraction and template
//! recommendation) with the parts that talk to the outside world:
//!
//! - `llm`: pluggable chat completion (hosted providers or canned offline replies)
//! - `conversation`: chat sessions and the in-process session store
//! - `runtime`: one consultant turn, from user text to reply plus recommendations
//! - `render`: the recommendation summary appended to replies
//! - `checkout`: the simulated purchase step
//!
//! The LLM only writes conversational text. Scores, rankings and costs always
//! come from the core recommender.

pub mod checkout;
pub mod conversation;
pub mod llm;
pub mod render;
pub mod runtime;

pub use checkout::{PaymentProcessor, PurchaseOutcome, SimulatedCheckout};
pub use conversation::{ChatSession, SessionId, SessionStore};
pub use llm::{client_from_config, CompletionRequest, HttpLlmClient, LlmClient, OfflineLlmClient};
pub use render::SummaryRenderer;
pub use runtime::{ConsultantReply, ConsultantRuntime};
