use std::str::FromStr;
use std::sync::Arc;

use autobiz_agent::checkout::{PaymentProcessor, PurchaseOutcome};
use autobiz_agent::conversation::{ChatSession, SessionId, SessionStore};
use autobiz_agent::runtime::{ConsultantReply, ConsultantRuntime};
use autobiz_core::accounts::UserDirectory;
use autobiz_core::catalog::{CatalogStore, CategoryCount, TemplateQuery};
use autobiz_core::domain::account::{Plan, User, UserId};
use autobiz_core::domain::profile::BusinessProfile;
use autobiz_core::domain::recommendation::Recommendation;
use autobiz_core::domain::template::Template;
use autobiz_core::errors::{ApplicationError, DomainError, InterfaceError};
use autobiz_core::extract::extract_profile;
use autobiz_core::recommend::recommend;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::health;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub users: Arc<UserDirectory>,
    pub sessions: Arc<SessionStore>,
    pub consultant: Arc<ConsultantRuntime>,
    pub checkout: Arc<dyn PaymentProcessor>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/v1/templates", get(search_templates).post(create_template))
        .route("/api/v1/templates/categories", get(list_categories))
        .route("/api/v1/templates/tags", get(list_tags))
        .route(
            "/api/v1/templates/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/api/v1/profile", post(build_profile))
        .route("/api/v1/recommendations", post(build_recommendations))
        .route("/api/v1/accounts/register", post(register))
        .route("/api/v1/accounts/login", post(login))
        .route("/api/v1/accounts/{id}/plan", post(change_plan))
        .route("/api/v1/chat", post(chat))
        .route("/api/v1/sessions", get(list_sessions))
        .route("/api/v1/sessions/{id}", get(get_session))
        .route("/api/v1/purchases", post(purchase))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub correlation_id: String,
}

/// Handler error carrying the interface classification and its correlation id.
#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn from_application(error: ApplicationError) -> Self {
        let interface = error.into_interface(Uuid::new_v4().to_string());
        warn!(
            event_name = "api.request.failed",
            correlation_id = %interface.correlation_id(),
            error = %interface,
            "request failed"
        );
        Self(interface)
    }
}

impl From<ApplicationError> for ApiError {
    fn from(value: ApplicationError) -> Self {
        Self::from_application(value)
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::from_application(ApplicationError::Domain(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            InterfaceError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, Some(message.clone()))
            }
            InterfaceError::NotFound { message, .. } => (StatusCode::NOT_FOUND, Some(message.clone())),
            InterfaceError::PaymentRequired { message, .. } => {
                (StatusCode::PAYMENT_REQUIRED, Some(message.clone()))
            }
            InterfaceError::ServiceUnavailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, None),
            InterfaceError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = ErrorBody {
            error: self.0.user_message().to_string(),
            detail,
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct TemplateSearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub complexity: Option<String>,
    pub size: Option<String>,
    /// Comma-separated; a template matches when it carries any of them.
    pub tag: Option<String>,
    pub max_price: Option<u32>,
}

impl TemplateSearchParams {
    fn into_query(self) -> Result<TemplateQuery, DomainError> {
        Ok(TemplateQuery {
            text: self.q,
            category: parse_optional(self.category.as_deref())?,
            complexity: parse_optional(self.complexity.as_deref())?,
            business_size: parse_optional(self.size.as_deref())?,
            tags: self
                .tag
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|tag| !tag.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            max_price: self.max_price,
        })
    }
}

fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    value.map(str::trim).filter(|value| !value.is_empty()).map(str::parse).transpose()
}

async fn search_templates(
    State(state): State<AppState>,
    Query(params): Query<TemplateSearchParams>,
) -> Result<Json<Vec<Arc<Template>>>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.catalog.snapshot().search(&query)))
}

async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryCount>> {
    Json(state.catalog.snapshot().categories())
}

async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Arc<Template>>, ApiError> {
    let snapshot = state.catalog.snapshot();
    let template = snapshot.find(&id).cloned().ok_or(DomainError::TemplateNotFound(id))?;
    Ok(Json(template))
}

async fn list_tags(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.snapshot().tags())
}

async fn create_template(
    State(state): State<AppState>,
    Json(template): Json<Template>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    state.catalog.add(template.clone())?;
    info!(event_name = "api.catalog.template_added", template_id = %template.id, "template added");
    Ok((StatusCode::CREATED, Json(template)))
}

async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(template): Json<Template>,
) -> Result<Json<Template>, ApiError> {
    if template.id.as_str() != id {
        return Err(DomainError::InvariantViolation(format!(
            "template id `{}` does not match path `{id}`",
            template.id
        ))
        .into());
    }

    state.catalog.update(&id, template.clone())?;
    info!(event_name = "api.catalog.template_updated", template_id = %id, "template updated");
    Ok(Json(template))
}

async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Arc<Template>>, ApiError> {
    let removed = state.catalog.remove(&id)?;
    info!(event_name = "api.catalog.template_removed", template_id = %id, "template removed");
    Ok(Json(removed))
}

// ---------------------------------------------------------------------------
// Profiles and recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub messages: Vec<String>,
    pub profile: Option<BusinessProfile>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub profile: BusinessProfile,
    pub recommendations: Vec<Recommendation>,
}

fn require_messages(messages: &[String]) -> Result<(), DomainError> {
    if messages.iter().all(|message| message.trim().is_empty()) {
        return Err(DomainError::InvariantViolation(
            "at least one non-empty message is required".to_string(),
        ));
    }
    Ok(())
}

async fn build_profile(Json(request): Json<ProfileRequest>) -> Result<Json<BusinessProfile>, ApiError> {
    require_messages(&request.messages)?;
    Ok(Json(extract_profile(&request.messages)))
}

async fn build_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let profile = match request.profile {
        Some(profile) => profile,
        None => {
            require_messages(&request.messages)?;
            extract_profile(&request.messages)
        }
    };

    let recommendations = recommend(&profile, &state.catalog.snapshot());
    Ok(Json(RecommendationResponse { profile, recommendations }))
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub plan: Option<Plan>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let plan = request.plan.unwrap_or(Plan::Freemium);
    let user = state.users.register(&request.name, &request.email, &request.password, plan)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.users.authenticate(&request.email, &request.password)?;
    info!(event_name = "api.account.login", user_id = %user.id, "user signed in");
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct PlanChangeRequest {
    pub plan: Plan,
}

async fn change_plan(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<PlanChangeRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.change_plan(user_id, request.plan)?))
}

// ---------------------------------------------------------------------------
// Chat and checkout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<SessionId>,
    pub user_id: Option<UserId>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub reply: ConsultantReply,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<u32>,
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    require_messages(std::slice::from_ref(&request.message))?;

    let credits_remaining = match request.user_id {
        Some(user_id) => Some(state.users.consume_credit(user_id)?.credits),
        None => None,
    };

    // Held until the reply is recorded; a second turn on this session waits here.
    let mut session = state.sessions.checkout(request.session_id, request.user_id).await;
    let reply = state.consultant.respond(&mut session, &request.message).await?;

    Ok(Json(ChatResponse { session_id: session.id, reply, credits_remaining }))
}

#[derive(Debug, Deserialize)]
pub struct SessionListParams {
    pub user_id: UserId,
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<SessionListParams>,
) -> Result<Json<Vec<ChatSession>>, ApiError> {
    if state.users.get(params.user_id).is_none() {
        return Err(DomainError::AccountNotFound(params.user_id.to_string()).into());
    }
    Ok(Json(state.sessions.for_user(params.user_id).await))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<ChatSession>, ApiError> {
    let session =
        state.sessions.get(id).await.ok_or_else(|| DomainError::SessionNotFound(id.to_string()))?;
    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub template_id: String,
    pub user_id: UserId,
}

async fn purchase(
    State(state): State<AppState>,
    Json(request): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseOutcome>), ApiError> {
    if state.users.get(request.user_id).is_none() {
        return Err(DomainError::AccountNotFound(request.user_id.to_string()).into());
    }

    let outcome = state.checkout.process_purchase(&request.template_id, request.user_id).await;
    let status = if outcome.success { StatusCode::OK } else { StatusCode::NOT_FOUND };
    Ok((status, Json(outcome)))
}
