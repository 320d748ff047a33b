use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::charts::Charts;
use crate::chat::{ChatTurn, SessionStore};
use crate::error::{AppError, AppResult};
use crate::ml::ModelHandles;
use crate::pipeline::{self, PostRecord};

pub struct AppState {
    pub models: ModelHandles,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(models: ModelHandles) -> Self {
        Self {
            models,
            sessions: SessionStore::new(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// One post per line; blank lines are ignored.
    #[schema(example = "I love this!\n\nI am so angry right now")]
    pub text: String,
}

#[derive(Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub posts: Vec<PostRecord>,
    pub warning: Option<String>,
    pub report: String,
    pub charts: Charts,
}

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    pub session_id: Option<Uuid>,
    #[schema(example = "I am furious about this!")]
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub emotion: Option<String>,
    pub reply: Option<String>,
    pub history: Vec<ChatTurn>,
}

#[derive(Serialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub session_id: Uuid,
    pub history: Vec<ChatTurn>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub sentiment_model: String,
    pub emotion_model: String,
    pub chat_sessions: usize,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_posts))
        .route("/api/chat", post(send_chat))
        .route("/api/chat/:session_id", get(get_chat_history))
        .with_state(state)
}

/// Analyze a block of posts
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Per-post results, report and charts", body = AnalyzeResponse),
        (status = 502, description = "A classifier failed; the whole batch is discarded")
    ),
    tag = "analysis"
)]
pub async fn analyze_posts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalyzeResponse>> {
    let outcome = pipeline::analyze_batch(&state.models, &req.text).await?;
    let charts = Charts::from_posts(&outcome.posts);

    Ok(Json(AnalyzeResponse {
        report: pipeline::text_report(&outcome.posts),
        posts: outcome.posts,
        warning: outcome.warning,
        charts,
    }))
}

/// Send a chat message
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Reply and updated transcript", body = ChatResponse),
        (status = 502, description = "Emotion classifier failed; nothing was recorded")
    ),
    tag = "chat"
)]
pub async fn send_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let exchange = state
        .sessions
        .send(&state.models, req.session_id, &req.message)
        .await?;

    let (emotion, reply) = match exchange.reply {
        Some(r) => (Some(r.emotion), Some(r.reply.to_string())),
        None => (None, None),
    };

    Ok(Json(ChatResponse {
        session_id: exchange.session_id,
        emotion,
        reply,
        history: exchange.history,
    }))
}

/// Get a session's transcript
#[utoipa::path(
    get,
    path = "/api/chat/{session_id}",
    params(("session_id" = Uuid, Path, description = "Chat session id")),
    responses(
        (status = 200, description = "Transcript in order", body = ChatHistoryResponse),
        (status = 404, description = "Unknown session")
    ),
    tag = "chat"
)]
pub async fn get_chat_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<ChatHistoryResponse>> {
    let history = state
        .sessions
        .history(&session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("chat session {}", session_id)))?;

    Ok(Json(ChatHistoryResponse {
        session_id,
        history,
    }))
}

/// Service health and loaded models
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (sentiment_model, emotion_model) = state.models.backend_names();
    Json(HealthResponse {
        status: "ok".to_string(),
        sentiment_model,
        emotion_model,
        chat_sessions: state.sessions.session_count().await,
    })
}
