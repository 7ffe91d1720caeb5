//! Axum route handlers for the Audit and Chat APIs.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::audit::gateway::{ChatTurn, DocumentInput};
use crate::audit::prompts::{CHAT_EMPTY_REPLY, CHAT_GREETING, CHAT_SYSTEM};
use crate::audit::reconciler::{reconcile, AnalysisResult, Reconciled};
use crate::audit::scoring::{score_signals, ScoreBreakdown};
use crate::audit::signals::Signals;
use crate::audit::status::{classify, StatusInfo};
use crate::errors::AppError;
use crate::llm_client::{LlmError, Role};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// One audit. `analysisId` and `analyzedAt` identify the request; `result`
/// depends only on the extractor text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub text: String,
    pub result: AnalysisResult,
}

impl AuditResponse {
    fn new(analysis_id: Uuid, reconciled: Reconciled) -> Self {
        Self {
            analysis_id,
            analyzed_at: Utc::now(),
            text: reconciled.text,
            result: reconciled.result,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    pub raw_text: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub breakdown: ScoreBreakdown,
    pub status: StatusInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    pub system_instruction: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/audit
///
/// Full pipeline: extractor call → JSON block → signals → score → status → merge.
pub async fn handle_audit(
    State(state): State<AppState>,
    Json(document): Json<DocumentInput>,
) -> Result<Json<AuditResponse>, AppError> {
    if document.payload().trim().is_empty() {
        return Err(AppError::Validation("base64 cannot be empty".to_string()));
    }
    if document.mime_type.trim().is_empty() {
        return Err(AppError::Validation("mimeType cannot be empty".to_string()));
    }

    let analysis_id = Uuid::new_v4();
    let span = info_span!("audit", %analysis_id, mime_type = %document.mime_type);

    async move {
        info!("Sending document to extractor");
        let raw_text = state.extractor.extract(&document).await?;
        let reconciled = reconcile(&raw_text, &state.scoring)?;
        info!(
            final_score = reconciled.result.overall_score,
            degraded = reconciled.result.is_degraded(),
            "Audit complete"
        );
        Ok::<_, AppError>(Json(AuditResponse::new(analysis_id, reconciled)))
    }
    .instrument(span)
    .await
}

/// POST /api/v1/audit/reconcile
///
/// Reconciles extractor text obtained elsewhere. No model call.
pub async fn handle_reconcile(
    State(state): State<AppState>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Json<AuditResponse>, AppError> {
    if request.raw_text.trim().is_empty() {
        return Err(AppError::Validation("rawText cannot be empty".to_string()));
    }

    let analysis_id = Uuid::new_v4();
    let reconciled = info_span!("reconcile", %analysis_id)
        .in_scope(|| reconcile(&request.raw_text, &state.scoring))?;
    Ok(Json(AuditResponse::new(analysis_id, reconciled)))
}

/// POST /api/v1/audit/score
///
/// Scores a signals payload directly and returns the breakdown with its tier.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(value): Json<Value>,
) -> Result<Json<ScoreResponse>, AppError> {
    let signals = Signals::from_value(&value)?;
    let breakdown = score_signals(&signals, &state.scoring);
    let status = classify(breakdown.final_score);
    Ok(Json(ScoreResponse { breakdown, status }))
}

/// GET /api/v1/chat
pub async fn handle_chat_greeting() -> Json<ChatResponse> {
    Json(ChatResponse {
        text: CHAT_GREETING.to_string(),
    })
}

/// POST /api/v1/chat
///
/// Stateless follow-up: the caller sends prior turns with every message.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let system = request
        .system_instruction
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(CHAT_SYSTEM);

    let mut turns = request.history;
    turns.push(ChatTurn {
        role: Role::User,
        text: request.message,
    });

    let text = match state.chat.reply(system, &turns).await {
        Ok(text) => text,
        Err(LlmError::EmptyContent) => CHAT_EMPTY_REPLY.to_string(),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ChatResponse { text }))
}
