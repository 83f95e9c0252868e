//! HTTP request handlers

use super::types::{
    CommentPayload, HealthResponse, IssuePayload, SetupResponse, COMMENT_PREFIX, ISSUE_BODY_PREFIX,
    ISSUE_LABELS, ISSUE_TITLE_PREFIX,
};
use super::webhook::handle_webhook;
use super::AppState;
use crate::client::{
    ChatClient, ChatRequest, ChatResponse, CreateCommentRequest, CreateIssueRequest,
    CreateIssueResponse, ErrorResponse, GitHubApi, SuccessResponse,
};
use crate::dispatch::with_deadline;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Chat replies for sessions
        .route("/api/chat", post(chat))
        // Issue and comment relay
        .route("/api/github/issue", post(create_issue))
        .route("/api/github/comment", post(create_comment))
        // Installation flow
        .route("/install", get(install))
        .route("/setup/:installation_id", get(setup))
        // Mentions
        .route("/webhooks/github", post(handle_webhook))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let response = with_deadline(state.timeout, "Chat request", state.chat.complete(&req))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Chat message error");
            AppError::Internal("Failed to process message".to_string())
        })?;
    Ok(Json(response))
}

async fn create_issue(
    State(state): State<AppState>,
    Json(payload): Json<IssuePayload>,
) -> Result<Json<CreateIssueResponse>, AppError> {
    let installation_id = payload
        .installation_id
        .ok_or_else(|| AppError::BadRequest("installation_id is required".to_string()))?;
    let repository = payload
        .repository
        .ok_or_else(|| AppError::BadRequest("repository is required".to_string()))?;
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }

    let request = CreateIssueRequest {
        repository,
        title: format!("{ISSUE_TITLE_PREFIX}{}", payload.title),
        body: format!("{ISSUE_BODY_PREFIX}{}", payload.body),
        installation_id,
        labels: ISSUE_LABELS.iter().map(ToString::to_string).collect(),
    };

    let issue = with_deadline(
        state.timeout,
        "Issue creation",
        state.github.create_issue(&request),
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, repository = %request.repository, "GitHub issue creation error");
        AppError::Internal("Failed to create issue".to_string())
    })?;

    tracing::info!(repository = %request.repository, number = issue.number, "Issue created");
    Ok(Json(CreateIssueResponse { issue }))
}

pub(super) fn decorate_comment(comment: &str) -> String {
    format!("{COMMENT_PREFIX}{comment}")
}

async fn create_comment(
    State(state): State<AppState>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<SuccessResponse>, AppError> {
    let installation_id = payload
        .installation_id
        .ok_or_else(|| AppError::BadRequest("installation_id is required".to_string()))?;
    let repository = payload
        .repository
        .ok_or_else(|| AppError::BadRequest("repository is required".to_string()))?;
    let issue_number = payload
        .issue_number
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::BadRequest("issue_number is required".to_string()))?;

    let request = CreateCommentRequest {
        repository,
        issue_number,
        comment: decorate_comment(&payload.comment),
        installation_id,
    };

    with_deadline(
        state.timeout,
        "Comment creation",
        state.github.create_comment(&request),
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, repository = %request.repository, "GitHub comment error");
        AppError::Internal("Failed to create comment".to_string())
    })?;

    Ok(Json(SuccessResponse { success: true }))
}

async fn install(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.install_url)
}

async fn setup(Path(installation_id): Path<String>) -> Result<Json<SetupResponse>, AppError> {
    if installation_id.is_empty() || !installation_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest("Setup failed".to_string()));
    }
    tracing::info!(installation_id = %installation_id, "Installation setup");
    Ok(Json(SetupResponse {
        success: true,
        setup_url: format!("/?installation_id={installation_id}"),
        installation_id,
    }))
}

// ============================================================
// Error Handling
// ============================================================

pub(super) enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
