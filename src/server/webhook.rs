//! Webhook event router
//!
//! Mentions of the app in new issues, issue comments, and review comments
//! run through the same normalize, match, and dispatch pipeline a session
//! uses. The reply is posted back as a comment on the issue or pull request.

use super::handlers::decorate_comment;
use super::types::{WebhookDisposition, WebhookPayload, WebhookResponse};
use super::AppState;
use crate::client::{CreateCommentRequest, GitHubApi};
use crate::command::{match_intent, normalize};
use crate::context::{InstallationRef, RepoContext, RepositoryRef};
use crate::dispatch::{with_deadline, DispatchOutcome};
use axum::{extract::State, http::HeaderMap, Json};

pub const MENTION: &str = "@thought-chat";
const EVENT_HEADER: &str = "x-github-event";

/// Posted when a mention asks for something that needs a form
pub const FOLLOW_UP_HINT: &str =
    "I need a few more details for that. Open the Thought Chat interface to finish it.";

/// A mention that should be answered
#[derive(Debug, Clone, PartialEq, Eq)]
struct Mention {
    repository: RepositoryRef,
    installation: InstallationRef,
    /// Issue or pull request to reply on
    number: u64,
    text: String,
}

/// Pick out an actionable mention from a delivery
fn extract_mention(event: &str, payload: &WebhookPayload) -> Option<Mention> {
    let action = payload.action.as_deref()?;
    let (number, body) = match (event, action) {
        ("issues", "opened") => {
            let issue = payload.issue.as_ref()?;
            (issue.number, issue.body.as_deref()?)
        }
        ("issue_comment", "created") => {
            (payload.issue.as_ref()?.number, payload.comment.as_ref()?.body.as_deref()?)
        }
        ("pull_request_review_comment", "created") => (
            payload.pull_request.as_ref()?.number,
            payload.comment.as_ref()?.body.as_deref()?,
        ),
        _ => return None,
    };

    if !body.contains(MENTION) {
        return None;
    }
    if payload.sender.as_ref().is_some_and(super::types::WebhookSender::is_bot) {
        return None;
    }

    let text = body.replace(MENTION, " ").trim().to_string();
    if normalize(&text).is_empty() {
        return None;
    }

    Some(Mention {
        repository: payload.repository.as_ref()?.to_ref(),
        installation: payload.installation.as_ref()?.id.clone(),
        number,
        text,
    })
}

fn reply_for(outcome: &DispatchOutcome) -> String {
    outcome
        .reply_text()
        .unwrap_or_else(|| FOLLOW_UP_HINT.to_string())
}

pub(super) async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<WebhookPayload>,
) -> Json<WebhookResponse> {
    let event = headers
        .get(EVENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if event == "installation" && payload.action.as_deref() == Some("created") {
        let installation = payload.installation.as_ref().map(|i| i.id.to_string());
        tracing::info!(installation_id = ?installation, "App installed");
        return Json(WebhookResponse {
            status: WebhookDisposition::Logged,
        });
    }

    let Some(mention) = extract_mention(event, &payload) else {
        tracing::debug!(event, action = ?payload.action, "Webhook ignored");
        return Json(WebhookResponse {
            status: WebhookDisposition::Ignored,
        });
    };

    let context = RepoContext::new(
        Some(mention.repository.clone()),
        Some(mention.installation.clone()),
    );
    let intent = match_intent(&normalize(&mention.text));
    tracing::info!(
        event,
        repository = %mention.repository,
        number = mention.number,
        intent = %intent,
        "Answering mention"
    );

    let reply = match state.dispatcher.dispatch(intent, &mention.text, &context).await {
        Ok(outcome) => reply_for(&outcome),
        Err(e) => e.to_string(),
    };

    let request = CreateCommentRequest {
        repository: mention.repository,
        issue_number: mention.number,
        comment: decorate_comment(&reply),
        installation_id: mention.installation,
    };
    let posted = with_deadline(
        state.timeout,
        "Mention reply",
        state.github.create_comment(&request),
    )
    .await;
    if let Err(e) = posted {
        tracing::error!(error = %e, repository = %request.repository, "Failed to post mention reply");
        return Json(WebhookResponse {
            status: WebhookDisposition::Ignored,
        });
    }

    Json(WebhookResponse {
        status: WebhookDisposition::Replied,
    })
}
