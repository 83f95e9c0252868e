//! Request and response bodies of the backend routes

use crate::context::{InstallationRef, RepositoryRef};
use serde::{Deserialize, Serialize};

pub const ISSUE_TITLE_PREFIX: &str = "🧠 ";
pub const ISSUE_BODY_PREFIX: &str = "*Created via Thought Chat Interface*\n\n";
pub const COMMENT_PREFIX: &str = "🧠 **Thought Chat Response:**\n\n";
pub const ISSUE_LABELS: [&str; 2] = ["thought-chat", "voice-generated"];

/// `POST /api/github/issue`; every field is optional on the wire so missing
/// ones can be reported as a 400
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePayload {
    pub repository: Option<RepositoryRef>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub installation_id: Option<InstallationRef>,
}

/// `POST /api/github/comment`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPayload {
    pub repository: Option<RepositoryRef>,
    pub issue_number: Option<u64>,
    #[serde(default)]
    pub comment: String,
    pub installation_id: Option<InstallationRef>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub success: bool,
    pub installation_id: String,
    pub setup_url: String,
}

/// What the webhook router did with a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookDisposition {
    Replied,
    Logged,
    Ignored,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: WebhookDisposition,
}

// ============================================================
// Webhook payloads (only the fields the router reads)
// ============================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    pub action: Option<String>,
    pub issue: Option<WebhookIssue>,
    pub pull_request: Option<WebhookPullRequest>,
    pub comment: Option<WebhookComment>,
    pub repository: Option<WebhookRepository>,
    pub installation: Option<WebhookInstallation>,
    pub sender: Option<WebhookSender>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookIssue {
    pub number: u64,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPullRequest {
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookComment {
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRepository {
    pub name: String,
    pub owner: WebhookAccount,
}

impl WebhookRepository {
    pub fn to_ref(&self) -> RepositoryRef {
        RepositoryRef::new(self.owner.login.clone(), self.name.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookAccount {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookInstallation {
    pub id: InstallationRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSender {
    pub login: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl WebhookSender {
    pub fn is_bot(&self) -> bool {
        self.kind == "Bot" || self.login.ends_with("[bot]")
    }
}
