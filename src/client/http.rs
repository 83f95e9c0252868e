//! HTTP adapters for the thought-chat backend

use super::{
    ChatClient, ChatRequest, ChatResponse, CollaboratorError, CreateCommentRequest,
    CreateIssueRequest, CreateIssueResponse, GitHubApi, IssueInfo,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_client() -> Result<Client, CollaboratorError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| CollaboratorError::unknown(format!("Failed to create HTTP client: {e}")))
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

async fn post_json<B, R>(client: &Client, url: &str, body: &B) -> Result<R, CollaboratorError>
where
    B: Serialize + Sync,
    R: DeserializeOwned,
{
    send_json(client.post(url).json(body)).await
}

/// Send a request and decode a JSON success body; error statuses are
/// classified from the response body.
pub(crate) async fn send_json<R: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<R, CollaboratorError> {
    let response = request
        .send()
        .await
        .map_err(|e| CollaboratorError::from_reqwest(&e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CollaboratorError::network(format!("Failed to read response: {e}")))?;

    if !status.is_success() {
        return Err(CollaboratorError::from_status(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| {
        CollaboratorError::unknown(format!("Failed to parse response: {e} - body: {body}"))
    })
}

/// Chat client for `POST /api/chat`
pub struct HttpChatClient {
    client: Client,
    url: String,
}

impl HttpChatClient {
    pub fn new(base_url: &str) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: build_client()?,
            url: endpoint(base_url, "/api/chat"),
        })
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CollaboratorError> {
        post_json(&self.client, &self.url, request).await
    }
}

/// Issue/comment client for `POST /api/github/issue` and `POST /api/github/comment`
pub struct HttpGitHubClient {
    client: Client,
    base_url: String,
}

impl HttpGitHubClient {
    pub fn new(base_url: &str) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GitHubApi for HttpGitHubClient {
    async fn create_issue(
        &self,
        request: &CreateIssueRequest,
    ) -> Result<IssueInfo, CollaboratorError> {
        let url = endpoint(&self.base_url, "/api/github/issue");
        let response: CreateIssueResponse = post_json(&self.client, &url, request).await?;
        Ok(response.issue)
    }

    async fn create_comment(
        &self,
        request: &CreateCommentRequest,
    ) -> Result<(), CollaboratorError> {
        let url = endpoint(&self.base_url, "/api/github/comment");
        let _: serde_json::Value = post_json(&self.client, &url, request).await?;
        Ok(())
    }
}
