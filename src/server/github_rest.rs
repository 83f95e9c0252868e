//! GitHub REST API client used by the backend

use crate::client::http::{build_client, endpoint, send_json};
use crate::client::{
    CollaboratorError, CreateCommentRequest, CreateIssueRequest, GitHubApi, IssueInfo,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

const USER_AGENT: &str = concat!("thought-chat/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

#[derive(Serialize)]
struct IssueBody<'a> {
    title: &'a str,
    body: &'a str,
    labels: &'a [String],
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Calls `api.github.com` (or a compatible base URL) with a bearer token
pub struct GitHubRestClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubRestClient {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: build_client()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, CollaboratorError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| CollaboratorError::auth("GitHub token not configured"))?;
        Ok(self
            .client
            .post(endpoint(&self.api_url, path))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION))
    }
}

#[async_trait]
impl GitHubApi for GitHubRestClient {
    async fn create_issue(
        &self,
        request: &CreateIssueRequest,
    ) -> Result<IssueInfo, CollaboratorError> {
        let repo = &request.repository;
        tracing::debug!(
            repository = %repo,
            installation_id = %request.installation_id,
            "Creating issue"
        );
        let path = format!("/repos/{}/{}/issues", repo.owner, repo.name);
        let body = IssueBody {
            title: &request.title,
            body: &request.body,
            labels: &request.labels,
        };
        send_json(self.post(&path)?.json(&body)).await
    }

    async fn create_comment(
        &self,
        request: &CreateCommentRequest,
    ) -> Result<(), CollaboratorError> {
        let repo = &request.repository;
        tracing::debug!(
            repository = %repo,
            issue_number = request.issue_number,
            installation_id = %request.installation_id,
            "Creating comment"
        );
        let path = format!(
            "/repos/{}/{}/issues/{}/comments",
            repo.owner, repo.name, request.issue_number
        );
        let _: serde_json::Value =
            send_json(self.post(&path)?.json(&CommentBody { body: &request.comment })).await?;
        Ok(())
    }
}
