//! Outbound collaborators: the chat completion endpoint and the
//! issue/comment REST backend
//!
//! Provides the interfaces the dispatcher calls plus HTTP adapters for them.

mod error;
pub(crate) mod http;
mod types;

pub use error::{CollaboratorError, CollaboratorErrorKind};
pub use http::{HttpChatClient, HttpGitHubClient};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Text-in/text-out reply generation
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CollaboratorError>;
}

/// Issue and comment creation on behalf of an installation
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn create_issue(&self, request: &CreateIssueRequest)
        -> Result<IssueInfo, CollaboratorError>;

    async fn create_comment(&self, request: &CreateCommentRequest)
        -> Result<(), CollaboratorError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ChatClient + ?Sized> ChatClient for Arc<T> {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CollaboratorError> {
        (**self).complete(request).await
    }
}

#[async_trait]
impl<T: GitHubApi + ?Sized> GitHubApi for Arc<T> {
    async fn create_issue(
        &self,
        request: &CreateIssueRequest,
    ) -> Result<IssueInfo, CollaboratorError> {
        (**self).create_issue(request).await
    }

    async fn create_comment(
        &self,
        request: &CreateCommentRequest,
    ) -> Result<(), CollaboratorError> {
        (**self).create_comment(request).await
    }
}

/// Logging wrapper for chat clients
pub struct LoggingChatClient<C> {
    inner: C,
    name: String,
}

impl<C: ChatClient> LoggingChatClient<C> {
    pub fn new(inner: C, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }
}

#[async_trait]
impl<C: ChatClient> ChatClient for LoggingChatClient<C> {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CollaboratorError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    client = %self.name,
                    duration_ms = %duration.as_millis(),
                    reply_len = response.response.len(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    client = %self.name,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Chat request failed"
                );
            }
        }

        result
    }
}
