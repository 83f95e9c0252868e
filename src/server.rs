//! GitHub App backend
//!
//! Serves the chat endpoint the sessions talk to, relays issue and comment
//! creation to GitHub, and answers `@thought-chat` mentions delivered by
//! webhooks.

mod github_rest;
mod handlers;
mod reply;
mod types;
mod webhook;

pub use github_rest::GitHubRestClient;
pub use handlers::create_router;
pub use reply::PatternReplyGenerator;
pub use types::*;

use crate::client::{ChatClient, GitHubApi};
use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use std::sync::Arc;
use std::time::Duration;

pub type SharedChat = Arc<dyn ChatClient>;
pub type SharedGitHub = Arc<dyn GitHubApi>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Reply generator behind `/api/chat`
    pub chat: SharedChat,
    /// Upstream GitHub access
    pub github: SharedGitHub,
    /// Runs mention commands from webhooks
    pub dispatcher: Arc<Dispatcher<SharedChat, SharedGitHub>>,
    pub install_url: String,
    /// Deadline for every upstream call a handler makes
    pub timeout: Duration,
}

impl AppState {
    pub fn new(chat: SharedChat, github: SharedGitHub, install_url: impl Into<String>) -> Self {
        Self::with_timeout(
            chat,
            github,
            install_url,
            crate::dispatch::DEFAULT_COLLABORATOR_TIMEOUT,
        )
    }

    pub fn with_timeout(
        chat: SharedChat,
        github: SharedGitHub,
        install_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let dispatcher = Dispatcher::new(Arc::clone(&chat), Arc::clone(&github)).with_timeout(timeout);
        Self {
            chat,
            github,
            dispatcher: Arc::new(dispatcher),
            install_url: install_url.into(),
            timeout,
        }
    }

    /// Production wiring: pattern replies and the GitHub REST API
    pub fn from_config(config: &ServerConfig) -> Result<Self, crate::client::CollaboratorError> {
        let github = GitHubRestClient::new(&config.github_api_url, config.github_token.clone())?;
        Ok(Self::with_timeout(
            Arc::new(PatternReplyGenerator::new()),
            Arc::new(github),
            config.install_url(),
            config.collaborator_timeout,
        ))
    }
}
