//! Intent dispatch
//!
//! Maps a matched intent (or a completed form) to a collaborator call and
//! wraps the result in a `DispatchOutcome`. Chat failures never escape:
//! they become a fixed fallback reply.

mod outcome;

pub use outcome::{DispatchError, DispatchOutcome, DOCS_MENU_REPLY};

use crate::client::{
    ChatClient, ChatRequest, CollaboratorError, CreateCommentRequest, CreateIssueRequest,
    GitHubApi,
};
use crate::command::Intent;
use crate::context::{InstallationRef, RepoContext, RepositoryRef};
use crate::state_machine::FormSubmission;
use std::future::Future;
use std::time::Duration;

pub const CHAT_FALLBACK_REPLY: &str =
    "I'm having trouble connecting to the server. Please try again.";
pub const EMPTY_REPLY_FALLBACK: &str = "I'm having trouble generating a response right now.";

/// Deadline for any single collaborator call
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(15);

/// Routes intents to the chat and GitHub collaborators
pub struct Dispatcher<C, G> {
    chat: C,
    github: G,
    timeout: Duration,
}

impl<C, G> Dispatcher<C, G>
where
    C: ChatClient,
    G: GitHubApi,
{
    pub fn new(chat: C, github: G) -> Self {
        Self {
            chat,
            github,
            timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Dispatch a matched intent.
    ///
    /// GitHub intents only check that the app is installed and ask the front
    /// end for the missing details; the REST call happens on `submit`.
    pub async fn dispatch(
        &self,
        intent: Intent,
        text: &str,
        context: &RepoContext,
    ) -> Result<DispatchOutcome, DispatchError> {
        tracing::debug!(intent = %intent, "Dispatching");

        if intent.requires_installation() && context.installation.is_none() {
            tracing::info!(intent = %intent, "Dispatch blocked: app not installed");
            return Err(DispatchError::PrerequisiteMissing { intent });
        }

        match intent {
            Intent::CreateIssue => Ok(DispatchOutcome::OpenIssueForm),
            Intent::AddComment => Ok(DispatchOutcome::PromptAndSendComment),
            Intent::RequestReview => Ok(DispatchOutcome::PromptAndRequestReview),
            Intent::GenerateDocs => Ok(DispatchOutcome::ShowDocsMenu),
            Intent::Chat => Ok(DispatchOutcome::ChatReply(self.chat_reply(text, context).await)),
        }
    }

    /// Complete a pending action with the data the front end collected
    pub async fn submit(
        &self,
        submission: &FormSubmission,
        context: &RepoContext,
    ) -> Result<DispatchOutcome, DispatchError> {
        match submission {
            FormSubmission::Issue { title, body } => {
                let (repository, installation) = require_target(Intent::CreateIssue, context)?;
                let title = title.trim();
                if title.is_empty() {
                    return Err(DispatchError::InvalidSubmission(
                        "An issue needs a title.".to_string(),
                    ));
                }

                let request = CreateIssueRequest {
                    repository,
                    title: title.to_string(),
                    body: body.clone(),
                    installation_id: installation,
                    labels: vec![],
                };
                let issue = self
                    .with_deadline("Issue creation", self.github.create_issue(&request))
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, "Issue creation failed");
                        DispatchError::IssueFailed(e)
                    })?;

                tracing::info!(number = issue.number, "Issue created");
                Ok(DispatchOutcome::IssueCreated {
                    title: request.title,
                    number: issue.number,
                })
            }

            FormSubmission::Comment { issue_number, body } => {
                let (repository, installation) = require_target(Intent::AddComment, context)?;
                if *issue_number == 0 {
                    return Err(DispatchError::InvalidSubmission(
                        "Enter the issue or pull request number to comment on.".to_string(),
                    ));
                }
                if body.trim().is_empty() {
                    return Err(DispatchError::InvalidSubmission(
                        "A comment needs some text.".to_string(),
                    ));
                }

                let request = CreateCommentRequest {
                    repository,
                    issue_number: *issue_number,
                    comment: body.clone(),
                    installation_id: installation,
                };
                self.with_deadline("Comment creation", self.github.create_comment(&request))
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, issue_number, "Comment creation failed");
                        DispatchError::CommentFailed(e)
                    })?;

                Ok(DispatchOutcome::CommentAdded {
                    issue_number: *issue_number,
                })
            }

            FormSubmission::Review { pr_number } => {
                if context.installation.is_none() {
                    return Err(DispatchError::PrerequisiteMissing {
                        intent: Intent::RequestReview,
                    });
                }
                if *pr_number == 0 {
                    return Err(DispatchError::InvalidSubmission(
                        "Enter the pull request number to review.".to_string(),
                    ));
                }
                Ok(DispatchOutcome::ReviewRequested {
                    pr_number: *pr_number,
                })
            }
        }
    }

    /// Ask the chat collaborator, falling back to a fixed reply on any failure
    async fn chat_reply(&self, text: &str, context: &RepoContext) -> String {
        let request = ChatRequest {
            message: text.to_string(),
            repository: context.repository.clone(),
            installation_id: context.installation.clone(),
        };

        match self.with_deadline("Chat request", self.chat.complete(&request)).await {
            Ok(response) if response.response.trim().is_empty() => {
                EMPTY_REPLY_FALLBACK.to_string()
            }
            Ok(response) => response.response,
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind, "Chat collaborator failed, using fallback");
                CHAT_FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn with_deadline<T, F>(&self, what: &str, call: F) -> Result<T, CollaboratorError>
    where
        F: Future<Output = Result<T, CollaboratorError>>,
    {
        with_deadline(self.timeout, what, call).await
    }
}

/// Run a collaborator call, failing with a timeout error after `timeout`
pub(crate) async fn with_deadline<T, F>(
    timeout: Duration,
    what: &str,
    call: F,
) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    tokio::time::timeout(timeout, call).await.unwrap_or_else(|_| {
        Err(CollaboratorError::timeout(format!(
            "{what} timed out after {}ms",
            timeout.as_millis()
        )))
    })
}

fn require_target(
    intent: Intent,
    context: &RepoContext,
) -> Result<(RepositoryRef, InstallationRef), DispatchError> {
    let installation = context
        .installation
        .clone()
        .ok_or(DispatchError::PrerequisiteMissing { intent })?;
    let repository = context
        .repository
        .clone()
        .ok_or(DispatchError::RepositoryMissing)?;
    Ok((repository, installation))
}
