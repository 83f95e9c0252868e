//! Results of dispatching an intent or a form submission

use crate::client::CollaboratorError;
use crate::command::Intent;
use crate::state_machine::PendingAction;
use thiserror::Error;

pub const DOCS_MENU_REPLY: &str = "📚 I can help generate documentation! Which part would you like me to document? You can say:\n\
• \"Document the main functions\"\n\
• \"Create a README file\"\n\
• \"Generate API docs\"\n\
• \"Write user guide\"";

/// What the front end should do once a dispatch completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Show the issue form (title + body)
    OpenIssueForm,
    /// Ask for an issue/PR number and comment text
    PromptAndSendComment,
    /// Ask for a pull request number
    PromptAndRequestReview,
    ShowDocsMenu,
    ChatReply(String),
    IssueCreated { title: String, number: u64 },
    CommentAdded { issue_number: u64 },
    ReviewRequested { pr_number: u64 },
}

impl DispatchOutcome {
    /// Assistant text to log (and possibly speak)
    pub fn reply_text(&self) -> Option<String> {
        match self {
            Self::OpenIssueForm | Self::PromptAndSendComment => None,
            Self::PromptAndRequestReview => {
                Some("Which pull request should I review? Give me its number.".to_string())
            }
            Self::ShowDocsMenu => Some(DOCS_MENU_REPLY.to_string()),
            Self::ChatReply(text) => Some(text.clone()),
            Self::IssueCreated { title, number } => {
                Some(format!("✅ Created GitHub issue: \"{title}\" - #{number}"))
            }
            Self::CommentAdded { issue_number } => {
                Some(format!("✅ Added comment to issue #{issue_number}"))
            }
            Self::ReviewRequested { pr_number } => Some(format!(
                "🔍 Analyzing Pull Request #{pr_number}... I'll provide a detailed code review shortly."
            )),
        }
    }

    /// Follow-up the front end must complete, if any
    pub fn pending_action(&self) -> Option<PendingAction> {
        match self {
            Self::OpenIssueForm => Some(PendingAction::IssueForm),
            Self::PromptAndSendComment => Some(PendingAction::CommentPrompt),
            Self::PromptAndRequestReview => Some(PendingAction::ReviewPrompt),
            _ => None,
        }
    }
}

/// Dispatch failures. Every variant still completes the turn.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Please install the GitHub App first!")]
    PrerequisiteMissing { intent: Intent },

    #[error("No repository is selected. Open the assistant from a repository to use GitHub actions.")]
    RepositoryMissing,

    #[error("{0}")]
    InvalidSubmission(String),

    #[error("Failed to create issue: {0}")]
    IssueFailed(CollaboratorError),

    #[error("Failed to create comment: {0}")]
    CommentFailed(CollaboratorError),
}

impl DispatchError {
    /// A failed submission keeps its form open so it can be resubmitted
    pub fn retains_pending_action(&self) -> bool {
        matches!(
            self,
            Self::InvalidSubmission(_) | Self::IssueFailed(_) | Self::CommentFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_outcomes_set_pending_actions() {
        assert_eq!(
            DispatchOutcome::OpenIssueForm.pending_action(),
            Some(PendingAction::IssueForm)
        );
        assert_eq!(
            DispatchOutcome::PromptAndSendComment.pending_action(),
            Some(PendingAction::CommentPrompt)
        );
        assert_eq!(
            DispatchOutcome::PromptAndRequestReview.pending_action(),
            Some(PendingAction::ReviewPrompt)
        );
        assert_eq!(DispatchOutcome::ShowDocsMenu.pending_action(), None);
    }

    #[test]
    fn test_reply_texts() {
        assert_eq!(DispatchOutcome::OpenIssueForm.reply_text(), None);
        assert_eq!(
            DispatchOutcome::IssueCreated {
                title: "Login bug".to_string(),
                number: 3
            }
            .reply_text()
            .as_deref(),
            Some("✅ Created GitHub issue: \"Login bug\" - #3")
        );
        assert!(DispatchOutcome::ShowDocsMenu
            .reply_text()
            .unwrap()
            .contains("Create a README file"));
    }

    #[test]
    fn test_error_messages() {
        let err = DispatchError::PrerequisiteMissing {
            intent: Intent::AddComment,
        };
        assert_eq!(err.to_string(), "Please install the GitHub App first!");
        assert!(!err.retains_pending_action());

        let err = DispatchError::CommentFailed(CollaboratorError::server_error("boom"));
        assert_eq!(err.to_string(), "Failed to create comment: boom");
        assert!(err.retains_pending_action());
    }
}
