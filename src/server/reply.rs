//! Canned replies for the chat endpoint

use crate::client::{ChatClient, ChatRequest, ChatResponse, CollaboratorError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy)]
enum ReplyTopic {
    Repository,
    Issue,
    Code,
}

/// Checked in order; the first match picks the reply.
static REPLY_PATTERNS: LazyLock<Vec<(Regex, ReplyTopic)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)repository|repo|project").unwrap(),
            ReplyTopic::Repository,
        ),
        (
            Regex::new(r"(?i)issue|bug|problem").unwrap(),
            ReplyTopic::Issue,
        ),
        (
            Regex::new(r"(?i)code|function|class|review").unwrap(),
            ReplyTopic::Code,
        ),
    ]
});

/// Reply generator that answers by keyword
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternReplyGenerator;

impl PatternReplyGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn reply(&self, request: &ChatRequest) -> String {
        let topic = REPLY_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(&request.message))
            .map(|(_, topic)| *topic);

        match topic {
            Some(ReplyTopic::Repository) => {
                let name = request
                    .repository
                    .as_ref()
                    .map_or("your repository", |r| r.name.as_str());
                format!(
                    "I can help you with repository management! You're working with {name}. \
                     What would you like to do?"
                )
            }
            Some(ReplyTopic::Issue) => "I can help you create issues or analyze existing ones. \
                                        Would you like me to create an issue for you?"
                .to_string(),
            Some(ReplyTopic::Code) => "I can help with code analysis and reviews. Share the code \
                                       or mention a file and I'll analyze it."
                .to_string(),
            None => format!(
                "You said: \"{}\". I'm your GitHub repository assistant. I can help with issues, \
                 code reviews, and repository management!",
                request.message
            ),
        }
    }
}

#[async_trait]
impl ChatClient for PatternReplyGenerator {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CollaboratorError> {
        Ok(ChatResponse::new(self.reply(request)))
    }
}
