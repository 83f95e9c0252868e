//! Intent matching over an ordered phrase table

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user wants done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CreateIssue,
    AddComment,
    RequestReview,
    GenerateDocs,
    Chat,
}

impl Intent {
    /// Whether dispatching this intent needs an app installation
    pub fn requires_installation(self) -> bool {
        matches!(self, Self::CreateIssue | Self::AddComment | Self::RequestReview)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateIssue => "create_issue",
            Self::AddComment => "add_comment",
            Self::RequestReview => "request_review",
            Self::GenerateDocs => "generate_docs",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the table: any phrase contained in the text selects the intent
struct IntentRule {
    intent: Intent,
    phrases: &'static [&'static str],
}

impl IntentRule {
    fn matches(&self, normalized: &str) -> bool {
        self.phrases.iter().any(|phrase| normalized.contains(phrase))
    }
}

/// Evaluated top to bottom; the first hit wins.
const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::CreateIssue,
        phrases: &["create issue", "new issue"],
    },
    IntentRule {
        intent: Intent::AddComment,
        phrases: &["add comment", "comment on"],
    },
    IntentRule {
        intent: Intent::RequestReview,
        phrases: &["review", "code review"],
    },
    IntentRule {
        intent: Intent::GenerateDocs,
        phrases: &["documentation", "generate docs"],
    },
];

/// Match already-normalized text. Text matching no row is `Intent::Chat`.
pub fn match_intent(normalized: &str) -> Intent {
    INTENT_RULES
        .iter()
        .find(|rule| rule.matches(normalized))
        .map_or(Intent::Chat, |rule| rule.intent)
}
