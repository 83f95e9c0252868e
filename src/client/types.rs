//! Wire types shared by the session-side clients and the backend

use crate::context::{InstallationRef, RepositoryRef};
use serde::{Deserialize, Serialize};

/// Chat completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_id: Option<InstallationRef>,
}

/// Chat completion response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: String,
}

impl ChatResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// Request to open an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIssueRequest {
    pub repository: RepositoryRef,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub installation_id: InstallationRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// An issue that was created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueInfo {
    pub number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

/// Response to an issue creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIssueResponse {
    pub issue: IssueInfo,
}

/// Request to comment on an issue or pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub repository: RepositoryRef,
    pub issue_number: u64,
    pub comment: String,
    pub installation_id: InstallationRef,
}

/// Generic success acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_omits_missing_context() {
        let req = ChatRequest {
            message: "hi".to_string(),
            repository: None,
            installation_id: None,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "message": "hi" }));
    }

    #[test]
    fn test_chat_response_missing_field_is_empty() {
        let resp: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.response.is_empty());
    }

    #[test]
    fn test_comment_request_wire_shape() {
        let req = CreateCommentRequest {
            repository: RepositoryRef::new("octo", "hello"),
            issue_number: 12,
            comment: "LGTM".to_string(),
            installation_id: InstallationRef::new("42"),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "repository": { "owner": "octo", "name": "hello" },
                "issue_number": 12,
                "comment": "LGTM",
                "installation_id": "42"
            })
        );
    }

    #[test]
    fn test_issue_response_ignores_extra_fields() {
        let resp: CreateIssueResponse = serde_json::from_value(json!({
            "issue": { "number": 5, "html_url": "https://github.com/octo/hello/issues/5", "state": "open" }
        }))
        .unwrap();
        assert_eq!(resp.issue.number, 5);
    }
}
