//! Repository and installation context for a session
//!
//! Set once from launch parameters and read-only afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A GitHub repository, `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Opaque GitHub App installation identifier
///
/// Launch parameters carry it as a string, webhook payloads as a number;
/// both deserialize to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InstallationRef(String);

impl<'de> Deserialize<'de> for InstallationRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

impl InstallationRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstallationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context the dispatcher acts in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoContext {
    pub repository: Option<RepositoryRef>,
    pub installation: Option<InstallationRef>,
}

impl RepoContext {
    pub fn new(repository: Option<RepositoryRef>, installation: Option<InstallationRef>) -> Self {
        Self {
            repository,
            installation,
        }
    }

    /// Build a context from launch parameters (`repo_owner`, `repo_name`,
    /// `installation_id`), e.g. a parsed URL query string.
    ///
    /// The repository is only set when both owner and name are present and
    /// non-empty. Unknown keys are ignored.
    pub fn from_launch_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut owner = None;
        let mut name = None;
        let mut installation = None;

        for (key, value) in params {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "repo_owner" => owner = Some(value.to_string()),
                "repo_name" => name = Some(value.to_string()),
                "installation_id" => installation = Some(InstallationRef::new(value)),
                _ => {}
            }
        }

        let repository = match (owner, name) {
            (Some(owner), Some(name)) => Some(RepositoryRef { owner, name }),
            _ => None,
        };

        Self {
            repository,
            installation,
        }
    }

    /// Human-readable connection status line
    pub fn describe(&self) -> String {
        match (&self.installation, &self.repository) {
            (Some(_), Some(repo)) => format!("Connected to {repo}"),
            (Some(_), None) => "Connected to GitHub App".to_string(),
            (None, _) => "Not connected to GitHub".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_launch_params_full() {
        let ctx = RepoContext::from_launch_params([
            ("repo_owner", "octo"),
            ("repo_name", "hello"),
            ("installation_id", "42"),
            ("utm_source", "x"),
        ]);
        assert_eq!(ctx.repository, Some(RepositoryRef::new("octo", "hello")));
        assert_eq!(ctx.installation, Some(InstallationRef::new("42")));
        assert_eq!(ctx.describe(), "Connected to octo/hello");
    }

    #[test]
    fn test_from_launch_params_partial_repo_is_dropped() {
        let ctx = RepoContext::from_launch_params([("repo_owner", "octo"), ("repo_name", "  ")]);
        assert!(ctx.repository.is_none());
        assert!(ctx.installation.is_none());
        assert_eq!(ctx.describe(), "Not connected to GitHub");
    }

    #[test]
    fn test_installation_without_repo() {
        let ctx = RepoContext::new(None, Some(InstallationRef::new("7")));
        assert_eq!(ctx.describe(), "Connected to GitHub App");
    }

    #[test]
    fn test_installation_ref_accepts_number_or_string() {
        let from_num: InstallationRef = serde_json::from_str("12345").unwrap();
        let from_str: InstallationRef = serde_json::from_str("\"12345\"").unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(from_num.as_str(), "12345");
    }

    #[test]
    fn test_installation_ref_serializes_as_string() {
        let json = serde_json::to_string(&InstallationRef::new("99")).unwrap();
        assert_eq!(json, "\"99\"");
    }
}
