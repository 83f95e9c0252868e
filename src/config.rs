//! Environment-driven configuration

use crate::dispatch::DEFAULT_COLLABORATOR_TIMEOUT;
use crate::runtime::VoiceSettings;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_APP_SLUG: &str = "thought-chat-interface";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

pub const DEFAULT_GREETING: &str = "Hello! I'm your GitHub repository assistant. I can help with \
issues, code reviews, and more. Click the microphone to speak or type your message.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Whole seconds, at least one
fn parse_timeout(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match parse_number::<u64>(key, value)? {
        0 => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

/// Settings for the GitHub App backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Public base URL, used in log output and install links
    pub app_url: String,
    /// Token for upstream GitHub REST calls
    pub github_token: Option<String>,
    pub github_api_url: String,
    /// App slug for the installation redirect
    pub app_slug: String,
    pub collaborator_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            app_url: format!("http://localhost:{DEFAULT_PORT}"),
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            app_slug: DEFAULT_APP_SLUG.to_string(),
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        config.app_url =
            get("APP_URL").unwrap_or_else(|| format!("http://localhost:{}", config.port));
        config.github_token = get("GITHUB_TOKEN");
        if let Some(url) = get("GITHUB_API_URL") {
            config.github_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(slug) = get("GITHUB_APP_SLUG") {
            config.app_slug = slug;
        }
        if let Some(secs) = get("THOUGHT_CHAT_TIMEOUT_SECS") {
            config.collaborator_timeout = parse_timeout("THOUGHT_CHAT_TIMEOUT_SECS", &secs)?;
        }

        Ok(config)
    }

    pub fn install_url(&self) -> String {
        format!(
            "https://github.com/apps/{}/installations/new",
            self.app_slug
        )
    }
}

/// Settings for a conversational session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Speak assistant replies aloud
    pub auto_speak: bool,
    pub voice: VoiceSettings,
    /// First assistant message; `None` disables it
    pub greeting: Option<String>,
    pub collaborator_timeout: Duration,
    /// Base URL of the backend the HTTP collaborators talk to
    pub backend_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_speak: true,
            voice: VoiceSettings::default(),
            greeting: Some(DEFAULT_GREETING.to_string()),
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("THOUGHT_CHAT_AUTO_SPEAK") {
            config.auto_speak = parse_bool("THOUGHT_CHAT_AUTO_SPEAK", &value)?;
        }
        if let Some(secs) = get("THOUGHT_CHAT_TIMEOUT_SECS") {
            config.collaborator_timeout = parse_timeout("THOUGHT_CHAT_TIMEOUT_SECS", &secs)?;
        }
        if let Some(url) = get("THOUGHT_CHAT_URL") {
            config.backend_url = url.trim_end_matches('/').to_string();
        }
        if let Some(voice) = get("THOUGHT_CHAT_VOICE") {
            config.voice = config.voice.with_voice(Some(voice.trim().to_string()));
        }
        if let Some(rate) = get("THOUGHT_CHAT_RATE") {
            config.voice = config
                .voice
                .with_rate(parse_number("THOUGHT_CHAT_RATE", &rate)?);
        }

        Ok(config)
    }
}
