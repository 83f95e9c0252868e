//! Mock implementations for testing
//!
//! These mocks enable session and dispatch tests without real I/O.

use super::traits::{EventSink, SpeechError, SpeechProvider, VoiceSettings};
use super::{Session, SessionHandle};
use crate::client::{
    ChatClient, ChatRequest, ChatResponse, CollaboratorError, CreateCommentRequest,
    CreateIssueRequest, GitHubApi, IssueInfo,
};
use crate::config::SessionConfig;
use crate::context::RepoContext;
use crate::dispatch::Dispatcher;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Chat Client
// ============================================================================

/// Mock chat client that returns queued responses
pub struct MockChatClient {
    responses: Mutex<VecDeque<Result<ChatResponse, CollaboratorError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: ChatResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: CollaboratorError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<ChatResponse, CollaboratorError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::network("No mock response queued")))
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CollaboratorError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_response()
    }
}

// ============================================================================
// Delayed Mock Chat Client (for timeout testing)
// ============================================================================

/// Mock chat client that answers only after a delay
pub struct DelayedMockChatClient {
    inner: MockChatClient,
    delay: Duration,
}

impl DelayedMockChatClient {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockChatClient::new(),
            delay,
        }
    }

    pub fn queue_response(&self, response: ChatResponse) {
        self.inner.queue_response(response);
    }
}

#[async_trait]
impl ChatClient for DelayedMockChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CollaboratorError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(self.delay).await;
        self.inner.next_response()
    }
}

// ============================================================================
// Mock GitHub backend
// ============================================================================

/// Records issue and comment requests; answers with sequential issue numbers
pub struct MockGitHub {
    next_issue_number: Mutex<u64>,
    failure: Mutex<Option<CollaboratorError>>,
    delay: Mutex<Option<Duration>>,
    issues: Mutex<Vec<CreateIssueRequest>>,
    comments: Mutex<Vec<CreateCommentRequest>>,
}

impl MockGitHub {
    pub fn new() -> Self {
        Self {
            next_issue_number: Mutex::new(1),
            failure: Mutex::new(None),
            delay: Mutex::new(None),
            issues: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
        }
    }

    pub fn set_next_issue_number(&self, number: u64) {
        *self.next_issue_number.lock().unwrap() = number;
    }

    /// Fail every following call with `error`
    pub fn fail_with(&self, error: CollaboratorError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Stall every following call for `delay` before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn recorded_issues(&self) -> Vec<CreateIssueRequest> {
        self.issues.lock().unwrap().clone()
    }

    pub fn recorded_comments(&self) -> Vec<CreateCommentRequest> {
        self.comments.lock().unwrap().clone()
    }

    async fn stall(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_failure(&self) -> Result<(), CollaboratorError> {
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for MockGitHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn create_issue(
        &self,
        request: &CreateIssueRequest,
    ) -> Result<IssueInfo, CollaboratorError> {
        self.issues.lock().unwrap().push(request.clone());
        self.stall().await;
        self.check_failure()?;

        let mut next = self.next_issue_number.lock().unwrap();
        let number = *next;
        *next += 1;
        Ok(IssueInfo {
            number,
            html_url: Some(format!(
                "https://github.com/{}/issues/{number}",
                request.repository
            )),
        })
    }

    async fn create_comment(
        &self,
        request: &CreateCommentRequest,
    ) -> Result<(), CollaboratorError> {
        self.comments.lock().unwrap().push(request.clone());
        self.stall().await;
        self.check_failure()
    }
}

// ============================================================================
// Mock Speech Provider
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechCommand {
    StartListening,
    StopListening,
    Speak(String),
}

/// Speech provider driven by the test: records commands and emits results
/// on demand through the most recent sink.
pub struct MockSpeech {
    commands: Mutex<Vec<SpeechCommand>>,
    sink: Mutex<Option<EventSink>>,
    start_failure: Mutex<Option<String>>,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            sink: Mutex::new(None),
            start_failure: Mutex::new(None),
        }
    }

    /// Make the next `start_listening` fail with `reason`
    pub fn fail_start(&self, reason: impl Into<String>) {
        *self.start_failure.lock().unwrap() = Some(reason.into());
    }

    pub fn commands(&self) -> Vec<SpeechCommand> {
        self.commands.lock().unwrap().clone()
    }

    fn current_sink(&self) -> EventSink {
        self.sink
            .lock()
            .unwrap()
            .clone()
            .expect("speech provider was never started")
    }

    pub async fn emit_result(&self, text: &str) {
        self.current_sink().result(text).await;
    }

    pub async fn emit_interim(&self, text: &str) {
        self.current_sink().interim(text).await;
    }

    pub async fn emit_error(&self, reason: &str) {
        self.current_sink().error(reason).await;
    }

    pub async fn emit_speech_started(&self) {
        self.current_sink().speech_started().await;
    }

    pub async fn emit_speech_ended(&self) {
        self.current_sink().speech_ended().await;
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechProvider for MockSpeech {
    fn start_listening(&self, sink: EventSink) -> Result<(), SpeechError> {
        self.commands
            .lock()
            .unwrap()
            .push(SpeechCommand::StartListening);
        if let Some(reason) = self.start_failure.lock().unwrap().take() {
            return Err(SpeechError::Provider(reason));
        }
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    fn stop_listening(&self) -> Result<(), SpeechError> {
        self.commands
            .lock()
            .unwrap()
            .push(SpeechCommand::StopListening);
        Ok(())
    }

    fn speak(
        &self,
        text: &str,
        _settings: &VoiceSettings,
        sink: EventSink,
    ) -> Result<(), SpeechError> {
        self.commands
            .lock()
            .unwrap()
            .push(SpeechCommand::Speak(text.to_string()));
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }
}

// ============================================================================
// Session fixture
// ============================================================================

pub type TestSessionType = Session<Arc<MockChatClient>, Arc<MockGitHub>, Arc<MockSpeech>>;

/// A session wired to mocks, with the mocks kept around for assertions
pub struct TestSession {
    pub session: TestSessionType,
    pub handle: SessionHandle,
    pub chat: Arc<MockChatClient>,
    pub github: Arc<MockGitHub>,
    pub speech: Arc<MockSpeech>,
}

pub fn test_session(auto_speak: bool, repo: RepoContext) -> TestSession {
    let chat = Arc::new(MockChatClient::new());
    let github = Arc::new(MockGitHub::new());
    let speech = Arc::new(MockSpeech::new());
    let config = SessionConfig {
        auto_speak,
        ..SessionConfig::default()
    };
    let dispatcher = Dispatcher::new(chat.clone(), github.clone());
    let (session, handle) = Session::new(&config, repo, dispatcher, speech.clone());
    TestSession {
        session,
        handle,
        chat,
        github,
        speech,
    }
}
