//! Speech provider abstraction
//!
//! Commands return immediately; results arrive later through the
//! `EventSink` handed to the provider.

use crate::state_machine::Event;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

pub const MIN_SPEECH_RATE: f32 = 0.5;
pub const MAX_SPEECH_RATE: f32 = 2.0;

/// Speech provider failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpeechError {
    #[error("speech recognition is not supported")]
    Unsupported,
    #[error("{0}")]
    Provider(String),
}

/// Voice selection and speaking rate
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Provider-specific voice name; `None` picks the provider default
    pub voice: Option<String>,
    rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: None,
            rate: 1.0,
        }
    }
}

impl VoiceSettings {
    pub fn new(voice: Option<String>, rate: f32) -> Self {
        Self::default().with_voice(voice).with_rate(rate)
    }

    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        self.voice = voice;
        self
    }

    /// Set the speaking rate, clamped to 0.5..=2.0
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = if rate.is_finite() {
            rate.clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE)
        } else {
            1.0
        };
        self
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

/// Where a speech provider reports results
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<Event>,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    async fn send(&self, event: Event) {
        if self.tx.send(event).await.is_err() {
            tracing::debug!("Session closed, dropping speech event");
        }
    }

    /// Final recognition result
    pub async fn result(&self, text: impl Into<String>) {
        self.send(Event::voice(text)).await;
    }

    /// Partial recognition result
    pub async fn interim(&self, text: impl Into<String>) {
        self.send(Event::InterimResult { text: text.into() }).await;
    }

    pub async fn error(&self, reason: impl Into<String>) {
        self.send(Event::SpeechError {
            reason: reason.into(),
        })
        .await;
    }

    pub async fn speech_started(&self) {
        self.send(Event::SpeechStarted).await;
    }

    pub async fn speech_ended(&self) {
        self.send(Event::SpeechEnded).await;
    }
}

/// Voice capture and speech synthesis
pub trait SpeechProvider: Send + Sync {
    /// Begin capturing; results go to `sink`
    fn start_listening(&self, sink: EventSink) -> Result<(), SpeechError>;

    fn stop_listening(&self) -> Result<(), SpeechError>;

    /// Begin reading `text` aloud; start/end notifications go to `sink`
    fn speak(&self, text: &str, settings: &VoiceSettings, sink: EventSink)
        -> Result<(), SpeechError>;
}

impl<T: SpeechProvider + ?Sized> SpeechProvider for Arc<T> {
    fn start_listening(&self, sink: EventSink) -> Result<(), SpeechError> {
        (**self).start_listening(sink)
    }

    fn stop_listening(&self) -> Result<(), SpeechError> {
        (**self).stop_listening()
    }

    fn speak(
        &self,
        text: &str,
        settings: &VoiceSettings,
        sink: EventSink,
    ) -> Result<(), SpeechError> {
        (**self).speak(text, settings, sink)
    }
}

/// Provider for text-only front ends: capture is unsupported and speaking
/// completes immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextOnlySpeech;

impl SpeechProvider for TextOnlySpeech {
    fn start_listening(&self, _sink: EventSink) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn stop_listening(&self) -> Result<(), SpeechError> {
        Ok(())
    }

    fn speak(
        &self,
        _text: &str,
        _settings: &VoiceSettings,
        sink: EventSink,
    ) -> Result<(), SpeechError> {
        tokio::spawn(async move {
            sink.speech_started().await;
            sink.speech_ended().await;
        });
        Ok(())
    }
}
