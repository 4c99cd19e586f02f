use super::capability::{RecognitionEvent, RecognitionSink, SpeechRecognizer};
use super::{ChannelEvent, ChannelState};
use crate::error::ChannelError;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Continuous speech-to-text feeding the draft answer.
///
/// Only final fragments leave the channel; interim text is kept for display
/// and replaced on every update.
pub struct VoiceInputChannel {
    recognizer: Arc<dyn SpeechRecognizer>,
    events: UnboundedSender<ChannelEvent>,
    state: ChannelState,
    epoch: u64,
    interim: String,
}

impl VoiceInputChannel {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        events: UnboundedSender<ChannelEvent>,
    ) -> Self {
        Self {
            recognizer,
            events,
            state: ChannelState::default(),
            epoch: 0,
            interim: String::new(),
        }
    }

    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn enable_on_activation(&mut self) -> bool {
        if !self.is_supported() {
            self.state.enabled = false;
            self.state.error = Some(ChannelError::Unsupported("Speech recognition".into()));
            return false;
        }
        self.state.enabled = true;
        self.state.error = None;
        true
    }

    /// Enables the channel and starts listening.
    pub fn enable(&mut self) -> bool {
        self.enable_on_activation() && self.start()
    }

    pub fn disable(&mut self) {
        self.stop();
        self.state.enabled = false;
    }

    /// Starts a fresh listening session. Any earlier session is stopped
    /// first and its late events are ignored.
    pub fn start(&mut self) -> bool {
        if !self.state.enabled {
            return false;
        }
        self.stop();
        let sink = RecognitionSink::new(self.epoch, self.events.clone());
        match self.recognizer.start(sink) {
            Ok(()) => {
                tracing::debug!("Listening (epoch {})", self.epoch);
                self.state.active = true;
                self.state.error = None;
                true
            }
            Err(e) => {
                tracing::warn!("Could not start speech recognition: {}", e);
                if matches!(e, ChannelError::PermissionDenied(_)) {
                    self.state.enabled = false;
                }
                self.state.active = false;
                self.state.error = Some(e);
                false
            }
        }
    }

    pub fn stop(&mut self) {
        if self.state.active {
            self.recognizer.stop();
        }
        self.epoch += 1;
        self.state.active = false;
        self.interim.clear();
    }

    /// Applies a recognizer event. Returns the trimmed text of a final
    /// fragment from the current listening session.
    pub fn on_event(&mut self, epoch: u64, event: RecognitionEvent) -> Option<String> {
        if epoch != self.epoch || !self.state.active {
            tracing::debug!("Ignoring stale recognition event {:?}", event);
            return None;
        }

        match event {
            RecognitionEvent::Transcript { text, is_final } => {
                if !is_final {
                    self.interim = text;
                    return None;
                }
                self.interim.clear();
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            RecognitionEvent::Error(e) => {
                tracing::warn!("Speech recognition error: {}", e);
                if matches!(e, ChannelError::PermissionDenied(_)) {
                    self.state.enabled = false;
                }
                self.state.active = false;
                self.state.error = Some(e);
                self.interim.clear();
                None
            }
            RecognitionEvent::End => {
                self.state.active = false;
                self.interim.clear();
                None
            }
        }
    }
}

impl Drop for VoiceInputChannel {
    fn drop(&mut self) {
        self.stop();
    }
}
