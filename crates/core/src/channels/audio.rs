use super::ChannelState;
use super::capability::SpeechSynthesizer;
use crate::error::ChannelError;
use std::sync::Arc;

pub const DEFAULT_PITCH: f32 = 1.0;

/// Speaks questions aloud. At most one utterance is in flight; a new
/// `speak` always preempts the previous one.
pub struct AudioOutputChannel {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    state: ChannelState,
    rate: f32,
}

impl AudioOutputChannel {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            state: ChannelState::default(),
            rate: 0.9,
        }
    }

    /// `active` reflects an utterance that is still being spoken, so it
    /// clears on its own once speech ends.
    pub fn state(&self) -> ChannelState {
        ChannelState {
            active: self.is_speaking(),
            ..self.state.clone()
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.state.active && self.synthesizer.is_speaking()
    }

    pub fn is_supported(&self) -> bool {
        self.synthesizer.is_supported()
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Turns speech output on. Returns `false` when the host cannot speak.
    pub fn enable(&mut self) -> bool {
        if !self.is_supported() {
            self.state.enabled = false;
            self.state.error = Some(ChannelError::Unsupported("Speech output".into()));
            return false;
        }
        self.state.enabled = true;
        self.state.error = None;
        true
    }

    pub fn disable(&mut self) {
        self.stop();
        self.state.enabled = false;
    }

    /// Cancels anything in flight and speaks `text`. Does nothing while the
    /// channel is disabled.
    pub fn speak(&mut self, text: &str) -> bool {
        if !self.state.enabled {
            return false;
        }
        self.synthesizer.cancel();
        match self.synthesizer.speak(text, self.rate, DEFAULT_PITCH) {
            Ok(()) => {
                self.state.active = true;
                true
            }
            Err(e) => {
                tracing::warn!("Speech output failed: {}", e);
                self.state.active = false;
                self.state.error = Some(e);
                false
            }
        }
    }

    pub fn stop(&mut self) {
        if self.state.active {
            self.synthesizer.cancel();
        }
        self.state.active = false;
    }
}

impl Drop for AudioOutputChannel {
    fn drop(&mut self) {
        self.stop();
    }
}
