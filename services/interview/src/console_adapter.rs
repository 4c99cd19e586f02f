//! Terminal stand-ins for the host speech capabilities.
//!
//! The speaker announces what would be spoken on its own line; the
//! recognizer turns dictation lines typed by the user into recognition
//! events so the voice-input path runs exactly as it would with a real
//! recognizer.

use interview_core::channels::capability::{
    RecognitionEvent, RecognitionSink, SpeechRecognizer, SpeechSynthesizer,
};
use interview_core::error::ChannelError;
use std::io::Write;
use std::sync::Mutex;

pub struct ConsoleSpeaker {
    supported: bool,
}

impl ConsoleSpeaker {
    pub fn new(supported: bool) -> Self {
        Self { supported }
    }

    /// Offers speech output only when the host has an output device.
    pub fn detect() -> Self {
        let supported = interview_native_utils::device::has_default_output();
        if !supported {
            tracing::info!("No audio output device found; speech output disabled");
        }
        Self::new(supported)
    }
}

impl SpeechSynthesizer for ConsoleSpeaker {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn speak(&self, text: &str, rate: f32, _pitch: f32) -> Result<(), ChannelError> {
        if !self.supported {
            return Err(ChannelError::Unsupported("Speech output".into()));
        }
        let mut out = std::io::stdout().lock();
        writeln!(out, "[speaking at {rate:.1}x] {text}")
            .map_err(|e| ChannelError::Failed(format!("Speech output failed: {e}")))
    }

    fn cancel(&self) {
        tracing::trace!("Speech cancelled");
    }

    // The line is written synchronously, so nothing is ever left playing.
    fn is_speaking(&self) -> bool {
        false
    }
}

/// Delivers dictated lines while a listening session is open.
#[derive(Default)]
pub struct ConsoleRecognizer {
    sink: Mutex<Option<RecognitionSink>>,
}

impl ConsoleRecognizer {
    /// Sends `text` as a final transcript. Returns `false` when nothing is
    /// listening.
    pub fn dictate(&self, text: &str) -> bool {
        let Ok(guard) = self.sink.lock() else {
            return false;
        };
        match guard.as_ref() {
            Some(sink) => sink.send(RecognitionEvent::Transcript {
                text: text.to_string(),
                is_final: true,
            }),
            None => false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.sink.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&self, sink: RecognitionSink) -> Result<(), ChannelError> {
        let mut guard = self
            .sink
            .lock()
            .map_err(|_| ChannelError::Failed("Recognizer state is unavailable".into()))?;
        *guard = Some(sink);
        Ok(())
    }

    fn stop(&self) {
        if let Ok(mut guard) = self.sink.lock() {
            if let Some(sink) = guard.take() {
                sink.send(RecognitionEvent::End);
            }
        }
    }
}
