//! Host device capabilities the channels drive.
//!
//! Each capability is feature-detected through `is_supported` before first
//! use. Runtimes inject their own implementations; [`Unavailable`] stands in
//! for any capability a host does not have.

use super::ChannelEvent;
use crate::error::ChannelError;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc::UnboundedSender;

/// Text-to-speech output.
#[cfg_attr(test, automock)]
pub trait SpeechSynthesizer: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Starts speaking `text`. Implementations must not queue: the channel
    /// always cancels before speaking again.
    fn speak(&self, text: &str, rate: f32, pitch: f32) -> Result<(), ChannelError>;

    fn cancel(&self);

    /// Whether the last utterance is still being spoken.
    fn is_speaking(&self) -> bool;
}

/// Something a recognizer reports while it is listening.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Transcript { text: String, is_final: bool },
    Error(ChannelError),
    /// Recognition stopped on its own, e.g. after a stretch of silence.
    End,
}

/// Where a recognizer delivers its events. Each sink is stamped with the
/// listening session it belongs to so that late events can be told apart.
#[derive(Debug, Clone)]
pub struct RecognitionSink {
    epoch: u64,
    tx: UnboundedSender<ChannelEvent>,
}

impl RecognitionSink {
    pub(crate) fn new(epoch: u64, tx: UnboundedSender<ChannelEvent>) -> Self {
        Self { epoch, tx }
    }

    /// Returns `false` once nobody is listening for events any more.
    pub fn send(&self, event: RecognitionEvent) -> bool {
        self.tx
            .send(ChannelEvent::Recognition {
                epoch: self.epoch,
                event,
            })
            .is_ok()
    }
}

/// Continuous, interim-result speech-to-text.
#[cfg_attr(test, automock)]
pub trait SpeechRecognizer: Send + Sync {
    fn is_supported(&self) -> bool;

    fn start(&self, sink: RecognitionSink) -> Result<(), ChannelError>;

    fn stop(&self);
}

/// A live capture stream. Dropping the handle is not enough to release the
/// device; `stop_tracks` must be called.
pub trait MediaStream: Send {
    fn id(&self) -> &str;

    fn stop_tracks(&mut self);

    fn live_tracks(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub video: bool,
    pub audio: bool,
}

impl StreamConstraints {
    pub const VIDEO_ONLY: Self = Self {
        video: true,
        audio: false,
    };
}

#[async_trait]
pub trait CameraSource: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Requests a stream. Permission prompts may keep this pending for a
    /// long time; denial is reported as [`ChannelError::PermissionDenied`].
    async fn get_stream(
        &self,
        constraints: StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, ChannelError>;
}

/// A host without the capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl SpeechSynthesizer for Unavailable {
    fn is_supported(&self) -> bool {
        false
    }

    fn speak(&self, _text: &str, _rate: f32, _pitch: f32) -> Result<(), ChannelError> {
        Err(ChannelError::Unsupported("Speech output".into()))
    }

    fn cancel(&self) {}

    fn is_speaking(&self) -> bool {
        false
    }
}

impl SpeechRecognizer for Unavailable {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&self, _sink: RecognitionSink) -> Result<(), ChannelError> {
        Err(ChannelError::Unsupported("Speech recognition".into()))
    }

    fn stop(&self) {}
}

#[async_trait]
impl CameraSource for Unavailable {
    fn is_supported(&self) -> bool {
        false
    }

    async fn get_stream(
        &self,
        _constraints: StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, ChannelError> {
        Err(ChannelError::DeviceNotFound("camera".into()))
    }
}
