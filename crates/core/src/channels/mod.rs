//! Device channels: audio output, video input and voice input.
//!
//! Channels run independently, but the session stops them as a bundle
//! whenever it leaves the "answering" phase. Completions that arrive
//! asynchronously (camera grants, recognition results) are delivered as
//! [`ChannelEvent`]s stamped with the epoch of the request that produced
//! them; a channel bumps its epoch on every release, so anything produced
//! for an earlier acquisition is recognized as stale and dropped.

pub mod audio;
pub mod capability;
pub mod video;
pub mod voice;

use crate::error::ChannelError;
use audio::AudioOutputChannel;
use capability::{CameraSource, RecognitionEvent, SpeechRecognizer, SpeechSynthesizer};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use video::{CameraGrant, VideoInputChannel};
use voice::VoiceInputChannel;

/// Per-channel status shown next to the channel's control.
///
/// `active` implies `enabled`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelState {
    pub enabled: bool,
    pub active: bool,
    pub error: Option<ChannelError>,
}

pub enum ChannelEvent {
    VideoReady {
        epoch: u64,
        result: Result<CameraGrant, ChannelError>,
    },
    Recognition {
        epoch: u64,
        event: RecognitionEvent,
    },
}

impl fmt::Debug for ChannelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelEvent::VideoReady { epoch, result } => f
                .debug_struct("VideoReady")
                .field("epoch", epoch)
                .field("stream", &result.as_ref().map(|g| g.id().to_string()))
                .finish(),
            ChannelEvent::Recognition { epoch, event } => f
                .debug_struct("Recognition")
                .field("epoch", epoch)
                .field("event", event)
                .finish(),
        }
    }
}

/// The host capabilities a session may use.
#[derive(Clone)]
pub struct Devices {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub camera: Arc<dyn CameraSource>,
}

impl Default for Devices {
    fn default() -> Self {
        Self {
            synthesizer: Arc::new(capability::Unavailable),
            recognizer: Arc::new(capability::Unavailable),
            camera: Arc::new(capability::Unavailable),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStates {
    pub audio_output: ChannelState,
    pub video_input: ChannelState,
    pub voice_input: ChannelState,
}

pub struct DeviceChannelManager {
    pub audio: AudioOutputChannel,
    pub video: VideoInputChannel,
    pub voice: VoiceInputChannel,
}

impl DeviceChannelManager {
    pub fn new(devices: Devices, events: UnboundedSender<ChannelEvent>) -> Self {
        Self {
            audio: AudioOutputChannel::new(devices.synthesizer),
            video: VideoInputChannel::new(devices.camera, events.clone()),
            voice: VoiceInputChannel::new(devices.recognizer, events),
        }
    }

    /// Stops every channel but keeps each one's `enabled` preference, so the
    /// next activation brings them back.
    pub fn suspend_all(&mut self) {
        self.voice.stop();
        self.audio.stop();
        self.video.suspend();
    }

    /// Applies an asynchronous completion. Returns a recognized fragment
    /// that belongs in the draft answer, if any.
    pub fn handle(&mut self, event: ChannelEvent) -> Option<String> {
        match event {
            ChannelEvent::VideoReady { epoch, result } => {
                self.video.on_ready(epoch, result);
                None
            }
            ChannelEvent::Recognition { epoch, event } => self.voice.on_event(epoch, event),
        }
    }

    pub fn states(&self) -> ChannelStates {
        ChannelStates {
            audio_output: self.audio.state(),
            video_input: self.video.state().clone(),
            voice_input: self.voice.state().clone(),
        }
    }

    pub fn any_active(&self) -> bool {
        self.audio.is_speaking() || self.video.state().active || self.voice.state().active
    }
}
