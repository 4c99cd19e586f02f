use super::capability::{CameraSource, MediaStream, StreamConstraints};
use super::{ChannelEvent, ChannelState};
use crate::error::ChannelError;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// A granted camera stream on its way to the channel. Dropping a grant that
/// was never claimed stops its tracks.
pub struct CameraGrant(Option<Box<dyn MediaStream>>);

impl CameraGrant {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        Self(Some(stream))
    }

    pub fn id(&self) -> &str {
        self.0.as_deref().map_or("", |s| s.id())
    }

    fn claim(mut self) -> Option<Box<dyn MediaStream>> {
        self.0.take()
    }
}

impl Drop for CameraGrant {
    fn drop(&mut self) {
        if let Some(mut stream) = self.0.take() {
            tracing::debug!("Stopping unclaimed camera stream {}", stream.id());
            stream.stop_tracks();
        }
    }
}

/// Camera preview. Holds at most one stream; every acquisition is paired
/// with a release on every exit path, including drop.
pub struct VideoInputChannel {
    camera: Arc<dyn CameraSource>,
    events: UnboundedSender<ChannelEvent>,
    state: ChannelState,
    stream: Option<Box<dyn MediaStream>>,
    epoch: u64,
    pending: bool,
}

impl VideoInputChannel {
    pub fn new(camera: Arc<dyn CameraSource>, events: UnboundedSender<ChannelEvent>) -> Self {
        Self {
            camera,
            events,
            state: ChannelState::default(),
            stream: None,
            epoch: 0,
            pending: false,
        }
    }

    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    pub fn is_supported(&self) -> bool {
        self.camera.is_supported()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn stream_id(&self) -> Option<&str> {
        self.stream.as_deref().map(|s| s.id())
    }

    /// Marks the channel enabled without touching the camera yet. The next
    /// `resume` acquires it.
    pub fn enable_on_activation(&mut self) -> bool {
        if !self.is_supported() {
            self.state.enabled = false;
            self.state.error = Some(ChannelError::Unsupported("Camera".into()));
            return false;
        }
        self.state.enabled = true;
        self.state.error = None;
        true
    }

    /// Enables the channel and requests camera access right away. An
    /// existing stream is released before the new request goes out.
    pub fn enable(&mut self) -> bool {
        if !self.enable_on_activation() {
            return false;
        }
        self.acquire()
    }

    pub fn disable(&mut self) {
        self.release();
        self.state.enabled = false;
    }

    /// Releases the camera but keeps the channel enabled.
    pub fn suspend(&mut self) {
        self.release();
    }

    /// Re-acquires the camera if the channel is enabled and idle.
    pub fn resume(&mut self) {
        if self.state.enabled && self.stream.is_none() && !self.pending {
            self.acquire();
        }
    }

    fn acquire(&mut self) -> bool {
        self.release();
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("Camera request skipped: no async runtime is running");
            self.state.enabled = false;
            self.state.error = Some(ChannelError::Failed("Camera could not be started".into()));
            return false;
        };
        let epoch = self.epoch;
        self.pending = true;
        let camera = self.camera.clone();
        let events = self.events.clone();
        tracing::debug!("Requesting camera stream (epoch {})", epoch);
        runtime.spawn(async move {
            let result = camera
                .get_stream(StreamConstraints::VIDEO_ONLY)
                .await
                .map(CameraGrant::new);
            // An undelivered grant stops its tracks when the event drops.
            if events.send(ChannelEvent::VideoReady { epoch, result }).is_err() {
                tracing::debug!("Camera result for epoch {} had no receiver", epoch);
            }
        });
        true
    }

    /// Stops all tracks of the held stream and invalidates any request
    /// still in flight.
    fn release(&mut self) {
        self.epoch += 1;
        self.pending = false;
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!("Stopping camera stream {}", stream.id());
            stream.stop_tracks();
        }
        self.state.active = false;
    }

    /// Applies the outcome of a camera request. Outcomes for a superseded
    /// request are discarded, and their stream is stopped immediately.
    pub fn on_ready(&mut self, epoch: u64, result: Result<CameraGrant, ChannelError>) {
        if epoch != self.epoch || !self.pending {
            tracing::debug!("Discarding stale camera result (epoch {} != {})", epoch, self.epoch);
            return;
        }

        self.pending = false;
        match result.map(CameraGrant::claim) {
            Ok(Some(stream)) => {
                tracing::info!(
                    "Camera stream {} attached ({} live tracks)",
                    stream.id(),
                    stream.live_tracks()
                );
                self.stream = Some(stream);
                self.state.active = true;
                self.state.error = None;
            }
            Ok(None) => {
                self.state.active = false;
            }
            Err(e) => {
                tracing::warn!("Camera unavailable: {}", e);
                self.state.active = false;
                self.state.enabled = false;
                self.state.error = Some(e);
            }
        }
    }
}

impl Drop for VideoInputChannel {
    fn drop(&mut self) {
        self.release();
    }
}
