//! Async request/response hand-off between the render loop and a detector.
//!
//! The render loop calls [`DetectionService::request`] with the current
//! frame and reads [`DetectionService::latest`] when drawing. A request made
//! while another is in flight is dropped, so the frame simply uses the
//! previous result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::{DetectError, FaceDetection, FaceDetector};
use crate::source::PixelBuffer;

/// Latest detection result visible to the render loop.
#[derive(Debug, Clone, Default)]
pub enum DetectionState {
    /// No detection has completed yet
    #[default]
    Pending,
    /// Result of the most recent completed detection (possibly empty)
    Ready(Arc<Vec<FaceDetection>>),
}

impl DetectionState {
    /// Detected faces; empty while pending.
    pub fn faces(&self) -> &[FaceDetection] {
        match self {
            DetectionState::Pending => &[],
            DetectionState::Ready(faces) => faces,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, DetectionState::Pending)
    }
}

/// Runs a [`FaceDetector`] on tokio tasks and publishes results through a
/// watch channel.
pub struct DetectionService<D> {
    detector: Arc<D>,
    tx: Arc<watch::Sender<DetectionState>>,
    rx: watch::Receiver<DetectionState>,
    in_flight: Arc<AtomicBool>,
    timeout: Option<Duration>,
}

impl<D: FaceDetector> DetectionService<D> {
    pub fn new(detector: D) -> Self {
        let (tx, rx) = watch::channel(DetectionState::Pending);
        Self {
            detector: Arc::new(detector),
            tx: Arc::new(tx),
            rx,
            in_flight: Arc::new(AtomicBool::new(false)),
            timeout: None,
        }
    }

    /// Treat detections slower than `timeout` as failed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Start a detection for `frame` unless one is already running.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Returns
    /// `true` if a detection was started, `false` if the request was dropped.
    pub fn request(&self, frame: PixelBuffer) -> bool {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return false;
        }

        let detector = Arc::clone(&self.detector);
        let tx = Arc::clone(&self.tx);
        let in_flight = Arc::clone(&self.in_flight);
        let timeout = self.timeout;

        tokio::spawn(async move {
            let task = tokio::spawn(async move {
                match timeout {
                    Some(limit) => tokio::time::timeout(limit, detector.detect(frame))
                        .await
                        .unwrap_or(Err(DetectError::TimedOut(limit))),
                    None => detector.detect(frame).await,
                }
            });

            let result = match task.await {
                Ok(result) => result,
                Err(_) => Err(DetectError::Aborted),
            };

            let faces = match result {
                Ok(faces) => {
                    log::debug!("Face detection complete: {} face(s)", faces.len());
                    faces
                }
                Err(e) => {
                    log::warn!("{}; treating frame as having no faces", e);
                    Vec::new()
                }
            };

            in_flight.store(false, Ordering::SeqCst);
            tx.send_replace(DetectionState::Ready(Arc::new(faces)));
        });

        true
    }

    /// Most recent result, or `Pending` before the first completes.
    pub fn latest(&self) -> DetectionState {
        self.rx.borrow().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until a new result is published.
    pub async fn wait_for_update(&mut self) -> DetectionState {
        // The sender lives in `self`, so the channel cannot close here.
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }
}
