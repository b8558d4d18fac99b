//! Progress reporting, preview hooks, and cancellation support.
//!
//! This module provides [`ProgressCallback`] for monitoring extraction and
//! assembly progress, [`PreviewSink`] for rendering a live preview of the
//! frame just processed, and [`CancellationToken`] for cooperative
//! cancellation.
//!
//! Both operations report after **every** frame, and once more with
//! [`ProgressInfo::completed`] set after the last frame. The terminal event
//! always reports `current == total == frames processed`, even when the total
//! was unknown or approximate while the operation ran.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use frameloom::{
//!     ExtractOptions, FrameExtractor, FrameLoomError, ProgressCallback, ProgressInfo,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{info}");
//!     }
//! }
//!
//! let options = ExtractOptions::new().with_progress(Arc::new(PrintProgress));
//! let written = FrameExtractor::new(options).extract("input.mp4", "frames")?;
//! # Ok::<(), FrameLoomError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use image::DynamicImage;

/// The kind of operation currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Splitting a video into still frames.
    FrameExtraction,
    /// Stitching still images into a video.
    VideoAssembly,
}

impl OperationType {
    fn label(self) -> &'static str {
        match self {
            OperationType::FrameExtraction => "extraction",
            OperationType::VideoAssembly => "assembly",
        }
    }
}

/// A snapshot of operation progress.
///
/// Delivered to [`ProgressCallback::on_progress`] after every frame, plus one
/// terminal event with [`completed`](ProgressInfo::completed) set.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many frames have been processed so far.
    pub current: u64,
    /// Total frames expected, if known ahead of time.
    ///
    /// For extraction this is the container's advisory frame count and may
    /// be absent or inexact; the terminal event replaces it with the true
    /// number of frames written.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
    /// `true` only for the final event of a successful operation.
    pub completed: bool,
}

impl Display for ProgressInfo {
    /// Renders the human status string a UI would display verbatim.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.completed {
            write!(
                f,
                "{} completed ({} frames)",
                self.operation.label(),
                self.current,
            )
        } else if let Some(total) = self.total {
            write!(f, "processing frame {}/{}", self.current, total)
        } else {
            write!(f, "processing frame {}", self.current)
        }
    }
}

/// Trait for receiving progress updates.
///
/// Implementations must be [`Send`] and [`Sync`] because operations are
/// typically run on a worker thread while the callback updates UI state
/// owned elsewhere.
///
/// Progress callbacks are **infallible** — they observe but cannot halt the
/// operation. Use [`CancellationToken`] for cooperative cancellation.
pub trait ProgressCallback: Send + Sync {
    /// Called after every processed frame, and once more on completion.
    fn on_progress(&self, info: &ProgressInfo);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Trait for receiving the frame just processed, for live preview.
///
/// The assembler invokes this once per image, after the image has been
/// appended to the output. Rendering here never slows the encoded file's
/// frame rate; see
/// [`AssembleOptions::with_realtime_pacing`](crate::AssembleOptions::with_realtime_pacing)
/// for wall-clock throttling.
pub trait PreviewSink: Send + Sync {
    /// Called with the zero-based frame index and the decoded image.
    fn on_frame(&self, index: u64, frame: &DynamicImage);
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clone this token and share it between threads; call
/// [`cancel`](CancellationToken::cancel) from any thread to request
/// cancellation. Both operations check
/// [`is_cancelled`](CancellationToken::is_cancelled) once per frame and
/// return [`FrameLoomError::Cancelled`](crate::FrameLoomError::Cancelled)
/// when it is set.
///
/// # Example
///
/// ```
/// use frameloom::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// // From another thread (or a signal handler, etc.):
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation.
    ///
    /// All clones of this token will observe the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal helper that tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one completed frame and fire the callback.
    pub(crate) fn advance(&mut self) {
        self.current += 1;
        self.report(false);
    }

    /// Emit the terminal event: `current == total == frames processed`.
    pub(crate) fn finish(&mut self) {
        self.total = Some(self.current);
        self.report(true);
    }

    fn report(&self, completed: bool) {
        let percentage = self
            .total
            .filter(|&t| t > 0)
            .map(|t| (self.current as f32 / t as f32) * 100.0);

        let info = ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed: self.start_time.elapsed(),
            completed,
        };

        self.callback.on_progress(&info);
    }
}
