//! Operation configuration.
//!
//! [`ExtractOptions`] and [`AssembleOptions`] are builders that thread
//! progress callbacks, cancellation tokens, and per-operation settings
//! through [`FrameExtractor`](crate::FrameExtractor) and
//! [`VideoAssembler`](crate::VideoAssembler) without polluting every
//! function signature.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use frameloom::{AssembleOptions, CancellationToken, ProgressCallback, ProgressInfo};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{info}");
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = AssembleOptions::new()
//!     .with_fps(24)
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{CancellationToken, NoOpProgress, PreviewSink, ProgressCallback};
use crate::sink::VideoCodec;

/// Still-image encoding used for extracted frames.
///
/// The default is [`Jpeg`](FrameFormat::Jpeg), a lossy encoding; use
/// [`Png`](FrameFormat::Png) when lossless frames are worth the disk space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameFormat {
    /// Lossy JPEG. This is the default.
    #[default]
    Jpeg,
    /// Lossless PNG.
    Png,
}

impl FrameFormat {
    /// File extension for this format, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FrameFormat::Jpeg => "jpg",
            FrameFormat::Png => "png",
        }
    }
}

/// Configuration for [`FrameExtractor`](crate::FrameExtractor).
///
/// All fields have defaults — a default-constructed value extracts JPEG
/// frames with no progress reporting and no cancellation.
#[derive(Clone)]
pub struct ExtractOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// Image encoding for written frames.
    pub(crate) format: FrameFormat,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("format", &self.format)
            .finish()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            format: FrameFormat::default(),
        }
    }

    /// Attach a progress callback, invoked after every written frame.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token, checked once per frame.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set the still-image encoding for written frames.
    #[must_use]
    pub fn with_format(mut self, format: FrameFormat) -> Self {
        self.format = format;
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

/// Configuration for [`VideoAssembler`](crate::VideoAssembler).
///
/// Output dimensions are optional: `None` (the default) infers both from the
/// first image in sorted order, and every later image is stretch-resized to
/// match it. Explicit dimensions are honored exactly — then **every** image,
/// including the first, is stretch-resized. There is no silent override of
/// caller-supplied values.
#[derive(Clone)]
pub struct AssembleOptions {
    /// Output frames per second (default: 30).
    pub(crate) fps: u32,
    /// Explicit output width, or `None` to infer from the first image.
    pub(crate) width: Option<u32>,
    /// Explicit output height, or `None` to infer from the first image.
    pub(crate) height: Option<u32>,
    /// Output codec (default: MPEG-4 Part 2, the `mp4v` tag).
    pub(crate) codec: VideoCodec,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// Preview hook, invoked once per appended frame.
    pub(crate) preview: Option<Arc<dyn PreviewSink>>,
    /// Sleep ~1/fps per frame so a preview animates in real time.
    pub(crate) realtime_pacing: bool,
}

impl Debug for AssembleOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AssembleOptions")
            .field("fps", &self.fps)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("codec", &self.codec)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("has_preview", &self.preview.is_some())
            .field("realtime_pacing", &self.realtime_pacing)
            .finish()
    }
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AssembleOptions {
    /// Create a new configuration with default settings.
    ///
    /// Defaults: 30 fps, dimensions inferred from the first image, MPEG-4
    /// codec, no progress, no cancellation, no preview, no pacing.
    pub fn new() -> Self {
        Self {
            fps: 30,
            width: None,
            height: None,
            codec: VideoCodec::default(),
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            preview: None,
            realtime_pacing: false,
        }
    }

    /// Set the output frame rate.
    ///
    /// Validated at [`assemble`](crate::VideoAssembler::assemble) time:
    /// zero is rejected with
    /// [`InvalidParameter`](crate::FrameLoomError::InvalidParameter).
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set explicit output dimensions.
    ///
    /// Pass `None` for either value to infer it from the first image.
    /// Zero values are rejected at assemble time.
    #[must_use]
    pub fn with_dimensions(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the output codec.
    #[must_use]
    pub fn with_codec(mut self, codec: VideoCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Attach a progress callback, invoked after every appended frame.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token, checked once per frame.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Attach a preview hook, invoked with each decoded image after it has
    /// been appended to the output.
    #[must_use]
    pub fn with_preview(mut self, sink: Arc<dyn PreviewSink>) -> Self {
        self.preview = Some(sink);
        self
    }

    /// Sleep approximately `1/fps` seconds after each frame so an attached
    /// preview animates at playback speed. Off by default; the encoded
    /// file's frame rate is unaffected either way.
    #[must_use]
    pub fn with_realtime_pacing(mut self, paced: bool) -> Self {
        self.realtime_pacing = paced;
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
