//! Video metadata types.
//!
//! This module defines the metadata structures returned by
//! [`VideoSource::metadata`](crate::VideoSource::metadata). Metadata is
//! extracted once when the file is opened and cached for the lifetime of the
//! source.

use std::time::Duration;

/// Metadata for an opened video file.
///
/// # Example
///
/// ```no_run
/// use frameloom::VideoSource;
///
/// let source = VideoSource::open("input.mp4").unwrap();
/// let metadata = source.metadata();
/// println!("{}x{} @ {:.2} fps", metadata.video.width, metadata.video.height,
///     metadata.video.frames_per_second);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct SourceMetadata {
    /// Metadata of the best video stream.
    pub video: VideoMetadata,
    /// Total duration of the media file.
    pub duration: Duration,
    /// Container format name (e.g. `"mp4"`, `"matroska"`, `"avi"`).
    pub format: String,
}

/// Metadata for a video stream.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Estimated total number of frames, computed from duration and frame
    /// rate. Advisory only: zero or inexact for some containers, so the
    /// extraction loop never uses it as a bound.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"vp9"`, `"av1"`).
    pub codec: String,
}
