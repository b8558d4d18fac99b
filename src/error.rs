//! Error types for the `frameloom` crate.
//!
//! This module defines [`FrameLoomError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry the context needed to
//! diagnose a failure at the call site: file paths, parameter names, and
//! upstream error messages.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `frameloom` operations.
///
/// Every public method that can fail returns `Result<T, FrameLoomError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrameLoomError {
    /// The video file could not be opened as a media stream.
    #[error("Failed to open video at {path}: {reason}")]
    SourceOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file was opened but contains no video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The image directory contains no recognized image files.
    ///
    /// Raised before any output file is created.
    #[error("No image files found in {path}")]
    EmptyDirectory {
        /// The directory that was scanned.
        path: PathBuf,
    },

    /// A caller-supplied parameter failed pre-flight validation
    /// (zero frame rate, zero dimension, blank output name).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// A frame could not be encoded or written to the output container.
    #[error("Video encoding error: {0}")]
    VideoEncodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while decoding, encoding, or
    /// resizing a still image.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The operation was cancelled via a
    /// [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<FfmpegError> for FrameLoomError {
    fn from(error: FfmpegError) -> Self {
        FrameLoomError::FfmpegError(error.to_string())
    }
}
