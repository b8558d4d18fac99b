//! Frame extraction — split a video into numbered still images.
//!
//! [`FrameExtractor`] decodes a video strictly sequentially and writes every
//! decoded frame to disk as `frame_0000.jpg`, `frame_0001.jpg`, … reporting
//! progress after each write. Extraction is single-pass and deterministic
//! for a given input file: no frame is skipped, reordered, or revisited.
//!
//! # Example
//!
//! ```no_run
//! use frameloom::{ExtractOptions, FrameExtractor, FrameLoomError};
//!
//! std::fs::create_dir_all("frames")?;
//! let written = FrameExtractor::new(ExtractOptions::new()).extract("input.mp4", "frames")?;
//! println!("wrote {written} frames");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use ffmpeg_next::{
    Error as FfmpegError, Packet, codec::context::Context as CodecContext,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use ffmpeg_next::format::Pixel;
use image::RgbImage;

use crate::{
    error::FrameLoomError,
    options::ExtractOptions,
    progress::{OperationType, ProgressTracker},
    source::VideoSource,
    utilities,
};

/// Splits a video into a sequence of still image files.
///
/// Create via [`FrameExtractor::new`], then call
/// [`extract`](FrameExtractor::extract). The extractor is stateless between
/// calls; each call owns its [`VideoSource`] exclusively and releases it on
/// every exit path.
pub struct FrameExtractor {
    options: ExtractOptions,
}

impl FrameExtractor {
    /// Create a new extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Decode `video_path` and write one image per frame into `output_dir`.
    ///
    /// Frames are named `frame_{i:04}.{ext}`, zero-indexed, in stream
    /// order. The container's advisory frame count drives the progress
    /// display only — decoding continues until the stream itself signals
    /// end-of-stream, so the count may legitimately disagree with the
    /// number of files written. The terminal progress event reports the
    /// true count on both sides.
    ///
    /// `output_dir` must already exist; creating it is the caller's
    /// responsibility.
    ///
    /// Returns the number of frames written.
    ///
    /// # Errors
    ///
    /// - [`FrameLoomError::SourceOpen`] if the video cannot be opened —
    ///   raised before any filesystem write.
    /// - [`FrameLoomError::NoVideoStream`] if the file has no video stream.
    /// - [`FrameLoomError::VideoDecodeError`] / [`FrameLoomError::FfmpegError`]
    ///   on decode failure.
    /// - [`FrameLoomError::ImageError`] if a frame cannot be encoded or
    ///   written (including a missing output directory).
    /// - [`FrameLoomError::Cancelled`] if the configured token was
    ///   cancelled.
    pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        video_path: P,
        output_dir: Q,
    ) -> Result<u64, FrameLoomError> {
        let output_dir = output_dir.as_ref();
        let mut source = VideoSource::open(video_path)?;

        let advisory_total = source.metadata().video.frame_count;
        let total = (advisory_total > 0).then_some(advisory_total);

        let video_stream_index = source.video_stream_index;
        let stream = source
            .input_context
            .stream(video_stream_index)
            .ok_or(FrameLoomError::NoVideoStream)?;
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let mut decoder = decoder_context.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();

        // Pixel-format converter: source format → RGB24 at native size.
        let mut scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        log::info!(
            "Extracting frames from {} into {} (~{} expected)",
            source.path().display(),
            output_dir.display(),
            advisory_total,
        );

        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::FrameExtraction,
            total,
        );

        let extension = self.options.format.extension();
        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();
        let mut written: u64 = 0;
        let mut eof_sent = false;

        loop {
            // Drain every frame the decoder has ready before feeding it
            // more packets.
            if decoder.receive_frame(&mut decoded_frame).is_ok() {
                if self.options.is_cancelled() {
                    return Err(FrameLoomError::Cancelled);
                }

                scaler.run(&decoded_frame, &mut rgb_frame)?;
                let buffer = utilities::frame_to_rgb_buffer(&rgb_frame, width, height);
                let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
                    FrameLoomError::VideoDecodeError(
                        "Failed to construct RGB image from decoded frame data".to_string(),
                    )
                })?;

                let file_path = output_dir.join(utilities::frame_file_name(written, extension));
                image.save(&file_path)?;
                written += 1;
                tracker.advance();
                continue;
            }

            if eof_sent {
                // Decoder fully drained.
                break;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut source.input_context) {
                Ok(()) => {
                    if packet.stream() == video_stream_index {
                        decoder.send_packet(&packet)?;
                    }
                    // Non-video packets are silently skipped.
                }
                Err(FfmpegError::Eof) => {
                    decoder.send_eof()?;
                    eof_sent = true;
                }
                Err(_) => {
                    // Non-fatal read error — try the next packet.
                }
            }
        }

        // Release the source before announcing completion.
        drop(source);

        tracker.finish();

        log::info!("Extraction finished: {written} frame(s) written");

        Ok(written)
    }
}
