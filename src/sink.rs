//! Video sink — a sequentially-writable video stream.
//!
//! [`VideoSink`] wraps an FFmpeg output context, an opened encoder, and an
//! RGB→YUV scaler for one output file. Frames are appended one at a time
//! with [`push`](VideoSink::push); [`finish`](VideoSink::finish) flushes the
//! encoder and writes the container trailer.
//!
//! The sink is exclusively owned by the assembly that created it. Dropping
//! an unfinished sink releases all OS and codec handles but leaves the
//! output file without a trailer — an indeterminate, to-be-discarded state,
//! which is the documented outcome of a failed assembly.

use std::path::{Path, PathBuf};

use ffmpeg_next::codec::Id;
use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::encoder::Video as FfmpegEncoder;
use ffmpeg_next::format::context::Output;
use ffmpeg_next::format::{Flags as FormatFlags, Pixel};
use ffmpeg_next::frame::Video as VideoFrame;
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use ffmpeg_next::{Packet, Rational};
use image::DynamicImage;
use image::imageops::FilterType;

use crate::error::FrameLoomError;

/// Supported output video codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoCodec {
    /// MPEG-4 Part 2 — the `mp4v` FourCC. This is the default.
    #[default]
    Mpeg4,
    /// H.264 / AVC.
    H264,
}

impl VideoCodec {
    fn to_codec_id(self) -> Id {
        match self {
            VideoCodec::Mpeg4 => Id::MPEG4,
            VideoCodec::H264 => Id::H264,
        }
    }

    fn input_pixel_format(self) -> Pixel {
        // Both encoders take YUV420P input.
        Pixel::YUV420P
    }
}

/// An opened, sequentially-writable video stream.
///
/// Created via [`VideoSink::create`]; append frames with
/// [`push`](VideoSink::push) and finalize with [`finish`](VideoSink::finish).
pub struct VideoSink {
    output: Output,
    encoder: FfmpegEncoder,
    scaler: ScalingContext,
    stream_index: usize,
    path: PathBuf,
    width: u32,
    height: u32,
    fps: u32,
    frame_index: i64,
}

impl VideoSink {
    /// Open an output file and an encoder for `width`×`height` frames at
    /// `fps` frames per second.
    ///
    /// The container format is inferred from the file extension.
    ///
    /// # Errors
    ///
    /// [`FrameLoomError::VideoEncodeError`] if the codec is unavailable or
    /// cannot be opened, or if the container header cannot be written.
    pub fn create<P: AsRef<Path>>(
        path: P,
        width: u32,
        height: u32,
        fps: u32,
        codec: VideoCodec,
    ) -> Result<Self, FrameLoomError> {
        let path = path.as_ref().to_path_buf();

        log::info!(
            "Opening video sink {} ({}x{} @ {} fps, codec={:?})",
            path.display(),
            width,
            height,
            fps,
            codec,
        );

        ffmpeg_next::init().map_err(|error| {
            FrameLoomError::VideoEncodeError(format!("FFmpeg initialisation failed: {error}"))
        })?;

        let codec_id = codec.to_codec_id();
        let target_pixel = codec.input_pixel_format();

        let mut output = ffmpeg_next::format::output(&path)
            .map_err(|e| FrameLoomError::VideoEncodeError(format!("cannot open output: {e}")))?;

        // Check if we need global header before adding the stream (avoids
        // borrow conflict).
        let needs_global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);

        let encoder_codec = ffmpeg_next::encoder::find(codec_id).ok_or_else(|| {
            FrameLoomError::VideoEncodeError(format!("codec {codec_id:?} not available"))
        })?;

        let mut stream = output.add_stream(encoder_codec).map_err(|e| {
            FrameLoomError::VideoEncodeError(format!("cannot add stream: {e}"))
        })?;

        let stream_index = stream.index();

        let mut encoder = {
            let ctx = CodecContext::from_parameters(stream.parameters()).map_err(|e| {
                FrameLoomError::VideoEncodeError(format!("cannot create codec context: {e}"))
            })?;
            ctx.encoder().video().map_err(|e| {
                FrameLoomError::VideoEncodeError(format!("cannot open video encoder: {e}"))
            })?
        };

        encoder.set_width(width);
        encoder.set_height(height);
        encoder.set_format(target_pixel);
        encoder.set_time_base(Rational::new(1, fps as i32));
        encoder.set_frame_rate(Some(Rational::new(fps as i32, 1)));

        if needs_global_header {
            unsafe {
                (*encoder.as_mut_ptr()).flags |=
                    ffmpeg_sys_next::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
            }
        }

        let opened_encoder = encoder.open_as(encoder_codec).map_err(|e| {
            FrameLoomError::VideoEncodeError(format!("cannot open encoder: {e}"))
        })?;

        // Copy encoder parameters back to the stream.
        stream.set_parameters(&opened_encoder);

        output
            .write_header()
            .map_err(|e| FrameLoomError::VideoEncodeError(format!("cannot write header: {e}")))?;

        let scaler = ScalingContext::get(
            Pixel::RGB24,
            width,
            height,
            target_pixel,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|e| FrameLoomError::VideoEncodeError(format!("cannot create scaler: {e}")))?;

        Ok(Self {
            output,
            encoder: opened_encoder,
            scaler,
            stream_index,
            path,
            width,
            height,
            fps,
            frame_index: 0,
        })
    }

    /// Append one image as the next video frame.
    ///
    /// The image is stretch-resized (no aspect preservation) to the sink's
    /// dimensions when they differ, converted to the encoder's pixel
    /// format, and encoded at the next presentation timestamp. Frames are
    /// written strictly in push order.
    pub fn push(&mut self, image: &DynamicImage) -> Result<(), FrameLoomError> {
        let rgb = if image.width() != self.width || image.height() != self.height {
            image
                .resize_exact(self.width, self.height, FilterType::Lanczos3)
                .to_rgb8()
        } else {
            image.to_rgb8()
        };

        // Copy pixel rows into an FFmpeg frame, honoring its stride.
        let mut src_frame = VideoFrame::new(Pixel::RGB24, self.width, self.height);
        let stride = src_frame.stride(0);
        let src_data = src_frame.data_mut(0);
        let rgb_bytes = rgb.as_raw();
        let row_len = (self.width as usize) * 3;
        for y in 0..self.height as usize {
            let src_start = y * row_len;
            let dst_start = y * stride;
            src_data[dst_start..dst_start + row_len]
                .copy_from_slice(&rgb_bytes[src_start..src_start + row_len]);
        }

        let mut dst_frame = VideoFrame::empty();
        self.scaler
            .run(&src_frame, &mut dst_frame)
            .map_err(|e| FrameLoomError::VideoEncodeError(format!("scaling failed: {e}")))?;

        dst_frame.set_pts(Some(self.frame_index));
        self.frame_index += 1;

        self.encoder
            .send_frame(&dst_frame)
            .map_err(|e| FrameLoomError::VideoEncodeError(format!("send_frame failed: {e}")))?;

        self.drain_packets()
    }

    /// Flush the encoder, write the container trailer, and close the file.
    ///
    /// Consumes the sink; all handles are released on return, success or
    /// not.
    pub fn finish(mut self) -> Result<(), FrameLoomError> {
        self.encoder
            .send_eof()
            .map_err(|e| FrameLoomError::VideoEncodeError(format!("send_eof failed: {e}")))?;
        self.drain_packets()?;

        self.output.write_trailer().map_err(|e| {
            FrameLoomError::VideoEncodeError(format!("cannot write trailer: {e}"))
        })?;

        log::info!(
            "Closed video sink {} ({} frames)",
            self.path.display(),
            self.frame_index,
        );

        Ok(())
    }

    /// Number of frames pushed so far.
    pub fn frames_written(&self) -> u64 {
        self.frame_index as u64
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Receive all packets the encoder has ready and write them out,
    /// rescaled from the encoder time base to the stream time base.
    fn drain_packets(&mut self) -> Result<(), FrameLoomError> {
        let mut packet = Packet::empty();
        while self.encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(self.stream_index);
            let stream_time_base = self
                .output
                .stream(self.stream_index)
                .ok_or_else(|| {
                    FrameLoomError::VideoEncodeError("output stream disappeared".to_string())
                })?
                .time_base();
            packet.rescale_ts(Rational::new(1, self.fps as i32), stream_time_base);
            packet
                .write_interleaved(&mut self.output)
                .map_err(|e| {
                    FrameLoomError::VideoEncodeError(format!("write packet failed: {e}"))
                })?;
        }
        Ok(())
    }
}
