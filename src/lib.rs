//! # frameloom
//!
//! Split a video into still frames, and stitch a folder of stills back into
//! a video.
//!
//! `frameloom` provides two blocking, self-contained operations built on
//! FFmpeg via the [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)
//! crate and the [`image`](https://crates.io/crates/image) crate:
//!
//! - [`FrameExtractor`] decodes a video strictly sequentially and writes
//!   every frame as a zero-padded numbered image (`frame_0000.jpg`, …).
//! - [`VideoAssembler`] reads a directory of images in case-insensitive
//!   sorted-name order and encodes them into a video at a fixed frame rate.
//!
//! Both report progress after every frame through a [`ProgressCallback`],
//! support cooperative cancellation via a [`CancellationToken`], and own
//! their FFmpeg handles exclusively, so two operations can run on separate
//! threads without shared mutable state.
//!
//! ## Quick Start
//!
//! ### Split a video into frames
//!
//! ```no_run
//! use frameloom::{ExtractOptions, FrameExtractor};
//!
//! std::fs::create_dir_all("frames").unwrap();
//! let written = FrameExtractor::new(ExtractOptions::new())
//!     .extract("input.mp4", "frames")
//!     .unwrap();
//! println!("{written} frames");
//! ```
//!
//! ### Stitch frames into a video
//!
//! ```no_run
//! use frameloom::{AssembleOptions, VideoAssembler};
//!
//! let output = VideoAssembler::new(AssembleOptions::new().with_fps(30))
//!     .assemble("frames", "output")
//!     .unwrap();
//! println!("wrote {}", output.display());
//! ```
//!
//! ### Watch progress
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use frameloom::{AssembleOptions, ProgressCallback, ProgressInfo, VideoAssembler};
//!
//! struct PrintProgress;
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{info}");
//!     }
//! }
//!
//! let options = AssembleOptions::new().with_progress(Arc::new(PrintProgress));
//! VideoAssembler::new(options).assemble("frames", "output").unwrap();
//! ```
//!
//! ## Behavior notes
//!
//! - Assembly processes files in case-insensitive lexicographic name order,
//!   so unpadded numeric names misorder (`frame_10.jpg` before
//!   `frame_2.jpg`). Extraction's zero-padded names round-trip correctly.
//! - An existing file at the output path is never overwritten; the
//!   assembler writes to `name_1.mp4`, `name_2.mp4`, … instead.
//! - Neither operation retries or recovers mid-stream: the first
//!   unrecoverable error fails the whole run, and a partially written
//!   output is left for the caller to discard. OS and codec handles are
//!   released on every exit path.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod assemble;
pub mod error;
pub mod extract;
pub mod ffmpeg;
pub mod imageset;
pub mod metadata;
pub mod options;
pub mod progress;
pub mod sink;
pub mod source;
mod utilities;

pub use assemble::{OUTPUT_EXTENSION, VideoAssembler, resolve_output_path};
pub use error::FrameLoomError;
pub use extract::FrameExtractor;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use imageset::{ImageSet, RECOGNIZED_EXTENSIONS};
pub use metadata::{SourceMetadata, VideoMetadata};
pub use options::{AssembleOptions, ExtractOptions, FrameFormat};
pub use progress::{
    CancellationToken, OperationType, PreviewSink, ProgressCallback, ProgressInfo,
};
pub use sink::{VideoCodec, VideoSink};
pub use source::VideoSource;
