//! Video assembly — stitch a folder of still images into a video.
//!
//! [`VideoAssembler`] lists the recognized images in a directory, sorts them
//! by case-insensitive file name, and appends each one to a [`VideoSink`]
//! at a fixed frame rate, reporting progress and optionally feeding a
//! preview hook after every frame.
//!
//! # Example
//!
//! ```no_run
//! use frameloom::{AssembleOptions, FrameLoomError, VideoAssembler};
//!
//! let options = AssembleOptions::new().with_fps(24);
//! let output = VideoAssembler::new(options).assemble("frames", "timelapse")?;
//! println!("wrote {}", output.display());
//! # Ok::<(), FrameLoomError>(())
//! ```

use std::{
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use crate::{
    error::FrameLoomError,
    imageset::ImageSet,
    options::AssembleOptions,
    progress::{OperationType, ProgressTracker},
    sink::VideoSink,
};

/// File extension of assembled videos, without the leading dot.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Normalize a requested output path into the path actually written.
///
/// Appends `.mp4` when the path does not already end in it (ASCII
/// case-insensitive check), then, while a file exists at the candidate
/// path, appends `_1`, `_2`, … to the original stem until the path is
/// free: an existing `out.mp4` yields `out_1.mp4`, and with both present
/// the next run yields `out_2.mp4`.
///
/// The check happens once, before writing begins; it is not re-validated
/// against a file created concurrently afterwards.
pub fn resolve_output_path<P: AsRef<Path>>(requested: P) -> PathBuf {
    let requested = requested.as_ref();

    let has_extension = requested
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(OUTPUT_EXTENSION));

    let normalized = if has_extension {
        requested.to_path_buf()
    } else {
        let mut os_string = requested.as_os_str().to_os_string();
        os_string.push(".");
        os_string.push(OUTPUT_EXTENSION);
        PathBuf::from(os_string)
    };

    if !normalized.exists() {
        return normalized;
    }

    // Disambiguate against the original stem, not the previous candidate.
    let stem = normalized
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = normalized.parent().unwrap_or_else(|| Path::new(""));

    let mut index = 1u32;
    loop {
        let candidate = parent.join(format!("{stem}_{index}.{OUTPUT_EXTENSION}"));
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}

/// Stitches a directory of still images into one video file.
///
/// Create via [`VideoAssembler::new`], then call
/// [`assemble`](VideoAssembler::assemble). The assembler is stateless
/// between calls; each call owns its [`VideoSink`] exclusively and releases
/// it on every exit path.
pub struct VideoAssembler {
    options: AssembleOptions,
}

impl VideoAssembler {
    /// Create a new assembler with the given options.
    pub fn new(options: AssembleOptions) -> Self {
        Self { options }
    }

    /// Assemble the images in `image_dir` into a video at `output_path`.
    ///
    /// Images are processed in case-insensitive sorted-name order. Output
    /// dimensions come from the options when set, otherwise from the first
    /// image; every other image (every image, with explicit dimensions) is
    /// stretch-resized to match. The output path is normalized and
    /// disambiguated via [`resolve_output_path`] before the sink opens.
    ///
    /// A failure mid-sequence fails the whole assembly: the partially
    /// written file is left in an indeterminate, to-be-discarded state,
    /// though all codec and file handles are still released.
    ///
    /// Returns the absolute path of the finished video.
    ///
    /// # Errors
    ///
    /// - [`FrameLoomError::InvalidParameter`] for a zero frame rate, a zero
    ///   dimension, or a blank output name — raised before any work.
    /// - [`FrameLoomError::EmptyDirectory`] if no recognized image is found
    ///   — raised before any output file is created.
    /// - [`FrameLoomError::ImageError`] if an image fails to decode.
    /// - [`FrameLoomError::VideoEncodeError`] on encoder or container
    ///   failure.
    /// - [`FrameLoomError::Cancelled`] if the configured token was
    ///   cancelled.
    pub fn assemble<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        image_dir: P,
        output_path: Q,
    ) -> Result<PathBuf, FrameLoomError> {
        let image_dir = image_dir.as_ref();
        let output_path = output_path.as_ref();

        self.validate(output_path)?;

        let set = ImageSet::scan(image_dir)?;
        let total = set.len() as u64;

        let (width, height) = self.resolve_dimensions(&set)?;
        let resolved_path = resolve_output_path(output_path);
        if resolved_path != output_path {
            log::debug!(
                "Output path normalized: {} -> {}",
                output_path.display(),
                resolved_path.display(),
            );
        }

        log::info!(
            "Assembling {} image(s) from {} into {} ({}x{} @ {} fps)",
            total,
            image_dir.display(),
            resolved_path.display(),
            width,
            height,
            self.options.fps,
        );

        let mut sink = VideoSink::create(
            &resolved_path,
            width,
            height,
            self.options.fps,
            self.options.codec,
        )?;

        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::VideoAssembly,
            Some(total),
        );

        // The pacing sleep animates an attached preview at playback speed;
        // the encoded file's frame rate comes solely from the sink's fps.
        let pacing = self
            .options
            .realtime_pacing
            .then(|| Duration::from_secs_f64(1.0 / self.options.fps as f64));

        for (index, path) in set.paths().iter().enumerate() {
            if self.options.is_cancelled() {
                return Err(FrameLoomError::Cancelled);
            }

            let image = image::open(path)?;
            sink.push(&image)?;
            tracker.advance();

            if let Some(preview) = &self.options.preview {
                preview.on_frame(index as u64, &image);
            }

            if let Some(delay) = pacing {
                thread::sleep(delay);
            }
        }

        sink.finish()?;
        tracker.finish();

        let absolute = std::fs::canonicalize(&resolved_path).unwrap_or(resolved_path);

        log::info!("Assembly finished: {}", absolute.display());

        Ok(absolute)
    }

    /// Pre-flight parameter checks, before any filesystem work.
    fn validate(&self, output_path: &Path) -> Result<(), FrameLoomError> {
        if self.options.fps == 0 {
            return Err(FrameLoomError::InvalidParameter(
                "frame rate must be greater than zero".to_string(),
            ));
        }
        if self.options.width == Some(0) || self.options.height == Some(0) {
            return Err(FrameLoomError::InvalidParameter(
                "output dimensions must be greater than zero".to_string(),
            ));
        }
        if output_path.as_os_str().is_empty()
            || output_path
                .file_name()
                .is_none_or(|name| name.to_string_lossy().trim().is_empty())
        {
            return Err(FrameLoomError::InvalidParameter(
                "output name must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Explicit dimensions win; anything unspecified comes from the first
    /// image in sorted order.
    fn resolve_dimensions(&self, set: &ImageSet) -> Result<(u32, u32), FrameLoomError> {
        match (self.options.width, self.options.height) {
            (Some(width), Some(height)) => Ok((width, height)),
            (width, height) => {
                let (probed_width, probed_height) = image::image_dimensions(set.first())?;
                Ok((
                    width.unwrap_or(probed_width),
                    height.unwrap_or(probed_height),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_output_path;
    use std::path::Path;

    #[test]
    fn appends_extension_when_missing() {
        let resolved = resolve_output_path("no_such_dir/clip");
        assert_eq!(resolved, Path::new("no_such_dir/clip.mp4"));
    }

    #[test]
    fn keeps_existing_extension() {
        let resolved = resolve_output_path("no_such_dir/clip.mp4");
        assert_eq!(resolved, Path::new("no_such_dir/clip.mp4"));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let resolved = resolve_output_path("no_such_dir/clip.MP4");
        assert_eq!(resolved, Path::new("no_such_dir/clip.MP4"));
    }

    #[test]
    fn non_video_extension_is_kept_and_appended_to() {
        let resolved = resolve_output_path("no_such_dir/clip.v2");
        assert_eq!(resolved, Path::new("no_such_dir/clip.v2.mp4"));
    }
}
