//! Video assembly integration tests.
//!
//! Image fixtures are generated on the fly with the `image` crate; tests
//! that need a video encoder skip when the codec is unavailable on the
//! build platform.

use std::path::Path;
use std::sync::{Arc, Mutex};

use frameloom::{
    AssembleOptions, CancellationToken, FrameLoomError, OperationType, ProgressCallback,
    ProgressInfo, VideoAssembler, VideoSource,
};
use image::{Rgb, RgbImage};
use tempfile::tempdir;

fn write_image(dir: &Path, name: &str, width: u32, height: u32, shade: u8) {
    let image = RgbImage::from_pixel(width, height, Rgb([shade, shade, shade]));
    image.save(dir.join(name)).expect("save fixture image");
}

/// Skip guard for platforms without the MPEG-4 encoder.
fn encoder_unavailable(error: &FrameLoomError) -> bool {
    let message = format!("{error}");
    message.contains("cannot open encoder") || message.contains("not available")
}

struct RecordingProgress {
    infos: Mutex<Vec<ProgressInfo>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().unwrap().push(info.clone());
    }
}

#[test]
fn assembles_images_and_reports_progress_per_frame() {
    let images = tempdir().expect("tempdir");
    for (index, name) in ["a.jpg", "b.jpg", "c.png"].iter().enumerate() {
        write_image(images.path(), name, 32, 24, (index * 40) as u8);
    }
    let out = tempdir().expect("tempdir");

    let recorder = Arc::new(RecordingProgress {
        infos: Mutex::new(Vec::new()),
    });
    let options = AssembleOptions::new()
        .with_fps(10)
        .with_progress(recorder.clone());

    let result = VideoAssembler::new(options).assemble(images.path(), out.path().join("clip"));
    let output_path = match result {
        Err(ref e) if encoder_unavailable(e) => {
            eprintln!("Skipping: encoder not available ({e})");
            return;
        }
        other => other.expect("assemble"),
    };

    assert!(output_path.is_absolute());
    assert!(output_path.exists());
    assert_eq!(output_path.extension().unwrap(), "mp4");
    assert!(std::fs::metadata(&output_path).unwrap().len() > 0);

    let infos = recorder.infos.lock().unwrap();
    // One event per image plus the terminal event.
    assert_eq!(infos.len(), 4);
    for info in infos.iter() {
        assert_eq!(info.operation, OperationType::VideoAssembly);
    }
    for window in infos.windows(2) {
        assert!(window[1].current >= window[0].current);
    }
    let last = infos.last().unwrap();
    assert!(last.completed);
    assert_eq!(last.current, 3);
    assert_eq!(last.total, Some(3));
}

#[test]
fn dimensions_inferred_from_first_sorted_image() {
    let images = tempdir().expect("tempdir");
    // "first" sorts before "second" and sets the output dimensions.
    write_image(images.path(), "first.jpg", 32, 24, 10);
    write_image(images.path(), "second.jpg", 64, 48, 200);
    let out = tempdir().expect("tempdir");

    let result =
        VideoAssembler::new(AssembleOptions::new()).assemble(images.path(), out.path().join("v"));
    let output_path = match result {
        Err(ref e) if encoder_unavailable(e) => return,
        other => other.expect("assemble"),
    };

    let source = VideoSource::open(&output_path).expect("open assembled video");
    assert_eq!(source.metadata().video.width, 32);
    assert_eq!(source.metadata().video.height, 24);
}

#[test]
fn explicit_dimensions_are_honored_exactly() {
    let images = tempdir().expect("tempdir");
    write_image(images.path(), "only.png", 32, 24, 128);
    let out = tempdir().expect("tempdir");

    let options = AssembleOptions::new().with_dimensions(Some(16), Some(16));
    let result = VideoAssembler::new(options).assemble(images.path(), out.path().join("v"));
    let output_path = match result {
        Err(ref e) if encoder_unavailable(e) => return,
        other => other.expect("assemble"),
    };

    // The first image is resized too — no silent override of the caller.
    let source = VideoSource::open(&output_path).expect("open assembled video");
    assert_eq!(source.metadata().video.width, 16);
    assert_eq!(source.metadata().video.height, 16);
}

#[test]
fn empty_directory_writes_no_output() {
    let images = tempdir().expect("tempdir");
    let out = tempdir().expect("tempdir");

    let result = VideoAssembler::new(AssembleOptions::new())
        .assemble(images.path(), out.path().join("clip"));

    assert!(matches!(result, Err(FrameLoomError::EmptyDirectory { .. })));
    assert!(!out.path().join("clip.mp4").exists());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn zero_fps_is_rejected_before_any_work() {
    let images = tempdir().expect("tempdir");
    let out = tempdir().expect("tempdir");

    let result = VideoAssembler::new(AssembleOptions::new().with_fps(0))
        .assemble(images.path(), out.path().join("clip"));

    // Validation fires before the directory scan, so even the empty
    // directory above is not reported.
    assert!(matches!(result, Err(FrameLoomError::InvalidParameter(_))));
}

#[test]
fn zero_dimension_is_rejected() {
    let images = tempdir().expect("tempdir");
    let out = tempdir().expect("tempdir");

    let options = AssembleOptions::new().with_dimensions(Some(0), Some(16));
    let result = VideoAssembler::new(options).assemble(images.path(), out.path().join("clip"));

    assert!(matches!(result, Err(FrameLoomError::InvalidParameter(_))));
}

#[test]
fn blank_output_name_is_rejected() {
    let images = tempdir().expect("tempdir");

    let result = VideoAssembler::new(AssembleOptions::new()).assemble(images.path(), "  ");

    assert!(matches!(result, Err(FrameLoomError::InvalidParameter(_))));
}

#[test]
fn cancelled_assembly_returns_cancelled() {
    let images = tempdir().expect("tempdir");
    write_image(images.path(), "only.jpg", 32, 24, 50);
    let out = tempdir().expect("tempdir");

    let token = CancellationToken::new();
    token.cancel(); // Cancel immediately.

    let options = AssembleOptions::new().with_cancellation(token);
    let result = VideoAssembler::new(options).assemble(images.path(), out.path().join("clip"));

    match result {
        Err(FrameLoomError::Cancelled) => {}
        Err(ref e) if encoder_unavailable(e) => {}
        other => panic!("Expected Cancelled, got: {other:?}"),
    }
}

#[test]
fn rerunning_disambiguates_the_output_name() {
    let images = tempdir().expect("tempdir");
    write_image(images.path(), "only.jpg", 32, 24, 50);
    let out = tempdir().expect("tempdir");
    let requested = out.path().join("clip.mp4");

    let assembler = VideoAssembler::new(AssembleOptions::new());

    let first = match assembler.assemble(images.path(), &requested) {
        Err(ref e) if encoder_unavailable(e) => return,
        other => other.expect("first assemble"),
    };
    let second = assembler
        .assemble(images.path(), &requested)
        .expect("second assemble");

    assert!(first.ends_with("clip.mp4"));
    assert!(second.ends_with("clip_1.mp4"));
    assert!(first.exists());
    assert!(second.exists());
}
