//! Output path normalization and collision-avoidance tests.

use std::fs;

use frameloom::resolve_output_path;
use tempfile::tempdir;

#[test]
fn extension_appended_when_missing() {
    let dir = tempdir().expect("tempdir");
    let requested = dir.path().join("timelapse");

    let resolved = resolve_output_path(&requested);
    assert_eq!(resolved, dir.path().join("timelapse.mp4"));
}

#[test]
fn free_path_is_unchanged() {
    let dir = tempdir().expect("tempdir");
    let requested = dir.path().join("out.mp4");

    assert_eq!(resolve_output_path(&requested), requested);
}

#[test]
fn existing_file_gets_numeric_suffix() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("out.mp4"), b"x").expect("write");

    let resolved = resolve_output_path(dir.path().join("out.mp4"));
    assert_eq!(resolved, dir.path().join("out_1.mp4"));
}

#[test]
fn suffix_increments_against_the_original_stem() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("out.mp4"), b"x").expect("write");
    fs::write(dir.path().join("out_1.mp4"), b"x").expect("write");

    let resolved = resolve_output_path(dir.path().join("out.mp4"));
    assert_eq!(resolved, dir.path().join("out_2.mp4"));
}

#[test]
fn appended_extension_still_disambiguates() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("clip.mp4"), b"x").expect("write");

    let resolved = resolve_output_path(dir.path().join("clip"));
    assert_eq!(resolved, dir.path().join("clip_1.mp4"));
}

#[test]
fn uppercase_extension_is_accepted() {
    let dir = tempdir().expect("tempdir");
    let requested = dir.path().join("clip.MP4");

    assert_eq!(resolve_output_path(&requested), requested);
}
