//! Ordered image-directory listings.
//!
//! [`ImageSet`] is the sorted list of image files the assembler processes.
//! The ordering is the definitive processing order: file names compared
//! case-insensitively, ascending. Callers relying on capture timestamps or
//! unpadded numeric sequences must name files accordingly — a pure
//! lexicographic sort puts `frame_10.jpg` before `frame_2.jpg`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::FrameLoomError;

/// Image file extensions the assembler recognizes.
///
/// Matched case-sensitively against the file name's extension, so
/// `photo.JPG` is skipped. One lossy and one lossless raster format.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["jpg", "png"];

/// An ordered set of image file paths from one directory.
///
/// Created via [`ImageSet::scan`]. The set is never empty: a directory with
/// no recognized images fails the scan instead, before any output is
/// created. The ordering is stable and deterministic for a fixed directory
/// listing.
///
/// # Example
///
/// ```no_run
/// use frameloom::{FrameLoomError, ImageSet};
///
/// let set = ImageSet::scan("frames")?;
/// println!("{} images, first: {}", set.len(), set.first().display());
/// # Ok::<(), FrameLoomError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ImageSet {
    directory: PathBuf,
    paths: Vec<PathBuf>,
}

impl ImageSet {
    /// List the recognized image files in `directory`, sorted by
    /// case-insensitive file name.
    ///
    /// # Errors
    ///
    /// - [`FrameLoomError::IoError`] if the directory cannot be read.
    /// - [`FrameLoomError::EmptyDirectory`] if no recognized image file is
    ///   found.
    pub fn scan<P: AsRef<Path>>(directory: P) -> Result<Self, FrameLoomError> {
        let directory = directory.as_ref().to_path_buf();

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if is_recognized(&path) {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(FrameLoomError::EmptyDirectory { path: directory });
        }

        paths.sort_by_key(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        });

        log::debug!(
            "Scanned {}: {} image(s), first is {}",
            directory.display(),
            paths.len(),
            paths[0].display(),
        );

        Ok(Self { directory, paths })
    }

    /// The image paths, in processing order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of images in the set. Always at least 1.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always `false`; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The first image in sorted order, used for the dimension probe.
    pub fn first(&self) -> &Path {
        &self.paths[0]
    }

    /// The directory this set was scanned from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Extension check against [`RECOGNIZED_EXTENSIONS`], case-sensitive.
fn is_recognized(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| RECOGNIZED_EXTENSIONS.contains(&extension))
}

#[cfg(test)]
mod tests {
    use super::is_recognized;
    use std::path::Path;

    #[test]
    fn recognizes_jpg_and_png() {
        assert!(is_recognized(Path::new("a.jpg")));
        assert!(is_recognized(Path::new("b.png")));
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        assert!(!is_recognized(Path::new("a.JPG")));
        assert!(!is_recognized(Path::new("b.Png")));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_recognized(Path::new("notes.txt")));
        assert!(!is_recognized(Path::new("clip.mp4")));
        assert!(!is_recognized(Path::new("no_extension")));
    }
}
