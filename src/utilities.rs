//! Internal utility functions.
//!
//! Helpers for pixel-data copying and frame-file naming shared by the
//! extraction and assembly paths.

use ffmpeg_next::frame::Video as VideoFrame;

/// Zero-padding width of frame-file indices (`frame_0000.jpg`, ...).
pub(crate) const FRAME_INDEX_WIDTH: usize = 4;

/// Build the file name for an extracted frame.
///
/// Indices are zero-based and zero-padded to [`FRAME_INDEX_WIDTH`] digits so
/// that lexicographic directory order matches stream order.
pub(crate) fn frame_file_name(index: u64, extension: &str) -> String {
    format!("frame_{index:0width$}.{extension}", width = FRAME_INDEX_WIDTH)
}

/// Copy pixel data from an FFmpeg video frame into a tightly-packed RGB
/// buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3).
/// This function strips that padding so the result can be passed directly to
/// [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == expected_stride {
        // No padding — fast path: copy the entire plane at once.
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        // Stride includes padding bytes — copy row by row.
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::frame_file_name;

    #[test]
    fn frame_file_names_are_zero_padded() {
        assert_eq!(frame_file_name(0, "jpg"), "frame_0000.jpg");
        assert_eq!(frame_file_name(7, "png"), "frame_0007.png");
        assert_eq!(frame_file_name(123, "jpg"), "frame_0123.jpg");
    }

    #[test]
    fn frame_file_names_grow_past_padding() {
        // Five-digit indices are longer than the pad width, not truncated.
        assert_eq!(frame_file_name(10_000, "jpg"), "frame_10000.jpg");
    }
}
