//! PNG snapshot of a presented frame.
//!
//! Feature-gated behind `png` (default on) so embedders that present
//! frames elsewhere can depend on the engine without the `image` crate.

use std::path::Path;

use ripplefield_core::{EngineError, Pixmap};

/// Writes a frame to disk as a PNG.
///
/// Returns `EngineError::InvalidDimensions` if the frame dimensions
/// overflow `u32`, or `EngineError::Io` on encode/write failure.
pub fn write_png(frame: &Pixmap, path: &Path) -> Result<(), EngineError> {
    let w = u32::try_from(frame.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(frame.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, frame.data().to_vec())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_png_round_trip() {
        let mut frame = Pixmap::new(16, 8).unwrap();
        frame.fill([10, 200, 30, 255]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_png(&frame, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 8);
        assert_eq!(img.get_pixel(3, 3).0, [10, 200, 30, 255]);
    }
}
