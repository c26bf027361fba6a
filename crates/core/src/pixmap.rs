//! RGBA8 composite raster with the 2D primitives the pipeline draws with:
//! solid fill, filled disc, and nearest-neighbor stretch blit of a
//! luminance field. This is the CPU stand-in for the original 2D canvas
//! surface; no anti-aliasing, pixel centers decide coverage.

use crate::error::EngineError;
use crate::field::LumaField;

/// Opaque black.
pub const BLACK: [u8; 4] = [0, 0, 0, 255];
/// Opaque white.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// An RGBA8 raster buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Pixmap {
    /// Creates a transparent-black pixmap of the given dimensions.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or if the pixel count overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Pixmap width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Pixmap height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, row-major, `width * height * 4` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The RGBA quad at in-bounds pixel coordinates.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        debug_assert!(x < self.width && y < self.height);
        let i = (y * self.width + x) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Fills the whole pixmap with one color.
    pub fn fill(&mut self, color: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Paints a filled disc centered at `(cx, cy)` with the given radius.
    ///
    /// A pixel is covered when its center lies inside the disc; discs that
    /// cover no pixel centers paint nothing. Out-of-bounds coverage is
    /// clipped.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: [u8; 4]) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let y_min = ((cy - radius).floor().max(0.0)) as usize;
        let y_max = ((cy + radius).ceil().min(self.height as f64 - 1.0)).max(0.0) as usize;
        let x_min = ((cx - radius).floor().max(0.0)) as usize;
        let x_max = ((cx + radius).ceil().min(self.width as f64 - 1.0)).max(0.0) as usize;
        for y in y_min..=y_max {
            let dy = y as f64 + 0.5 - cy;
            for x in x_min..=x_max {
                let dx = x as f64 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    let i = (y * self.width + x) * 4;
                    self.data[i..i + 4].copy_from_slice(&color);
                }
            }
        }
    }

    /// Stretch-blits the top `src_h` rows of a luminance field over the
    /// whole pixmap as opaque grayscale, nearest-neighbor.
    ///
    /// `src_h` exists because the noise buffer carries extra margin rows at
    /// the bottom that must not appear on screen; pass the unpadded height
    /// to crop them away.
    pub fn blit_scaled(&mut self, src: &LumaField, src_h: usize) {
        let src_h = src_h.clamp(1, src.height());
        let sx = src.width() as f64 / self.width as f64;
        let sy = src_h as f64 / self.height as f64;
        for y in 0..self.height {
            let src_y = (y as f64 * sy) as isize;
            for x in 0..self.width {
                let src_x = (x as f64 * sx) as isize;
                let l = src.get_clamped(src_x, src_y);
                let i = (y * self.width + x) * 4;
                self.data[i..i + 4].copy_from_slice(&[l, l, l, 255]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(Pixmap::new(0, 4).is_err());
        assert!(Pixmap::new(4, 0).is_err());
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut pm = Pixmap::new(3, 2).unwrap();
        pm.fill(BLACK);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(pm.pixel(x, y), BLACK);
            }
        }
    }

    #[test]
    fn fill_circle_covers_center_pixel() {
        let mut pm = Pixmap::new(9, 9).unwrap();
        pm.fill(BLACK);
        pm.fill_circle(4.5, 4.5, 2.0, WHITE);
        assert_eq!(pm.pixel(4, 4), WHITE);
        // Corner well outside the disc stays black.
        assert_eq!(pm.pixel(0, 0), BLACK);
    }

    #[test]
    fn fill_circle_respects_radius() {
        let mut pm = Pixmap::new(11, 11).unwrap();
        pm.fill(BLACK);
        pm.fill_circle(5.5, 5.5, 3.0, WHITE);
        // 3 pixels left of center: distance 3.0, inside (<=).
        assert_eq!(pm.pixel(2, 5), WHITE);
        // 4 pixels away: outside.
        assert_eq!(pm.pixel(1, 5), BLACK);
    }

    #[test]
    fn fill_circle_clips_at_edges() {
        let mut pm = Pixmap::new(4, 4).unwrap();
        pm.fill(BLACK);
        pm.fill_circle(0.0, 0.0, 3.0, WHITE);
        assert_eq!(pm.pixel(0, 0), WHITE);
        assert_eq!(pm.pixel(3, 3), BLACK);
    }

    #[test]
    fn fill_circle_zero_radius_paints_nothing() {
        let mut pm = Pixmap::new(4, 4).unwrap();
        pm.fill(BLACK);
        pm.fill_circle(2.0, 2.0, 0.0, WHITE);
        assert!(pm.data().chunks_exact(4).all(|px| px == BLACK));
    }

    #[test]
    fn blit_scaled_identity_size_copies_samples() {
        let src = LumaField::from_data(2, 2, vec![10, 20, 30, 40]).unwrap();
        let mut pm = Pixmap::new(2, 2).unwrap();
        pm.blit_scaled(&src, 2);
        assert_eq!(pm.pixel(0, 0), [10, 10, 10, 255]);
        assert_eq!(pm.pixel(1, 1), [40, 40, 40, 255]);
    }

    #[test]
    fn blit_scaled_crops_margin_rows() {
        // 2x3 source whose bottom row is margin; blit only the top 2 rows.
        let src = LumaField::from_data(2, 3, vec![10, 10, 20, 20, 99, 99]).unwrap();
        let mut pm = Pixmap::new(2, 2).unwrap();
        pm.blit_scaled(&src, 2);
        assert_eq!(pm.pixel(0, 0), [10, 10, 10, 255]);
        assert_eq!(pm.pixel(0, 1), [20, 20, 20, 255]);
    }

    #[test]
    fn blit_scaled_upscales_nearest() {
        let src = LumaField::from_data(1, 1, vec![128]).unwrap();
        let mut pm = Pixmap::new(4, 4).unwrap();
        pm.blit_scaled(&src, 1);
        assert!(pm
            .data()
            .chunks_exact(4)
            .all(|px| px == [128, 128, 128, 255]));
    }

    #[test]
    fn blit_scaled_downscales_nearest() {
        // 4x1 source, 2x1 target: target x=0 -> src 0, x=1 -> src 2.
        let src = LumaField::from_data(4, 1, vec![0, 50, 100, 150]).unwrap();
        let mut pm = Pixmap::new(2, 1).unwrap();
        pm.blit_scaled(&src, 1);
        assert_eq!(pm.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(pm.pixel(1, 0), [100, 100, 100, 255]);
    }
}
