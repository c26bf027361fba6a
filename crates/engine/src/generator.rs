//! Two-octave noise field generation.
//!
//! Each frame regenerates the full working-resolution luminance raster
//! from scratch: the field is a pure function of (time, configuration)
//! given a noise source, so there is no frame-to-frame state to manage.

use ripplefield_core::{EngineError, LumaField, NoiseOptions, NoiseSource};

/// Flat contribution of a disabled octave, the midpoint of the mapped
/// noise range before contrast is applied.
const NEUTRAL_OCTAVE: f64 = 127.5;

/// Generates luminance fields from an injected coherent-noise source.
pub struct NoiseField {
    source: Box<dyn NoiseSource>,
}

impl NoiseField {
    pub fn new(source: Box<dyn NoiseSource>) -> Self {
        Self { source }
    }

    /// Renders a `width` x `height` luminance raster at noise time `time`.
    ///
    /// `base_h` is the unpadded working height: octave coordinates are
    /// centered on `(width / 2, base_h / 2)` even when margin rows extend
    /// the raster below the visible area, so enabling displacement never
    /// shifts the visible pattern.
    ///
    /// The two octaves drift in opposite directions: octave 1 samples at
    /// `(x + t, y + t)` in its scaled frame, octave 2 at `(x - t, y - t)`.
    /// Each octave maps its raw [-1, 1] value to [0, 255], applies
    /// contrast around the 128 midpoint plus a brightness offset, and is
    /// optionally inverted. The output sample is the floored average of
    /// both octaves, clamped to [0, 255].
    pub fn generate(
        &self,
        time: f64,
        opts: &NoiseOptions,
        width: usize,
        height: usize,
        base_h: usize,
    ) -> Result<LumaField, EngineError> {
        let mut field = LumaField::new(width, height)?;
        let cx = width as f64 / 2.0;
        let cy = base_h as f64 / 2.0;

        for y in 0..height {
            let dy = y as f64 - cy;
            for x in 0..width {
                let dx = x as f64 - cx;

                let mut o1 = if opts.enable_perlin {
                    let nx = dx * opts.perlin_scale;
                    let ny = dy * opts.perlin_scale;
                    let raw = self.source.sample(nx + time, ny + time);
                    let v = (raw + 1.0) * 127.5;
                    (v - 128.0) * opts.perlin_contrast + 128.0 + opts.perlin_brightness
                } else {
                    NEUTRAL_OCTAVE
                };

                let mut o2 = if opts.enable_perlin2 {
                    let nx = dx * opts.perlin2_scale;
                    let ny = dy * opts.perlin2_scale;
                    let raw = self.source.sample(nx - time, ny - time);
                    let v = (raw + 1.0) * 127.5;
                    (v - 128.0) * opts.perlin2_contrast + 128.0 + opts.perlin2_brightness
                } else {
                    NEUTRAL_OCTAVE
                };

                if opts.invert_noise {
                    o1 = 255.0 - o1;
                    o2 = 255.0 - o2;
                }

                let combined = ((o1 + o2) / 2.0).floor().clamp(0.0, 255.0);
                field.set(x, y, combined as u8);
            }
        }

        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripplefield_core::PerlinSource;

    /// Constant-output source for exercising the per-sample mapping.
    struct ConstSource(f64);

    impl NoiseSource for ConstSource {
        fn sample(&self, _x: f64, _y: f64) -> f64 {
            self.0
        }
    }

    /// Source that returns its x coordinate, for probing where the
    /// generator samples.
    struct CoordSource;

    impl NoiseSource for CoordSource {
        fn sample(&self, x: f64, _y: f64) -> f64 {
            x
        }
    }

    fn opts() -> NoiseOptions {
        NoiseOptions::default()
    }

    #[test]
    fn both_octaves_disabled_yields_flat_127() {
        let generator = NoiseField::new(Box::new(PerlinSource::new(7)));
        let mut o = opts();
        o.enable_perlin = false;
        o.enable_perlin2 = false;

        for &t in &[0.0, 0.5, 123.456] {
            let field = generator.generate(t, &o, 16, 12, 12).unwrap();
            // Both octaves contribute 127.5; inversion maps each to 127.5;
            // floor(127.5) = 127 everywhere.
            assert!(
                field.data().iter().all(|&v| v == 127),
                "disabled octaves must render flat 127 at t = {t}"
            );
        }
    }

    #[test]
    fn constant_source_maps_through_contrast_and_inversion() {
        let generator = NoiseField::new(Box::new(ConstSource(0.0)));
        let mut o = opts();
        o.enable_perlin2 = false;

        // raw 0 -> 127.5 -> (127.5 - 128) * 3 + 128 = 126.5 -> invert 128.5;
        // octave 2 contributes inverted 127.5; floor((128.5 + 127.5) / 2) = 128.
        let field = generator.generate(0.0, &o, 4, 4, 4).unwrap();
        assert!(field.data().iter().all(|&v| v == 128));

        o.invert_noise = false;
        // floor((126.5 + 127.5) / 2) = 127.
        let field = generator.generate(0.0, &o, 4, 4, 4).unwrap();
        assert!(field.data().iter().all(|&v| v == 127));
    }

    #[test]
    fn extreme_contrast_clamps_to_byte_range() {
        let mut o = opts();
        o.perlin_contrast = 1000.0;
        o.enable_perlin2 = false;
        o.invert_noise = false;

        let generator = NoiseField::new(Box::new(ConstSource(1.0)));
        let field = generator.generate(0.0, &o, 4, 4, 4).unwrap();
        assert!(field.data().iter().all(|&v| v == 255));

        let generator = NoiseField::new(Box::new(ConstSource(-1.0)));
        let field = generator.generate(0.0, &o, 4, 4, 4).unwrap();
        assert!(field.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn octaves_drift_in_opposite_directions() {
        // With a coordinate-reporting source the first octave's input
        // grows with time while the second's shrinks.
        let generator = NoiseField::new(Box::new(CoordSource));
        let mut o = opts();
        o.invert_noise = false;
        o.perlin_contrast = 1.0;
        o.perlin2_contrast = 1.0;
        o.enable_perlin2 = false;

        let before = generator.generate(0.0, &o, 8, 8, 8).unwrap();
        let after = generator.generate(0.1, &o, 8, 8, 8).unwrap();
        assert!(after.get_clamped(4, 4) > before.get_clamped(4, 4));

        o.enable_perlin = false;
        o.enable_perlin2 = true;
        let before = generator.generate(0.0, &o, 8, 8, 8).unwrap();
        let after = generator.generate(0.1, &o, 8, 8, 8).unwrap();
        assert!(after.get_clamped(4, 4) < before.get_clamped(4, 4));
    }

    #[test]
    fn margin_rows_extend_pattern_without_shifting_center() {
        // The same (x, y) must produce the same sample whether or not
        // margin rows are present, because centering uses base_h.
        let generator = NoiseField::new(Box::new(PerlinSource::new(3)));
        let o = opts();

        let unpadded = generator.generate(0.25, &o, 20, 20, 20).unwrap();
        let padded = generator.generate(0.25, &o, 20, 29, 20).unwrap();
        for y in 0..20 {
            for x in 0..20 {
                assert_eq!(
                    unpadded.get_clamped(x, y),
                    padded.get_clamped(x, y),
                    "padding changed sample at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = NoiseField::new(Box::new(PerlinSource::new(42)));
        let o = opts();
        let a = generator.generate(1.5, &o, 24, 16, 16).unwrap();
        let b = generator.generate(1.5, &o, 24, 16, 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn frozen_time_freezes_the_field() {
        let generator = NoiseField::new(Box::new(PerlinSource::new(9)));
        let o = opts();
        let a = generator.generate(0.75, &o, 16, 16, 16).unwrap();
        let b = generator.generate(0.75, &o, 16, 16, 16).unwrap();
        assert_eq!(a, b);
        let c = generator.generate(0.76, &o, 16, 16, 16).unwrap();
        assert_ne!(a, c, "advancing time must change a live octave field");
    }
}
