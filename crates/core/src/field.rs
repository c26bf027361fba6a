//! Raster field types for the frame pipeline.
//!
//! [`LumaField`] is a dense grid of `u8` luminance samples (0 to 255),
//! regenerated in full every frame by the noise generator. [`DispField`]
//! is a dense grid of `f32` warp strengths in [0, 1], rasterized from the
//! live ripple set. Both use row-major layout and **edge-clamped**
//! coordinate access: out-of-range sample coordinates clamp to the nearest
//! valid texel, matching the CLAMP_TO_EDGE semantics of the GPU path.

use crate::error::EngineError;

fn checked_len(width: usize, height: usize) -> Result<usize, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(EngineError::InvalidDimensions)
}

/// A 2D grid of `u8` luminance samples with edge-clamped addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumaField {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl LumaField {
    /// Creates a zero-filled (black) field of the given dimensions.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Creates a field from a pre-built sample vector, validating that
    /// `data.len() == width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<u8>) -> Result<Self, EngineError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(EngineError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in texels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sample at integer texel coordinates, edge-clamped.
    pub fn get_clamped(&self, x: isize, y: isize) -> u8 {
        let xi = x.clamp(0, self.width as isize - 1) as usize;
        let yi = y.clamp(0, self.height as isize - 1) as usize;
        self.data[yi * self.width + xi]
    }

    /// Writes a sample at in-bounds texel coordinates.
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x] = value;
    }

    /// Nearest-texel sample at fractional pixel coordinates: floor, then
    /// edge-clamp. This is the sampling the stipple compositor uses.
    pub fn sample_nearest(&self, x: f64, y: f64) -> u8 {
        self.get_clamped(x.floor() as isize, y.floor() as isize)
    }

    /// Bilinear sample at normalized coordinates (u, v) in [0, 1], with
    /// texel centers at `(i + 0.5) / size` and edge clamping, matching a
    /// LINEAR + CLAMP_TO_EDGE texture fetch. Returns luminance in [0, 255].
    pub fn sample_bilinear(&self, u: f64, v: f64) -> f64 {
        let px = u * self.width as f64 - 0.5;
        let py = v * self.height as f64 - 0.5;
        let x0 = px.floor();
        let y0 = py.floor();
        let fx = px - x0;
        let fy = py - y0;

        let x0 = x0 as isize;
        let y0 = y0 as isize;
        let s00 = self.get_clamped(x0, y0) as f64;
        let s10 = self.get_clamped(x0 + 1, y0) as f64;
        let s01 = self.get_clamped(x0, y0 + 1) as f64;
        let s11 = self.get_clamped(x0 + 1, y0 + 1) as f64;

        let top = s00 + (s10 - s00) * fx;
        let bottom = s01 + (s11 - s01) * fx;
        top + (bottom - top) * fy
    }
}

/// A 2D grid of `f32` warp strengths in [0, 1].
///
/// This is the displacement buffer the ripple tracker rasterizes into and
/// the warp stage consumes; each value plays the role of the original
/// displacement texture's red channel.
#[derive(Debug, Clone)]
pub struct DispField {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl DispField {
    /// Creates a zero-filled displacement field.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Field width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in texels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Resets every value to zero. Called at the start of each ripple
    /// rasterization pass.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Value at integer texel coordinates, edge-clamped.
    pub fn get_clamped(&self, x: isize, y: isize) -> f32 {
        let xi = x.clamp(0, self.width as isize - 1) as usize;
        let yi = y.clamp(0, self.height as isize - 1) as usize;
        self.data[yi * self.width + xi]
    }

    /// Adds `value` at in-bounds texel coordinates, saturating at 1.0.
    ///
    /// This is the "lighter" compositing of overlapping ripples: additive
    /// with a brightness ceiling.
    pub fn add_saturating(&mut self, x: usize, y: usize, value: f32) {
        debug_assert!(x < self.width && y < self.height);
        let cell = &mut self.data[y * self.width + x];
        *cell = (*cell + value).min(1.0);
    }

    /// Warp strength at normalized coordinates (u, v) in [0, 1].
    ///
    /// Nearest-texel lookup; the warp stage samples this field at output
    /// texel centers of a same-sized raster, where nearest and linear
    /// filtering coincide.
    pub fn sample(&self, u: f64, v: f64) -> f32 {
        let x = (u * self.width as f64).floor() as isize;
        let y = (v * self.height as f64).floor() as isize;
        self.get_clamped(x, y)
    }
}
