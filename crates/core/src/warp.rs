//! The warp seam: polar-coordinate pixel displacement of the luminance
//! field by the rasterized ripple buffer.
//!
//! [`WarpBackend`] isolates the pipeline from how the warp is computed so
//! the GPU pass (feature `render`) and the pure-CPU fallback are
//! interchangeable. Both must produce the sampling coordinates computed by
//! [`warp_source_uv`]; the CPU path is the reference.

use glam::DVec2;

use crate::error::EngineError;
use crate::field::{DispField, LumaField};

/// Produces a warped luminance raster from the current noise field and
/// displacement buffer.
pub trait WarpBackend {
    /// Warps `luma` by `disp` into a raster of `disp`'s dimensions.
    ///
    /// The displacement buffer is visible-surface-sized and defines the
    /// output size. A failing pass returns an error; the driver logs it and
    /// treats the stage as a no-op for the frame.
    fn warp(
        &mut self,
        luma: &LumaField,
        disp: &DispField,
        ripple_amount: f64,
    ) -> Result<LumaField, EngineError>;
}

/// Source coordinate for one output sample, in normalized image space.
///
/// The displacement intensity doubles as warp angle and warp magnitude:
/// `theta = intensity * 2π`, `dir = (sin θ, cos θ)`, and the source
/// coordinate is `uv + dir * intensity * ripple_amount`. Intensity 0 is the
/// identity.
pub fn warp_source_uv(uv: DVec2, intensity: f64, ripple_amount: f64) -> DVec2 {
    let theta = intensity * std::f64::consts::TAU;
    let dir = DVec2::new(theta.sin(), theta.cos());
    uv + dir * intensity * ripple_amount
}

/// Pure-CPU warp: the mandatory fallback and the reference for the GPU
/// pass. Bilinear, edge-clamped sampling of the luminance field.
#[derive(Debug, Default)]
pub struct CpuWarp;

impl CpuWarp {
    pub fn new() -> Self {
        Self
    }
}

impl WarpBackend for CpuWarp {
    fn warp(
        &mut self,
        luma: &LumaField,
        disp: &DispField,
        ripple_amount: f64,
    ) -> Result<LumaField, EngineError> {
        let out_w = disp.width();
        let out_h = disp.height();
        let mut out = LumaField::new(out_w, out_h)?;
        for y in 0..out_h {
            let v = (y as f64 + 0.5) / out_h as f64;
            for x in 0..out_w {
                let u = (x as f64 + 0.5) / out_w as f64;
                let intensity = disp.sample(u, v) as f64;
                let src = warp_source_uv(DVec2::new(u, v), intensity, ripple_amount);
                let sample = luma.sample_bilinear(src.x, src.y);
                out.set(x, y, sample.round().clamp(0.0, 255.0) as u8);
            }
        }
        Ok(out)
    }
}
