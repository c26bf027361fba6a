//! Stipple dot compositor.
//!
//! Replaces the composite with a black backdrop and draws one white disc
//! per cached Poisson point. Dot size tracks darkness (dark areas get
//! large dots), and when displacement is on, brighter samples push their
//! dots upward, giving the layer a relief-like motion.

use glam::DVec2;
use ripplefield_core::pixmap::{BLACK, WHITE};
use ripplefield_core::{LumaField, NoiseOptions, Pixmap};

/// Draws the stipple layer over `out`.
///
/// `field` is whatever luminance raster the frame produced (warped and
/// visible-sized when the ripple pass ran, working-sized otherwise);
/// each point samples it at the point's unscaled working-buffer
/// coordinate with floor + edge clamping. Dot placement scales by
/// `out.width() / working_w` horizontally and `out.height() / base_h`
/// vertically, so the bottom margin rows feed displacement without being
/// mapped into view.
///
/// A point is skipped when its sample exceeds `brightness_threshold`;
/// the default threshold of 255 keeps every point.
pub fn draw_stipple(
    out: &mut Pixmap,
    field: &LumaField,
    points: &[DVec2],
    opts: &NoiseOptions,
    working_w: usize,
    base_h: usize,
) {
    out.fill(BLACK);
    if working_w == 0 || base_h == 0 {
        return;
    }
    let scale_x = out.width() as f64 / working_w as f64;
    let scale_y = out.height() as f64 / base_h as f64;

    for pt in points {
        let brightness = field.sample_nearest(pt.x, pt.y) as f64;
        if brightness > opts.brightness_threshold {
            continue;
        }
        let radius =
            opts.min_dot_size + (1.0 - brightness / 255.0) * (opts.max_dot_size - opts.min_dot_size);
        let x = pt.x * scale_x;
        let mut y = pt.y * scale_y;
        if opts.displacement_enabled {
            y -= (brightness / 255.0) * opts.displacement_amount;
        }
        out.fill_circle(x, y, radius, WHITE);
    }
}
