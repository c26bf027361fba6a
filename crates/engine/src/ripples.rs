//! Pointer ripple tracking and displacement rasterization.
//!
//! Each pointer movement spawns a ripple: an expanding ring whose warp
//! strength decays linearly over its lifetime. Spawns land in a pending
//! queue and are absorbed at the start of the next rasterization pass,
//! so a frame in progress never sees a half-added ripple.

use glam::DVec2;
use ripplefield_core::DispField;

/// Ripple lifetime in seconds.
pub const RIPPLE_DURATION: f64 = 1.5;
/// Ring expansion speed in surface pixels per second.
pub const RIPPLE_SPEED: f64 = 150.0;

/// One expanding ripple, anchored where the pointer crossed the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ripple {
    pos: DVec2,
    start_time: f64,
}

/// The live ripple set plus the pending-spawn queue.
#[derive(Debug, Default)]
pub struct RippleTracker {
    live: Vec<Ripple>,
    pending: Vec<Ripple>,
}

impl RippleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a ripple at surface coordinates `(x, y)`, stamped `now`.
    /// Duplicates are kept; each pointer event is its own ripple.
    pub fn spawn(&mut self, x: f64, y: f64, now: f64) {
        self.pending.push(Ripple {
            pos: DVec2::new(x, y),
            start_time: now,
        });
    }

    /// Number of ripples that will participate in the next rasterization.
    pub fn len(&self) -> usize {
        self.live.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.pending.is_empty()
    }

    /// Rebuilds the displacement buffer from every live ripple at time
    /// `now`, retiring those past [`RIPPLE_DURATION`].
    ///
    /// A ripple of age `a` paints a disc of radius `RIPPLE_SPEED * a`
    /// whose strength falls linearly from `min(ripple_amount * (1 -
    /// a / RIPPLE_DURATION), 1)` at the center to zero at the rim.
    /// Overlapping ripples accumulate additively, saturating at 1.
    pub fn rasterize(&mut self, disp: &mut DispField, now: f64, ripple_amount: f64) {
        self.live.append(&mut self.pending);
        disp.clear();

        self.live.retain(|r| now - r.start_time <= RIPPLE_DURATION);
        for ripple in &self.live {
            let age = now - ripple.start_time;
            if age < 0.0 {
                continue;
            }
            let radius = RIPPLE_SPEED * age;
            let amplitude = (ripple_amount * (1.0 - age / RIPPLE_DURATION)).min(1.0);
            paint_radial_falloff(disp, ripple.pos, radius, amplitude as f32);
        }
    }
}

/// Paints a disc whose value falls linearly from `amplitude` at `center`
/// to zero at `radius`, composited additively with saturation.
fn paint_radial_falloff(disp: &mut DispField, center: DVec2, radius: f64, amplitude: f32) {
    if radius <= 0.0 || amplitude <= 0.0 {
        return;
    }
    let w = disp.width() as isize;
    let h = disp.height() as isize;
    let x0 = ((center.x - radius).floor() as isize).max(0);
    let x1 = ((center.x + radius).ceil() as isize).min(w - 1);
    let y0 = ((center.y - radius).floor() as isize).max(0);
    let y1 = ((center.y + radius).ceil() as isize).min(h - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = DVec2::new(x as f64 + 0.5, y as f64 + 0.5).distance(center);
            if d >= radius {
                continue;
            }
            let value = amplitude * (1.0 - (d / radius) as f32);
            disp.add_saturating(x as usize, y as usize, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center_value(disp: &DispField) -> f32 {
        disp.get_clamped(disp.width() as isize / 2, disp.height() as isize / 2)
    }

    #[test]
    fn fresh_tracker_rasterizes_to_zero() {
        let mut tracker = RippleTracker::new();
        let mut disp = DispField::new(32, 32).unwrap();
        tracker.rasterize(&mut disp, 10.0, 0.2);
        assert!(disp.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn young_ripple_displaces_its_center() {
        let mut tracker = RippleTracker::new();
        let mut disp = DispField::new(40, 40).unwrap();
        tracker.spawn(20.0, 20.0, 0.0);
        tracker.rasterize(&mut disp, 0.2, 0.2);
        assert!(
            center_value(&disp) > 0.0,
            "a mid-life ripple must displace its center"
        );
    }

    #[test]
    fn expired_ripple_contributes_nothing_and_is_retired() {
        let mut tracker = RippleTracker::new();
        let mut disp = DispField::new(32, 32).unwrap();
        tracker.spawn(16.0, 16.0, 0.0);
        tracker.rasterize(&mut disp, RIPPLE_DURATION + 0.01, 0.2);
        assert!(disp.data().iter().all(|&v| v == 0.0));
        assert!(tracker.is_empty(), "expired ripples must be dropped");
    }

    #[test]
    fn ripple_at_exact_lifetime_has_zero_amplitude() {
        let mut tracker = RippleTracker::new();
        let mut disp = DispField::new(32, 32).unwrap();
        tracker.spawn(16.0, 16.0, 0.0);
        // age == duration is retained (<=) but its amplitude is exactly 0.
        tracker.rasterize(&mut disp, RIPPLE_DURATION, 0.2);
        assert!(disp.data().iter().all(|&v| v == 0.0));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn center_displacement_is_near_max_immediately_after_spawn() {
        let mut tracker = RippleTracker::new();
        let mut disp = DispField::new(100, 100).unwrap();
        tracker.spawn(50.0, 50.0, 0.0);

        let age = 0.05;
        let amount = 0.5;
        tracker.rasterize(&mut disp, age, amount);

        // The center texel sits half a pixel off the ripple anchor, so
        // its value is amplitude * (1 - sqrt(0.5) / radius) with
        // radius = 7.5, about 0.91 of the full amplitude.
        let amplitude = (amount * (1.0 - age / RIPPLE_DURATION)) as f32;
        let center = center_value(&disp);
        assert!(
            center >= 0.85 * amplitude,
            "center {center} below near-max for amplitude {amplitude}"
        );
        assert!(center <= amplitude, "center {center} exceeds amplitude {amplitude}");
    }

    #[test]
    fn displacement_is_zero_beyond_current_radius() {
        let mut tracker = RippleTracker::new();
        let mut disp = DispField::new(200, 200).unwrap();
        tracker.spawn(100.0, 100.0, 0.0);
        let age = 0.1; // radius = 15
        tracker.rasterize(&mut disp, age, 0.5);

        let radius = RIPPLE_SPEED * age;
        assert!(center_value(&disp) > 0.0);
        // A texel well outside the ring is untouched.
        let outside = disp.get_clamped(100 + radius as isize + 3, 100);
        assert_eq!(outside, 0.0);
    }

    #[test]
    fn amplitude_decays_with_age() {
        let mut young = DispField::new(100, 100).unwrap();
        let mut old = DispField::new(100, 100).unwrap();

        let mut tracker = RippleTracker::new();
        tracker.spawn(50.0, 50.0, 0.0);
        tracker.rasterize(&mut young, 0.1, 0.8);

        let mut tracker = RippleTracker::new();
        tracker.spawn(50.0, 50.0, 0.0);
        tracker.rasterize(&mut old, 1.2, 0.8);

        assert!(center_value(&young) > center_value(&old));
    }

    #[test]
    fn amplitude_is_capped_at_one() {
        let mut tracker = RippleTracker::new();
        let mut disp = DispField::new(64, 64).unwrap();
        tracker.spawn(32.0, 32.0, 0.0);
        tracker.rasterize(&mut disp, 0.01, 500.0);
        assert!(disp.data().iter().all(|&v| v <= 1.0));
    }

    #[test]
    fn overlapping_ripples_accumulate_additively() {
        let mut single = DispField::new(64, 64).unwrap();
        let mut double = DispField::new(64, 64).unwrap();

        let mut tracker = RippleTracker::new();
        tracker.spawn(32.0, 32.0, 0.0);
        tracker.rasterize(&mut single, 0.2, 0.1);

        let mut tracker = RippleTracker::new();
        tracker.spawn(32.0, 32.0, 0.0);
        tracker.spawn(32.0, 32.0, 0.0);
        tracker.rasterize(&mut double, 0.2, 0.1);

        assert!(center_value(&double) > center_value(&single));
    }

    #[test]
    fn spawns_are_pending_until_rasterize() {
        let mut tracker = RippleTracker::new();
        tracker.spawn(1.0, 1.0, 0.0);
        tracker.spawn(2.0, 2.0, 0.0);
        assert_eq!(tracker.len(), 2);

        let mut disp = DispField::new(16, 16).unwrap();
        tracker.rasterize(&mut disp, 0.1, 0.2);
        // Both absorbed into the live set, neither expired.
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn rasterize_clears_previous_frame() {
        let mut tracker = RippleTracker::new();
        let mut disp = DispField::new(32, 32).unwrap();
        tracker.spawn(16.0, 16.0, 0.0);
        tracker.rasterize(&mut disp, 0.2, 0.3);
        assert!(center_value(&disp) > 0.0);

        // Next frame after expiry starts from a cleared buffer.
        tracker.rasterize(&mut disp, RIPPLE_DURATION + 1.0, 0.3);
        assert!(disp.data().iter().all(|&v| v == 0.0));
    }
}
