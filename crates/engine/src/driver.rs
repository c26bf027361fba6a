//! Frame sequencing and animation lifecycle.
//!
//! [`NoiseAnimation`] owns the working buffers, the cached Poisson
//! point set, the ripple tracker, and the injected capabilities (noise
//! source, warp backend, clock, scheduler, surface). Everything runs on
//! one logical thread: ticks, option updates, and pointer events are
//! plain method calls and never overlap.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use glam::DVec2;
use ripplefield_core::{
    DispField, EngineError, Invalidation, NoiseOptions, NoiseSource, OptionsPatch, Pixmap,
    WarpBackend, Xorshift64,
};

use crate::generator::NoiseField;
use crate::poisson::{generate_poisson_points, DEFAULT_CANDIDATES};
use crate::ripples::RippleTracker;
use crate::stipple::draw_stipple;
use crate::surface::Surface;

/// Monotonic time source, in seconds. Ripple ages are differences of
/// `now()` values, so only monotonicity matters, not the epoch.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall-clock seconds since construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually advanced clock for tests and offline rendering.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that moves this clock from outside the driver.
    pub fn handle(&self) -> Rc<Cell<f64>> {
        Rc::clone(&self.now)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Requests future ticks from whatever drives the frame loop.
///
/// The driver schedules the next tick at the top of the current one and
/// cancels any pending request on `stop()`, so no frame can land after
/// `stop()` returns.
pub trait TickScheduler {
    /// Requests one tick. Returns false when the host cannot schedule;
    /// the driver still renders the current frame.
    fn schedule(&mut self) -> bool;
    /// Revokes the pending request, if any.
    fn cancel(&mut self);
}

/// Scheduler whose pending flag is stepped by the test harness or the
/// offline render loop.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    pending: Rc<Cell<bool>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the pending flag. The harness clears it before
    /// delivering the tick it stands for.
    pub fn pending(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.pending)
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self) -> bool {
        self.pending.set(true);
        true
    }

    fn cancel(&mut self) {
        self.pending.set(false);
    }
}

/// The animation driver.
///
/// Generic over the surface so callers keep typed access to their sink
/// (the offline renderer reads frames back out of a `MemorySurface`).
pub struct NoiseAnimation<S: Surface> {
    opts: NoiseOptions,
    time: f64,
    running: bool,

    generator: NoiseField,
    tracker: RippleTracker,
    warp: Option<Box<dyn WarpBackend>>,
    surface: S,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn TickScheduler>,
    rng: Xorshift64,

    base_w: usize,
    base_h: usize,
    noise_h: usize,
    points: Vec<DVec2>,
    composite: Pixmap,
    disp: DispField,
}

impl<S: Surface> NoiseAnimation<S> {
    /// Builds the driver against a surface, sizing working buffers and
    /// generating the initial Poisson point set.
    ///
    /// `warp` is the ripple pass backend; `None` (GPU setup failed or
    /// was never attempted) disables the ripple/warp path while the
    /// rest of the pipeline keeps rendering.
    pub fn new(
        opts: NoiseOptions,
        source: Box<dyn NoiseSource>,
        warp: Option<Box<dyn WarpBackend>>,
        surface: S,
        clock: Box<dyn Clock>,
        scheduler: Box<dyn TickScheduler>,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let composite = Pixmap::new(surface.width(), surface.height())?;
        let disp = DispField::new(surface.width(), surface.height())?;
        let mut driver = Self {
            opts,
            time: 0.0,
            running: false,
            generator: NoiseField::new(source),
            tracker: RippleTracker::new(),
            warp,
            surface,
            clock,
            scheduler,
            rng: Xorshift64::new(seed),
            base_w: 1,
            base_h: 1,
            noise_h: 1,
            points: Vec::new(),
            composite,
            disp,
        };
        driver.rebuild_buffers();
        Ok(driver)
    }

    /// Working-buffer size and point set, derived from the surface size
    /// and the sizing-relevant options. The noise buffer carries
    /// `floor(displacement_amount * resolution_factor)` extra bottom
    /// rows when displacement is on, so upward-shifted stipple dots
    /// sample real data instead of edge clamp.
    fn rebuild_buffers(&mut self) {
        let factor = self.opts.resolution_factor;
        self.base_w = scaled_extent(self.surface.width(), factor);
        self.base_h = scaled_extent(self.surface.height(), factor);

        let margin = if self.opts.displacement_enabled {
            let m = (self.opts.displacement_amount * factor).floor();
            if m.is_finite() && m > 0.0 {
                m as usize
            } else {
                0
            }
        } else {
            0
        };
        self.noise_h = self.base_h + margin;

        self.points = generate_poisson_points(
            self.base_w as f64,
            self.noise_h as f64,
            self.opts.min_distance,
            DEFAULT_CANDIDATES,
            &mut self.rng,
        );
        log::debug!(
            "working buffers {}x{} (+{} margin rows), {} stipple points",
            self.base_w,
            self.base_h,
            margin,
            self.points.len()
        );
    }

    /// Starts the frame loop: re-entrant no-op while running, otherwise
    /// renders a frame immediately and schedules the next.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.tick();
    }

    /// Stops the frame loop and revokes the pending tick, so no frame
    /// runs after this returns. No-op while stopped. Time and ripples
    /// are left as-is; `start()` resumes.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.scheduler.cancel();
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Queues a ripple at visible-surface coordinates. Cheap; safe to
    /// call at pointer-event rate. The ripple joins the next frame.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.tracker.spawn(x, y, self.clock.now());
    }

    /// Merges an options patch. When the patch touches a sizing field
    /// the working buffers and point set are rebuilt synchronously, so
    /// the next tick renders with the new geometry.
    pub fn update_options(&mut self, patch: &OptionsPatch) -> Invalidation {
        let invalidation = self.opts.apply(patch);
        if invalidation.rebuild_buffers {
            self.rebuild_buffers();
        }
        invalidation
    }

    /// Renders one frame. While running, the next tick is requested
    /// before any frame work so a slow frame cannot stall the loop.
    ///
    /// Per-frame errors never escape: a failed warp pass logs and falls
    /// back to the unwarped field for this frame only.
    pub fn tick(&mut self) {
        if self.running {
            self.scheduler.schedule();
        }
        if self.opts.animation_enabled {
            self.time += self.opts.speed;
        }

        let field = match self.generator.generate(
            self.time,
            &self.opts,
            self.base_w,
            self.noise_h,
            self.base_h,
        ) {
            Ok(field) => field,
            Err(e) => {
                log::warn!("skipping frame, field generation failed: {e}");
                return;
            }
        };

        let mut frame = field;
        let mut crop_h = self.base_h;
        if self.opts.ripple_enabled {
            if let Some(warp) = self.warp.as_mut() {
                self.tracker
                    .rasterize(&mut self.disp, self.clock.now(), self.opts.ripple_amount);
                match warp.warp(&frame, &self.disp, self.opts.ripple_amount) {
                    Ok(warped) => {
                        crop_h = warped.height();
                        frame = warped;
                    }
                    Err(e) => {
                        log::warn!("warp pass failed, rendering unwarped frame: {e}");
                    }
                }
            }
        }
        self.composite.blit_scaled(&frame, crop_h);

        if self.opts.stipple_enabled {
            draw_stipple(
                &mut self.composite,
                &frame,
                &self.points,
                &self.opts,
                self.base_w,
                self.base_h,
            );
        }

        self.surface.present(&self.composite);
    }

    pub fn options(&self) -> &NoiseOptions {
        &self.opts
    }

    /// Current noise time.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Working-buffer dimensions (unpadded).
    pub fn working_size(&self) -> (usize, usize) {
        (self.base_w, self.base_h)
    }

    /// Noise-buffer height including displacement margin rows.
    pub fn noise_height(&self) -> usize {
        self.noise_h
    }

    /// The cached Poisson stipple points, in working-buffer coordinates.
    pub fn stipple_points(&self) -> &[DVec2] {
        &self.points
    }
}

/// `max(1, floor(extent * factor))`, with non-finite or non-positive
/// factors collapsing to the 1-pixel minimum.
fn scaled_extent(extent: usize, factor: f64) -> usize {
    let scaled = (extent as f64 * factor).floor();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled as usize
    } else {
        1
    }
}
