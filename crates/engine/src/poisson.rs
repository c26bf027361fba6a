//! Poisson-disk stipple point sampling (Bridson dart throwing).
//!
//! Runs only when an invalidating option change resizes the working
//! buffers, never per frame: the point set is cached by the driver and
//! reused until `minDistance` or the buffer dimensions change.

use glam::DVec2;
use ripplefield_core::Xorshift64;

/// Candidate attempts per active point before it retires.
pub const DEFAULT_CANDIDATES: usize = 30;

struct CellGrid {
    cell_size: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Option<DVec2>>,
}

impl CellGrid {
    fn new(width: f64, height: f64, min_dist: f64) -> Self {
        // Cell diagonal = min_dist, so a cell holds at most one point.
        let cell_size = min_dist / std::f64::consts::SQRT_2;
        let cols = (width / cell_size).ceil() as usize;
        let rows = (height / cell_size).ceil() as usize;
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    fn cell_of(&self, p: DVec2) -> (usize, usize) {
        let cx = ((p.x / self.cell_size) as usize).min(self.cols - 1);
        let cy = ((p.y / self.cell_size) as usize).min(self.rows - 1);
        (cx, cy)
    }

    fn insert(&mut self, p: DVec2) {
        let (cx, cy) = self.cell_of(p);
        self.cells[cy * self.cols + cx] = Some(p);
    }

    /// True if no occupant of the 5x5 cell neighborhood lies closer than
    /// `min_dist` to `p`.
    fn is_clear(&self, p: DVec2, min_dist: f64) -> bool {
        let (cx, cy) = self.cell_of(p);
        let x0 = cx.saturating_sub(2);
        let x1 = (cx + 2).min(self.cols - 1);
        let y0 = cy.saturating_sub(2);
        let y1 = (cy + 2).min(self.rows - 1);
        let d2 = min_dist * min_dist;
        for iy in y0..=y1 {
            for ix in x0..=x1 {
                if let Some(q) = self.cells[iy * self.cols + ix] {
                    if p.distance_squared(q) < d2 {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Generates a maximal Poisson-disk point set over `[0, width) x [0, height)`.
///
/// Bridson's algorithm: a uniform seed point starts the active list; each
/// round picks a random active point and throws up to `k` candidates at
/// distance `[min_dist, 2 * min_dist)` and uniform angle. A candidate is
/// accepted if it is in bounds and no existing point within the 5x5
/// neighboring grid cells is closer than `min_dist`; after `k` straight
/// rejections the active point retires. Points are returned in insertion
/// order.
///
/// Degenerate inputs (non-positive `min_dist`, non-finite inputs, or an
/// empty rectangle) yield an empty set.
pub fn generate_poisson_points(
    width: f64,
    height: f64,
    min_dist: f64,
    k: usize,
    rng: &mut Xorshift64,
) -> Vec<DVec2> {
    if !(width > 0.0 && height > 0.0 && min_dist > 0.0)
        || !(width.is_finite() && height.is_finite() && min_dist.is_finite())
    {
        return Vec::new();
    }

    let mut grid = CellGrid::new(width, height, min_dist);
    let mut points = Vec::new();
    let mut active: Vec<DVec2> = Vec::new();

    let seed = DVec2::new(rng.next_f64() * width, rng.next_f64() * height);
    points.push(seed);
    active.push(seed);
    grid.insert(seed);

    while !active.is_empty() {
        let slot = rng.next_usize(active.len());
        let base = active[slot];
        let mut found = false;

        for _ in 0..k {
            let angle = rng.next_angle();
            let mag = rng.next_range(min_dist, 2.0 * min_dist);
            let candidate = base + DVec2::from_angle(angle) * mag;

            if candidate.x < 0.0
                || candidate.x >= width
                || candidate.y < 0.0
                || candidate.y >= height
            {
                continue;
            }
            if grid.is_clear(candidate, min_dist) {
                points.push(candidate);
                active.push(candidate);
                grid.insert(candidate);
                found = true;
                break;
            }
        }

        if !found {
            active.swap_remove(slot);
        }
    }

    points
}
