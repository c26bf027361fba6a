//! Presentation surface seam.
//!
//! The driver renders into its own composite and hands the finished
//! frame to a caller-supplied [`Surface`]. Nothing here knows about
//! windows or GPUs; a surface is just a sized sink for RGBA frames.

use ripplefield_core::Pixmap;

/// A drawable the animation presents frames to.
///
/// The driver sizes its composite to `width()` x `height()` at
/// construction and after invalidating option changes, so `present`
/// receives frames matching the surface dimensions. Any positive size
/// is valid.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Receives the finished frame. Called once per tick.
    fn present(&mut self, frame: &Pixmap);
}

/// In-memory surface that retains the last presented frame.
///
/// Backs the offline CLI renderer and the driver tests.
#[derive(Debug)]
pub struct MemorySurface {
    width: usize,
    height: usize,
    last_frame: Option<Pixmap>,
    presented: usize,
}

impl MemorySurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            last_frame: None,
            presented: 0,
        }
    }

    /// The most recently presented frame, if any tick has run.
    pub fn last_frame(&self) -> Option<&Pixmap> {
        self.last_frame.as_ref()
    }

    /// Total number of frames presented.
    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl Surface for MemorySurface {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn present(&mut self, frame: &Pixmap) {
        self.last_frame = Some(frame.clone());
        self.presented += 1;
    }
}
