#![deny(unsafe_code)]
//! Animated two-octave noise engine with stipple and ripple effects.
//!
//! A frame is a pure function of (time, configuration) plus the live
//! ripple set: the generator produces a working-resolution luminance
//! field, pointer ripples rasterize into a displacement buffer that a
//! warp backend applies to the field, and the stipple compositor draws
//! a Poisson-distributed dot layer on top. [`NoiseAnimation`] sequences
//! the stages and presents the composite to a caller-supplied surface.

pub mod driver;
pub mod generator;
pub mod poisson;
pub mod ripples;
pub mod stipple;
pub mod surface;

#[cfg(feature = "png")]
pub mod snapshot;

pub use driver::{Clock, ManualClock, ManualScheduler, NoiseAnimation, SystemClock, TickScheduler};
pub use generator::NoiseField;
pub use poisson::generate_poisson_points;
pub use ripples::RippleTracker;
pub use stipple::draw_stipple;
pub use surface::{MemorySurface, Surface};
