#![deny(unsafe_code)]
//! Core types for the ripplefield noise animation engine.
//!
//! Provides the `LumaField`/`DispField` raster types, the `Pixmap` composite
//! buffer, the typed `NoiseOptions` configuration with partial updates, the
//! `Xorshift64` PRNG, the injected `NoiseSource` coherent-noise capability,
//! and the `WarpBackend` seam with its pure-CPU implementation. The optional
//! `render` feature adds the glow-based GPU warp pass.

pub mod config;
pub mod error;
pub mod field;
pub mod noise_source;
pub mod pixmap;
pub mod prng;
pub mod warp;

#[cfg(feature = "render")]
pub mod render;

pub use config::{Invalidation, NoiseOptions, OptionsPatch};
pub use error::EngineError;
pub use field::{DispField, LumaField};
pub use noise_source::{NoiseSource, PerlinSource};
pub use pixmap::Pixmap;
pub use prng::Xorshift64;
pub use warp::{CpuWarp, WarpBackend};
