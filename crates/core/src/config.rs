//! Typed engine configuration with explicit partial updates.
//!
//! [`NoiseOptions`] enumerates every runtime knob with the historical
//! defaults. [`OptionsPatch`] is the partial-update form (every field
//! optional, camelCase serde names so external option JSON round-trips);
//! merging reports via [`Invalidation`] whether the working buffers and
//! cached Poisson point set must be rebuilt before the next frame.

use serde::{Deserialize, Serialize};

/// Full engine configuration.
///
/// Immutable unless explicitly patched through [`NoiseOptions::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseOptions {
    /// Noise time advance per frame.
    pub speed: f64,
    /// Working-surface size relative to the visible surface.
    pub resolution_factor: f64,
    /// When false, time is frozen but frames keep rendering.
    pub animation_enabled: bool,
    /// Reflect each octave's value as `255 - v`.
    pub invert_noise: bool,
    pub enable_perlin: bool,
    pub perlin_scale: f64,
    pub perlin_brightness: f64,
    pub perlin_contrast: f64,
    pub enable_perlin2: bool,
    pub perlin2_scale: f64,
    pub perlin2_brightness: f64,
    pub perlin2_contrast: f64,
    pub ripple_enabled: bool,
    pub ripple_amount: f64,
    pub stipple_enabled: bool,
    /// Minimum Poisson spacing between stipple dots, in working-buffer pixels.
    pub min_distance: f64,
    pub min_dot_size: f64,
    pub max_dot_size: f64,
    /// Stipple skips a point when its sampled brightness exceeds this.
    /// The historical default of 255 makes the skip branch unreachable;
    /// kept as-is.
    pub brightness_threshold: f64,
    pub displacement_enabled: bool,
    /// Maximum upward dot shift in visible-surface pixels; also sizes the
    /// noise buffer's extra bottom margin.
    pub displacement_amount: f64,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            speed: 0.005,
            resolution_factor: 0.9,
            animation_enabled: true,
            invert_noise: true,
            enable_perlin: true,
            perlin_scale: 0.004,
            perlin_brightness: 0.0,
            perlin_contrast: 3.0,
            enable_perlin2: true,
            perlin2_scale: 0.009,
            perlin2_brightness: 0.0,
            perlin2_contrast: 5.0,
            ripple_enabled: true,
            ripple_amount: 0.2,
            stipple_enabled: true,
            min_distance: 5.0,
            min_dot_size: 0.1,
            max_dot_size: 2.0,
            brightness_threshold: 255.0,
            displacement_enabled: true,
            displacement_amount: 10.0,
        }
    }
}

/// What a configuration patch invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invalidation {
    /// Working-buffer dimensions and the Poisson point set must be rebuilt
    /// before the next frame renders.
    pub rebuild_buffers: bool,
}

/// Partial configuration update: only present fields are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct OptionsPatch {
    pub speed: Option<f64>,
    pub resolution_factor: Option<f64>,
    pub animation_enabled: Option<bool>,
    pub invert_noise: Option<bool>,
    pub enable_perlin: Option<bool>,
    pub perlin_scale: Option<f64>,
    pub perlin_brightness: Option<f64>,
    pub perlin_contrast: Option<f64>,
    pub enable_perlin2: Option<bool>,
    pub perlin2_scale: Option<f64>,
    pub perlin2_brightness: Option<f64>,
    pub perlin2_contrast: Option<f64>,
    pub ripple_enabled: Option<bool>,
    pub ripple_amount: Option<f64>,
    pub stipple_enabled: Option<bool>,
    pub min_distance: Option<f64>,
    pub min_dot_size: Option<f64>,
    pub max_dot_size: Option<f64>,
    pub brightness_threshold: Option<f64>,
    pub displacement_enabled: Option<bool>,
    pub displacement_amount: Option<f64>,
}

impl NoiseOptions {
    /// Merges every present patch field into the configuration.
    ///
    /// Returns which cached state the patch invalidated: setting
    /// `resolutionFactor`, `displacementEnabled`, `displacementAmount`, or
    /// `minDistance` requires rebuilding the working buffers and point set
    /// before the next frame. Presence is what matters: patching a field
    /// to its current value still invalidates, and an empty patch never
    /// does.
    pub fn apply(&mut self, patch: &OptionsPatch) -> Invalidation {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = patch.$field {
                    self.$field = v;
                })*
            };
        }
        merge!(
            speed,
            resolution_factor,
            animation_enabled,
            invert_noise,
            enable_perlin,
            perlin_scale,
            perlin_brightness,
            perlin_contrast,
            enable_perlin2,
            perlin2_scale,
            perlin2_brightness,
            perlin2_contrast,
            ripple_enabled,
            ripple_amount,
            stipple_enabled,
            min_distance,
            min_dot_size,
            max_dot_size,
            brightness_threshold,
            displacement_enabled,
            displacement_amount,
        );

        Invalidation {
            rebuild_buffers: patch.resolution_factor.is_some()
                || patch.displacement_enabled.is_some()
                || patch.displacement_amount.is_some()
                || patch.min_distance.is_some(),
        }
    }
}
