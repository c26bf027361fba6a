//! Injected coherent-noise capability.
//!
//! The noise field generator does not own a noise algorithm; it receives a
//! [`NoiseSource`] at construction. [`PerlinSource`] is the production
//! implementation; tests substitute deterministic stubs.

use noise::{NoiseFn, Perlin};

/// A smooth pseudo-random function of continuous 2D coordinates.
///
/// `sample` returns values in [-1, 1]. Implementations must be
/// deterministic: same coordinates, same value.
pub trait NoiseSource: Send + Sync {
    /// Sample the noise at (x, y).
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Perlin coherent noise seeded once at construction.
pub struct PerlinSource {
    noise: Perlin,
}

impl PerlinSource {
    /// Creates a Perlin source with the given seed.
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
        }
    }
}

impl NoiseSource for PerlinSource {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x, y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perlin_source_is_deterministic() {
        let a = PerlinSource::new(42);
        let b = PerlinSource::new(42);
        for i in 0..100 {
            let x = i as f64 * 0.13;
            let y = i as f64 * 0.07;
            assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
        }
    }

    #[test]
    fn perlin_source_stays_in_unit_band() {
        let src = PerlinSource::new(7);
        for i in 0..1000 {
            let v = src.sample(i as f64 * 0.017, i as f64 * 0.029);
            assert!((-1.0..=1.0).contains(&v), "out of band at {i}: {v}");
        }
    }

    #[test]
    fn different_seeds_differ_somewhere() {
        let a = PerlinSource::new(1);
        let b = PerlinSource::new(2);
        let diverges = (0..100).any(|i| {
            let x = 0.3 + i as f64 * 0.11;
            a.sample(x, x * 0.7) != b.sample(x, x * 0.7)
        });
        assert!(diverges);
    }

    #[test]
    fn noise_source_is_object_safe() {
        let src: Box<dyn NoiseSource> = Box::new(PerlinSource::new(42));
        let v = src.sample(1.3, 2.7);
        assert!(v.is_finite());
    }
}
