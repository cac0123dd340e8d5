//! Particle records and the fixed-size store that holds them.
//!
//! The store is allocated once per mount, sized by the density formula, and
//! never grows or shrinks. Only position and velocity change after creation.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Range `phase_seed` is drawn from.
pub const PHASE_SEED_RANGE: f32 = 1000.0;

/// A single particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Surface-local position in logical pixels.
    pub position: Vec2,
    /// Drift per frame-time unit. Not clamped.
    pub velocity: Vec2,
    /// Fixed phase offset desynchronizing particles on the same field.
    pub phase_seed: f32,
    /// Render radius (circles) or side length (squares), logical pixels.
    pub size: f32,
    /// Fixed multiplier on the field force.
    pub speed_factor: f32,
}

/// Initial placement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// Uniform random over the surface.
    Uniform,

    /// X evenly spaced by index across the width, Y uniform random.
    ///
    /// Gives an even horizontal spread without clumping.
    #[default]
    Banded,
}

/// Population for a viewport: `clamp(floor(w * h / area), min, max)`.
///
/// Degenerate inputs (non-finite or non-positive) yield `min`.
pub fn density_count(width: f32, height: f32, per_particle_area: f32, min: usize, max: usize) -> usize {
    let raw = (width as f64 * height as f64) / per_particle_area as f64;
    let raw = if raw.is_finite() && raw > 0.0 {
        raw.floor() as usize
    } else {
        0
    };
    raw.clamp(min, max.max(min))
}

/// Parameters for [`ParticleStore::create`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub distribution: Distribution,
    pub size_range: (f32, f32),
    pub speed_factor_range: (f32, f32),
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            distribution: Distribution::Banded,
            size_range: (1.0, 2.6),
            speed_factor_range: (0.75, 1.25),
        }
    }
}

/// Fixed-length, contiguous particle storage.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Box<[Particle]>,
}

impl ParticleStore {
    /// Create `count` particles spread over a `width × height` surface.
    ///
    /// Deterministic for a given `seed`. Velocities start at zero.
    pub fn create(count: usize, width: f32, height: f32, params: &SpawnParams, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };

        let particles = (0..count)
            .map(|i| {
                let x = match params.distribution {
                    Distribution::Uniform => rng.gen::<f32>() * width,
                    Distribution::Banded => (i as f32 / count as f32) * width,
                };
                let y = rng.gen::<f32>() * height;

                Particle {
                    position: Vec2::new(x, y),
                    velocity: Vec2::ZERO,
                    phase_seed: rng.gen::<f32>() * PHASE_SEED_RANGE,
                    size: sample_range(&mut rng, params.size_range),
                    speed_factor: sample_range(&mut rng, params.speed_factor_range),
                }
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self { particles }
    }

    /// Number of particles. Fixed for the store's lifetime.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }
}

impl Index<usize> for ParticleStore {
    type Output = Particle;

    fn index(&self, index: usize) -> &Particle {
        &self.particles[index]
    }
}

impl IndexMut<usize> for ParticleStore {
    fn index_mut(&mut self, index: usize) -> &mut Particle {
        &mut self.particles[index]
    }
}

/// Uniform sample from `[lo, hi)`, or `lo` when the range is empty.
fn sample_range(rng: &mut SmallRng, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
