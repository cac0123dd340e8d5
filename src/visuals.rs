//! Visual configuration for particle rendering.
//!
//! Controls how the integrator draws each frame: background, particle shape
//! and color, the per-particle alpha pulse, and the hairline along the top
//! edge of the field.
//!
//! ```
//! use particle_field::{ParticleShape, Rgba, VisualConfig};
//!
//! let mut visuals = VisualConfig::new();
//! visuals
//!     .shape(ParticleShape::Square)
//!     .background(Rgba::from_rgb8(4, 6, 12))
//!     .hairline(None);
//! ```

use crate::canvas::Rgba;
use serde::{Deserialize, Serialize};

/// Particle shape for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleShape {
    /// Anti-aliased filled circle of radius `size` (default).
    #[default]
    Circle,

    /// Filled square with side `size`, centered on the particle.
    Square,
}

/// Configuration for particle visuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Particle shape.
    pub shape: ParticleShape,
    /// Particle color. Its alpha is replaced by the pulse each frame.
    pub particle_color: Rgba,
    /// Opaque color painted over the whole surface before particles.
    pub background: Rgba,
    /// Mean particle alpha.
    pub alpha_base: f32,
    /// Amplitude of the alpha pulse around `alpha_base`.
    pub alpha_amplitude: f32,
    /// Angular frequency of the alpha pulse, in field-time units.
    pub alpha_frequency: f32,
    /// Alpha of the 1px line along the top edge (`None` = no line).
    pub hairline_alpha: Option<f32>,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            shape: ParticleShape::Circle,
            particle_color: Rgba::from_rgb8(15, 164, 175),
            background: Rgba::new(0.02, 0.02, 0.05, 1.0), // Dark blue-black
            alpha_base: 0.22,
            alpha_amplitude: 0.18,
            alpha_frequency: 3.0,
            hairline_alpha: Some(0.12),
        }
    }
}

impl VisualConfig {
    /// Create a new visual config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the particle shape.
    pub fn shape(&mut self, shape: ParticleShape) -> &mut Self {
        self.shape = shape;
        self
    }

    /// Set the particle color (alpha is ignored).
    pub fn particle_color(&mut self, color: Rgba) -> &mut Self {
        self.particle_color = color;
        self
    }

    /// Set the background color. It is always drawn fully opaque.
    pub fn background(&mut self, color: Rgba) -> &mut Self {
        self.background = color.with_alpha(1.0);
        self
    }

    /// Set the alpha pulse: `base + amplitude * sin(frequency * t + seed)`.
    pub fn alpha_pulse(&mut self, base: f32, amplitude: f32, frequency: f32) -> &mut Self {
        self.alpha_base = base;
        self.alpha_amplitude = amplitude;
        self.alpha_frequency = frequency;
        self
    }

    /// Set or disable the top hairline.
    pub fn hairline(&mut self, alpha: Option<f32>) -> &mut Self {
        self.hairline_alpha = alpha;
        self
    }

    /// Alpha of a particle with `phase_seed` at field time `time`.
    #[inline]
    pub fn particle_alpha(&self, time: f32, phase_seed: f32) -> f32 {
        let a = self.alpha_base + self.alpha_amplitude * (time * self.alpha_frequency + phase_seed).sin();
        if a.is_finite() {
            a.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_stays_in_pulse_range() {
        let v = VisualConfig::default();
        for i in 0..200 {
            let a = v.particle_alpha(i as f32 * 0.37, i as f32 * 13.0);
            assert!(a >= 0.22 - 0.18 - 1e-6 && a <= 0.22 + 0.18 + 1e-6);
        }
    }

    #[test]
    fn test_alpha_non_finite_is_invisible() {
        let v = VisualConfig::default();
        assert_eq!(v.particle_alpha(f32::NAN, 0.0), 0.0);
    }

    #[test]
    fn test_background_forced_opaque() {
        let mut v = VisualConfig::new();
        v.background(Rgba::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(v.background.a, 1.0);
    }
}
