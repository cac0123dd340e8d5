//! Tunable constants for the particle field.
//!
//! Every number the simulation uses lives here with a default matching the
//! landing page look. Configs can be built in code or loaded from JSON; any
//! field left out of the JSON keeps its default.
//!
//! ```
//! use particle_field::{Distribution, FieldConfig, ParticleShape};
//!
//! let config = FieldConfig::new()
//!     .with_density(520.0, 800, 2200)
//!     .with_distribution(Distribution::Uniform)
//!     .with_friction(0.97)
//!     .with_visuals(|v| {
//!         v.shape(ParticleShape::Square);
//!     });
//! assert!(config.validate().is_ok());
//! ```

use crate::error::ConfigError;
use crate::field::FieldShape;
use crate::particle::{density_count, Distribution};
use crate::visuals::VisualConfig;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Viewport area (logical px²) per particle.
    pub per_particle_area: f32,
    /// Lower bound on population.
    pub min_count: usize,
    /// Upper bound on population.
    pub max_count: usize,
    /// Initial placement of particles.
    pub distribution: Distribution,
    /// Range particle sizes are drawn from (logical px).
    pub size_range: (f32, f32),
    /// Range per-particle field responsiveness is drawn from.
    pub speed_factor_range: (f32, f32),

    /// Shape of the driving force field.
    pub field_shape: FieldShape,
    /// Field time units per millisecond of wall time.
    pub time_frequency: f32,
    /// Swirl phase per logical pixel of page scroll.
    pub scroll_swirl: f32,

    /// Per-frame velocity damping, just below 1.0.
    pub friction: f32,
    /// Position units per (velocity unit × millisecond).
    pub time_scale: f32,
    /// Largest frame delta ever integrated, in milliseconds.
    pub frame_cap_ms: f32,
    /// Distance past each edge a particle may travel before wrapping.
    pub wrap_margin: Vec2,

    /// Pointer repulsion radius (logical px).
    pub pointer_radius: f32,
    /// Pointer repulsion strength at zero distance.
    pub pointer_strength: f32,
    /// Force multiplier while boost is active.
    pub boost_multiplier: f32,

    /// Viewports narrower than this (logical px) never start the field.
    pub small_screen_breakpoint: f32,
    /// Device pixel ratio cap for the drawing surface.
    pub max_dpr: f32,
    /// RNG seed for particle creation (`None` = seeded from the clock).
    pub seed: Option<u64>,

    /// How particles are drawn.
    pub visuals: VisualConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            per_particle_area: 520.0,
            min_count: 800,
            max_count: 2200,
            distribution: Distribution::Banded,
            size_range: (1.0, 2.6),
            speed_factor_range: (0.75, 1.25),
            field_shape: FieldShape::StandingWave,
            time_frequency: 0.00028,
            scroll_swirl: 0.00006,
            friction: 0.985,
            time_scale: 0.06,
            frame_cap_ms: 40.0,
            wrap_margin: Vec2::new(10.0, 20.0),
            pointer_radius: 140.0,
            pointer_strength: 0.36,
            boost_multiplier: 1.8,
            small_screen_breakpoint: 768.0,
            max_dpr: 2.0,
            seed: None,
            visuals: VisualConfig::default(),
        }
    }
}

impl FieldConfig {
    /// Create a config with the default landing page tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parse a config from JSON text and validate it.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the density formula parameters.
    pub fn with_density(mut self, per_particle_area: f32, min_count: usize, max_count: usize) -> Self {
        self.per_particle_area = per_particle_area;
        self.min_count = min_count;
        self.max_count = max_count;
        self
    }

    /// Set the initial particle placement.
    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the driving force field.
    pub fn with_field_shape(mut self, shape: FieldShape) -> Self {
        self.field_shape = shape;
        self
    }

    /// Set the per-frame velocity damping factor.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set the position integration scale.
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Set the largest frame delta, in milliseconds.
    pub fn with_frame_cap(mut self, frame_cap_ms: f32) -> Self {
        self.frame_cap_ms = frame_cap_ms;
        self
    }

    /// Set the wrap margin past each edge.
    pub fn with_wrap_margin(mut self, margin: Vec2) -> Self {
        self.wrap_margin = margin;
        self
    }

    /// Set pointer repulsion radius and strength.
    pub fn with_pointer(mut self, radius: f32, strength: f32) -> Self {
        self.pointer_radius = radius;
        self.pointer_strength = strength;
        self
    }

    /// Set the force multiplier applied while boost is active.
    pub fn with_boost_multiplier(mut self, multiplier: f32) -> Self {
        self.boost_multiplier = multiplier;
        self
    }

    /// Set the small-screen breakpoint below which the field stays idle.
    pub fn with_small_screen_breakpoint(mut self, width: f32) -> Self {
        self.small_screen_breakpoint = width;
        self
    }

    /// Use a fixed RNG seed so particle creation is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configure visuals.
    pub fn with_visuals<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut VisualConfig),
    {
        configure(&mut self.visuals);
        self
    }

    /// Population for a viewport of the given logical size.
    pub fn particle_count(&self, width: f32, height: f32) -> usize {
        density_count(width, height, self.per_particle_area, self.min_count, self.max_count)
    }

    /// Force multiplier for the given boost flag.
    #[inline]
    pub fn force_multiplier(&self, boost: bool) -> f32 {
        if boost {
            self.boost_multiplier
        } else {
            1.0
        }
    }

    /// Check every value is in its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, msg: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid(msg.to_string()))
            }
        }

        let positive = |v: f32| v.is_finite() && v > 0.0;
        let range_ok = |(lo, hi): (f32, f32)| lo.is_finite() && hi.is_finite() && lo <= hi;

        check(positive(self.per_particle_area), "per_particle_area must be positive")?;
        check(self.max_count > 0, "max_count must be at least 1")?;
        check(self.min_count <= self.max_count, "min_count must not exceed max_count")?;
        check(range_ok(self.size_range) && self.size_range.0 > 0.0, "size_range must be a positive range")?;
        check(range_ok(self.speed_factor_range), "speed_factor_range must be a valid range")?;
        check(self.time_frequency.is_finite(), "time_frequency must be finite")?;
        check(self.scroll_swirl.is_finite(), "scroll_swirl must be finite")?;
        check(positive(self.friction) && self.friction <= 1.0, "friction must be in (0, 1]")?;
        check(positive(self.time_scale), "time_scale must be positive")?;
        check(positive(self.frame_cap_ms), "frame_cap_ms must be positive")?;
        check(
            self.wrap_margin.is_finite() && self.wrap_margin.min_element() >= 0.0,
            "wrap_margin must be non-negative",
        )?;
        check(self.pointer_radius.is_finite() && self.pointer_radius >= 0.0, "pointer_radius must be non-negative")?;
        check(self.pointer_strength.is_finite(), "pointer_strength must be finite")?;
        check(positive(self.boost_multiplier), "boost_multiplier must be positive")?;
        check(self.small_screen_breakpoint.is_finite(), "small_screen_breakpoint must be finite")?;
        check(self.max_dpr.is_finite() && self.max_dpr >= 1.0, "max_dpr must be at least 1")?;
        self.field_shape.validate()?;
        Ok(())
    }
}
