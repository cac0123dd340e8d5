//! Force field evaluation.
//!
//! Each frame every particle asks the field for an additive force. The force
//! is a pure function of the particle, the shared [`FieldFrame`], and the
//! pointer sample: there is no hidden state, so repeated evaluation with the
//! same inputs gives the same answer.
//!
//! # Field Shapes
//!
//! - **Standing wave**: particles are pulled vertically toward a rippling
//!   target line through the middle of the surface, with a slow horizontal
//!   drift and a scroll-driven swirl.
//! - **Flow field**: a direction angle is computed from trigonometric terms
//!   over normalized position and time, and the force is a fixed-length step
//!   along that direction.
//!
//! Pointer repulsion and the boost multiplier apply to both shapes.

use crate::config::FieldConfig;
use crate::error::ConfigError;
use crate::input::PointerState;
use crate::particle::Particle;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

// Standing wave tuning.
const WAVE_SPATIAL: f32 = 0.004;
const WAVE_X_RATE: f32 = 6.0;
const WAVE_Y_RATE: f32 = 5.0;
const WAVE_X_AMPLITUDE: f32 = 0.65;
const WAVE_Y_AMPLITUDE: f32 = 0.45;
const ENVELOPE_BASE: f32 = 24.0;
const ENVELOPE_SWING: f32 = 16.0;
const SWIRL_OFFSET: f32 = 18.0;
const TARGET_PULL: f32 = 0.00055;
const DRIFT: f32 = 0.012;
const SWIRL_DRIFT: f32 = 0.008;

/// Shape of the driving force field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    /// Pull toward a rippling horizontal target line (default).
    #[default]
    StandingWave,

    /// Follow a time-varying direction field.
    FlowField {
        /// Force magnitude per frame.
        gain: f32,
        /// Spatial frequency over normalized coordinates.
        scale: f32,
    },
}

impl FieldShape {
    /// A flow field with the landing page tuning.
    pub fn flow() -> Self {
        FieldShape::FlowField { gain: 0.02, scale: 3.0 }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            FieldShape::StandingWave => Ok(()),
            FieldShape::FlowField { gain, scale } => {
                if gain.is_finite() && scale.is_finite() {
                    Ok(())
                } else {
                    Err(ConfigError::Invalid("flow field gain and scale must be finite".into()))
                }
            }
        }
    }

    /// Unscaled field force for a particle at `position` with `seed`.
    pub fn force(&self, position: Vec2, seed: f32, frame: &FieldFrame) -> Vec2 {
        let t = frame.time;
        let swirl = frame.swirl;

        match *self {
            FieldShape::StandingWave => {
                let wave = (position.x * WAVE_SPATIAL + t * WAVE_X_RATE + seed).sin() * WAVE_X_AMPLITUDE
                    + (position.y * WAVE_SPATIAL - t * WAVE_Y_RATE + seed).cos() * WAVE_Y_AMPLITUDE;
                let envelope = ENVELOPE_BASE + ENVELOPE_SWING * (t + seed).sin();
                let target_y = frame.size.y * 0.5 + wave * envelope + (swirl + seed).sin() * SWIRL_OFFSET;

                Vec2::new(
                    (t + seed).cos() * DRIFT + (swirl + seed).sin() * SWIRL_DRIFT,
                    (target_y - position.y) * TARGET_PULL,
                )
            }

            FieldShape::FlowField { gain, scale } => {
                let n = position / frame.size.max(Vec2::ONE);
                let angle = (n.x * scale + t).sin() * PI
                    + (n.y * scale - t * 0.8).cos() * PI
                    + ((n.x + n.y) * scale * 0.5 + t * 0.5 + seed * 0.01).sin() * 0.5 * PI
                    + swirl;
                Vec2::from_angle(angle) * gain
            }
        }
    }
}

/// Inputs shared by every particle during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldFrame {
    /// Field time (wall milliseconds × `time_frequency`).
    pub time: f32,
    /// Swirl phase derived from page scroll.
    pub swirl: f32,
    /// Logical surface size.
    pub size: Vec2,
    /// Uniform force multiplier (boost).
    pub multiplier: f32,
}

impl FieldFrame {
    /// Build the frame inputs for a timestamp, scroll offset and boost flag.
    pub fn new(config: &FieldConfig, now_ms: f64, scroll_y: f32, size: Vec2, boost: bool) -> Self {
        Self {
            time: (now_ms * config.time_frequency as f64) as f32,
            swirl: scroll_y * config.scroll_swirl,
            size,
            multiplier: config.force_multiplier(boost),
        }
    }
}

/// Force field evaluator: field shape plus pointer repulsion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceField {
    shape: FieldShape,
    pointer_radius: f32,
    pointer_strength: f32,
}

impl ForceField {
    pub fn new(shape: FieldShape, pointer_radius: f32, pointer_strength: f32) -> Self {
        Self {
            shape,
            pointer_radius,
            pointer_strength,
        }
    }

    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(config.field_shape, config.pointer_radius, config.pointer_strength)
    }

    /// Total force on `particle` this frame. Never returns a non-finite
    /// component.
    pub fn evaluate(&self, particle: &Particle, frame: &FieldFrame, pointer: &PointerState) -> Vec2 {
        let field = self.shape.force(particle.position, particle.phase_seed, frame) * particle.speed_factor;
        let push = pointer_repulsion(
            particle.position,
            particle.phase_seed,
            pointer,
            self.pointer_radius,
            self.pointer_strength,
        );
        finite_or_zero((field + push) * frame.multiplier)
    }
}

/// Repulsion away from an active pointer.
///
/// Linear falloff `(1 - d / radius) * strength` inside the radius, zero
/// outside it or while the pointer is inactive. A particle exactly under the
/// pointer is pushed along the unit vector at angle `phase_seed`.
pub fn pointer_repulsion(
    position: Vec2,
    phase_seed: f32,
    pointer: &PointerState,
    radius: f32,
    strength: f32,
) -> Vec2 {
    if !pointer.active || !(radius > 0.0) {
        return Vec2::ZERO;
    }

    let offset = position - pointer.position;
    let dist2 = offset.length_squared();
    if !(dist2 < radius * radius) {
        return Vec2::ZERO;
    }

    let dist = dist2.sqrt();
    let direction = if dist > 0.0 {
        offset / dist
    } else {
        Vec2::from_angle(phase_seed)
    };
    direction * (1.0 - dist / radius) * strength
}

#[inline]
fn finite_or_zero(v: Vec2) -> Vec2 {
    Vec2::new(
        if v.x.is_finite() { v.x } else { 0.0 },
        if v.y.is_finite() { v.y } else { 0.0 },
    )
}
