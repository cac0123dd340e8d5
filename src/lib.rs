//! # Particle Field
//!
//! A frame-rate-independent 2-D particle field: a few thousand small
//! particles drift along a standing-wave (or flow) field, shy away from the
//! pointer, and wrap around the edges of the viewport.
//!
//! The simulation is pure CPU code behind two seams:
//!
//! - [`DrawSurface`]: where frames are drawn. [`PixelSurface`] is a software
//!   rasterizer with device-pixel-ratio scaling.
//! - [`FrameHost`]: who schedules frames and routes pointer/resize events.
//!   [`ManualHost`] drives the field by hand; the `window` module runs it in
//!   a winit window and presents frames through wgpu.
//!
//! ## Quick Start
//!
//! ```
//! use particle_field::prelude::*;
//!
//! let config = FieldConfig::new()
//!     .with_seed(7)
//!     .with_visuals(|v| {
//!         v.shape(ParticleShape::Circle).alpha_pulse(0.25, 0.15, 3.0);
//!     });
//!
//! let mut host = ManualHost::new();
//! let mut field = ParticleField::new(config);
//! field.mount(Some(PixelSurface::new()), &Environment::new(1280.0, 720.0, 2.0), &mut host, 0.0);
//!
//! field.handle_pointer_move(Vec2::new(640.0, 360.0));
//! field.set_boost(true);
//! host.run_frames(&mut field, 0.0, 16.0, 60);
//!
//! assert_eq!(field.particles().map(|p| p.len()), Some(1772));
//! field.dispose(&mut host);
//! ```
//!
//! ## Frame
//!
//! Every frame, for each particle:
//!
//! 1. `force = (field(position, t) * speed_factor + pointer_push) * multiplier`
//! 2. `velocity = (velocity + force) * friction`
//! 3. `position += velocity * dt * time_scale`, with `dt` capped at 40 ms
//! 4. wrap toroidally past a small margin, then draw with a pulsing alpha
//!
//! | Concern | Type |
//! |---------|------|
//! | Population | [`ParticleStore`], [`FieldConfig::particle_count`] |
//! | Forces | [`ForceField`], [`FieldShape`] |
//! | Integration | [`Integrator`], [`wrap_toroidal`] |
//! | Drawing | [`render`], [`VisualConfig`] |
//! | Lifecycle | [`ParticleField`], [`FieldState`] |

pub mod canvas;
pub mod config;
pub mod error;
pub mod field;
mod gpu;
pub mod input;
pub mod integrate;
pub mod lifecycle;
pub mod particle;
pub mod snapshot;
pub mod surface;
pub mod time;
pub mod visuals;
pub mod window;

pub use canvas::{DrawSurface, Rgba};
pub use config::FieldConfig;
pub use error::{ConfigError, FieldError, GpuError};
pub use field::{pointer_repulsion, FieldFrame, FieldShape, ForceField};
pub use glam::Vec2;
pub use input::{Input, InputEvent, PageState, PointerState};
pub use integrate::{render, run_frame, wrap_toroidal, Integrator};
pub use lifecycle::{
    Environment, FieldState, FrameHandle, FrameHost, GateReason, Listener, ManualHost, ParticleField, Viewport,
};
pub use particle::{Distribution, Particle, ParticleStore, SpawnParams};
pub use snapshot::{render_snapshot, save_png, Snapshot, SnapshotOptions};
pub use surface::{clamp_device_pixel_ratio, PixelSurface};
pub use visuals::{ParticleShape, VisualConfig};

/// Convenient re-exports for common usage.
///
/// ```
/// use particle_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{DrawSurface, Rgba};
    pub use crate::config::FieldConfig;
    pub use crate::field::{FieldShape, ForceField};
    pub use crate::lifecycle::{Environment, FieldState, FrameHost, ManualHost, ParticleField, Viewport};
    pub use crate::particle::{Distribution, ParticleStore};
    pub use crate::surface::PixelSurface;
    pub use crate::time::FrameClock;
    pub use crate::visuals::{ParticleShape, VisualConfig};
    pub use crate::Vec2;
}
