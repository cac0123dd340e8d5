//! Drawing contract between the simulation and whatever owns the pixels.
//!
//! All coordinates passed to a [`DrawSurface`] are logical pixels. The
//! surface is responsible for mapping them onto its physical buffer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color, each channel 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color from 8-bit RGB channels with full opacity.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Same color with a different alpha (clamped to 0-1).
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Convert to 8-bit RGBA, rounding each channel.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// A drawing target the integrator renders into.
///
/// The simulation only ever issues the calls below, once per frame, so a
/// test double can count or record them.
pub trait DrawSurface {
    /// Resize the backing buffer for a logical viewport at the given
    /// device pixel ratio. Must be called once before drawing and again
    /// after every viewport change.
    fn configure(&mut self, width: f32, height: f32, device_pixel_ratio: f32);

    /// Size of the drawable area in logical pixels.
    fn logical_size(&self) -> Vec2;

    /// Overwrite every pixel with `color`.
    fn clear(&mut self, color: Rgba);

    /// Blend a filled circle over the existing contents.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Blend a filled axis-aligned rectangle over the existing contents.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);
}
