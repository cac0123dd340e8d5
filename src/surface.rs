//! Software simulation surface.
//!
//! [`PixelSurface`] owns an RGBA8 buffer sized to the physical pixel
//! dimensions of the viewport and scales every drawing call by the device
//! pixel ratio, so callers work purely in logical pixels.
//!
//! # Example
//!
//! ```
//! use particle_field::{DrawSurface, PixelSurface, Rgba};
//! use glam::Vec2;
//!
//! let mut surface = PixelSurface::new();
//! surface.configure(320.0, 200.0, 2.0);
//! assert_eq!(surface.physical_size(), (640, 400));
//!
//! surface.clear(Rgba::BLACK);
//! surface.fill_circle(Vec2::new(10.0, 10.0), 2.0, Rgba::from_rgb8(15, 164, 175));
//! ```

use crate::canvas::{DrawSurface, Rgba};
use glam::Vec2;

/// Largest device pixel ratio the surface will honour by default.
pub const DEFAULT_MAX_DPR: f32 = 2.0;

/// Clamp a reported device pixel ratio to `(0, max]`.
///
/// Non-finite or non-positive ratios fall back to `1.0`.
pub fn clamp_device_pixel_ratio(dpr: f32, max: f32) -> f32 {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    dpr.min(max.max(1.0))
}

/// CPU-side RGBA8 drawing surface.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    logical: Vec2,
    scale: f32,
    max_dpr: f32,
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelSurface {
    /// Create an unconfigured (zero-sized) surface.
    pub fn new() -> Self {
        Self::with_max_dpr(DEFAULT_MAX_DPR)
    }

    /// Create an unconfigured surface with a custom device pixel ratio cap.
    pub fn with_max_dpr(max_dpr: f32) -> Self {
        Self {
            logical: Vec2::ZERO,
            scale: 1.0,
            max_dpr,
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    /// Physical buffer size in pixels.
    #[inline]
    pub fn physical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Scale factor currently applied to drawing calls.
    #[inline]
    pub fn device_pixel_ratio(&self) -> f32 {
        self.scale
    }

    /// Row-major pixel data, top row first.
    #[inline]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixel data as raw bytes, suitable for texture upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Read a single physical pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    #[inline]
    fn blend_at(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let idx = (y * self.width + x) as usize;
        blend_over(&mut self.pixels[idx], color, coverage);
    }
}

impl Default for PixelSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSurface for PixelSurface {
    fn configure(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.logical = Vec2::new(sanitize(width), sanitize(height));
        self.scale = clamp_device_pixel_ratio(device_pixel_ratio, self.max_dpr);
        self.width = (self.logical.x * self.scale).floor() as u32;
        self.height = (self.logical.y * self.scale).floor() as u32;

        // Resizing discards contents, like a canvas does.
        self.pixels.clear();
        self.pixels
            .resize(self.width as usize * self.height as usize, Rgba::TRANSPARENT.to_rgba8());
    }

    fn logical_size(&self) -> Vec2 {
        self.logical
    }

    fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color.to_rgba8());
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let c = center * self.scale;
        let r = radius * self.scale;
        if !(r > 0.0) || !c.is_finite() || color.a <= 0.0 {
            return;
        }

        let x0 = (c.x - r - 1.0).floor().max(0.0) as u32;
        let y0 = (c.y - r - 1.0).floor().max(0.0) as u32;
        let x1 = ((c.x + r + 1.0).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((c.y + r + 1.0).ceil().max(0.0) as u32).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(c);
                // Linear edge ramp one pixel wide.
                let coverage = (r + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_at(x, y, color, coverage);
                }
            }
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let min = origin * self.scale;
        let max = (origin + size) * self.scale;
        if !min.is_finite() || !max.is_finite() || color.a <= 0.0 {
            return;
        }

        let (x0, x1) = pixel_span(min.x, max.x, self.width);
        let (y0, y1) = pixel_span(min.y, max.y, self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_at(x, y, color, 1.0);
            }
        }
    }
}

/// Pixel columns (or rows) covered by `[lo, hi)`, edges rounded. A span
/// thinner than one pixel still covers the pixel holding its centre.
fn pixel_span(lo: f32, hi: f32, limit: u32) -> (u32, u32) {
    let (mut start, mut end) = (lo.round(), hi.round());
    if end <= start && hi > lo {
        start = ((lo + hi) * 0.5).floor();
        end = start + 1.0;
    }
    let clip = |v: f32| (v.max(0.0) as u32).min(limit);
    (clip(start), clip(end))
}

/// Source-over blend of a straight-alpha color into an RGBA8 pixel.
fn blend_over(dst: &mut [u8; 4], color: Rgba, coverage: f32) {
    let sa = (color.a * coverage).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = [0; 4];
        return;
    }

    let mix = |src: f32, dst: u8| {
        let d = dst as f32 / 255.0;
        let v = (src * sa + d * da * (1.0 - sa)) / out_a;
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    *dst = [
        mix(color.r, dst[0]),
        mix(color.g, dst[1]),
        mix(color.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ];
}
