//! Headless rendering to PNG.
//!
//! Drives a [`ParticleField`] with a [`ManualHost`] for a fixed number of
//! frames at a fixed step and writes the final surface to disk. Useful for
//! checking a config without opening a window, and as a reproducible
//! artifact when a seed is set.

use std::path::Path;

use glam::Vec2;

use crate::canvas::DrawSurface;
use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::lifecycle::{Environment, FieldState, ManualHost, ParticleField};
use crate::surface::PixelSurface;

/// Parameters for a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOptions {
    /// Logical viewport width.
    pub width: f32,
    /// Logical viewport height.
    pub height: f32,
    pub device_pixel_ratio: f32,
    /// Frames to simulate before capturing.
    pub frames: u32,
    /// Simulated time between frames, in milliseconds.
    pub frame_ms: f64,
    /// Pointer held at this position for the whole run.
    pub pointer: Option<Vec2>,
    pub boost: bool,
    pub reduced_motion: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
            frames: 120,
            frame_ms: 1000.0 / 60.0,
            pointer: None,
            boost: false,
            reduced_motion: false,
        }
    }
}

/// Result of a headless run.
pub struct Snapshot {
    pub surface: PixelSurface,
    /// State the field reached. `Idle` means it was gated off and the
    /// surface holds only the static background.
    pub state: FieldState,
    pub frames_drawn: u32,
}

/// Run the field headlessly and return the final frame.
pub fn render_snapshot(config: &FieldConfig, options: &SnapshotOptions) -> Snapshot {
    let mut host = ManualHost::new();
    let mut field = ParticleField::new(config.clone());
    let env = Environment::new(options.width, options.height, options.device_pixel_ratio)
        .with_reduced_motion(options.reduced_motion);

    field.set_boost(options.boost);
    let state = field.mount(Some(PixelSurface::with_max_dpr(config.max_dpr)), &env, &mut host, 0.0);
    if let Some(position) = options.pointer {
        field.handle_pointer_move(position);
    }

    let frames_drawn = host.run_frames(&mut field, 0.0, options.frame_ms, options.frames);
    field.dispose(&mut host);

    let mut surface = field
        .take_surface()
        .unwrap_or_else(|| PixelSurface::with_max_dpr(config.max_dpr));
    if frames_drawn == 0 {
        // Static empty container.
        surface.configure(options.width, options.height, options.device_pixel_ratio);
        surface.clear(config.visuals.background.with_alpha(1.0));
    }

    log::info!(
        "snapshot: {} frames, field {:?}, {}x{} px",
        frames_drawn,
        state,
        surface.physical_size().0,
        surface.physical_size().1
    );

    Snapshot {
        surface,
        state,
        frames_drawn,
    }
}

/// Encode `surface` as PNG at `path`.
pub fn save_png(surface: &PixelSurface, path: impl AsRef<Path>) -> Result<(), FieldError> {
    let (width, height) = surface.physical_size();
    if width == 0 || height == 0 {
        return Err(FieldError::Usage(format!(
            "cannot write an empty {}x{} snapshot",
            width, height
        )));
    }
    image::save_buffer(
        path.as_ref(),
        surface.as_bytes(),
        width,
        height,
        image::ExtendedColorType::Rgba8,
    )?;
    log::info!("wrote {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SnapshotOptions {
        SnapshotOptions {
            width: 800.0,
            height: 400.0,
            frames: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_snapshot_runs_requested_frames() {
        let config = FieldConfig::new().with_seed(3);
        let snapshot = render_snapshot(&config, &small());
        assert_eq!(snapshot.state, FieldState::Running);
        assert_eq!(snapshot.frames_drawn, 10);
        assert_eq!(snapshot.surface.physical_size(), (800, 400));
    }

    #[test]
    fn test_snapshot_seeded_runs_match() {
        let config = FieldConfig::new().with_seed(99);
        let a = render_snapshot(&config, &small());
        let b = render_snapshot(&config, &small());
        assert_eq!(a.surface.as_bytes(), b.surface.as_bytes());
    }

    #[test]
    fn test_gated_snapshot_is_background_only() {
        let config = FieldConfig::new().with_seed(3);
        let options = SnapshotOptions {
            reduced_motion: true,
            ..small()
        };
        let snapshot = render_snapshot(&config, &options);
        assert_eq!(snapshot.state, FieldState::Idle);
        assert_eq!(snapshot.frames_drawn, 0);

        let background = config.visuals.background.with_alpha(1.0).to_rgba8();
        assert!(snapshot.surface.pixels().iter().all(|p| *p == background));
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.png");
        let snapshot = render_snapshot(&FieldConfig::new().with_seed(1), &small());
        save_png(&snapshot.surface, &path).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (800, 400));
    }

    #[test]
    fn test_save_png_rejects_empty_surface() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_png(&PixelSurface::new(), dir.path().join("empty.png"));
        assert!(matches!(result, Err(FieldError::Usage(_))));
    }
}
