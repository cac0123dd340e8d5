//! Per-frame integration and rendering.
//!
//! One frame is: clear, then for every particle evaluate the force field,
//! add the force to velocity, damp it, advance position by
//! `velocity * dt * time_scale`, wrap toroidally, and draw.

use crate::canvas::DrawSurface;
use crate::config::FieldConfig;
use crate::field::{FieldFrame, ForceField};
use crate::input::PointerState;
use crate::particle::{Particle, ParticleStore};
use crate::visuals::{ParticleShape, VisualConfig};
use glam::Vec2;

/// Velocity/position integrator with toroidal boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    /// Per-frame velocity damping.
    pub friction: f32,
    /// Position units per (velocity unit × millisecond).
    pub time_scale: f32,
    /// How far past each edge a particle travels before wrapping.
    pub margin: Vec2,
}

impl Integrator {
    pub fn new(friction: f32, time_scale: f32, margin: Vec2) -> Self {
        Self {
            friction,
            time_scale,
            margin,
        }
    }

    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(config.friction, config.time_scale, config.wrap_margin)
    }

    /// Apply `force` to one particle over `dt_ms` on a surface of `size`.
    pub fn integrate(&self, particle: &mut Particle, force: Vec2, dt_ms: f32, size: Vec2) {
        particle.velocity = (particle.velocity + force) * self.friction;
        particle.position += particle.velocity * (dt_ms * self.time_scale);

        if !particle.velocity.is_finite() {
            log::trace!("resetting non-finite velocity {:?}", particle.velocity);
            particle.velocity = Vec2::ZERO;
        }
        if !particle.position.is_finite() {
            log::trace!("re-seating non-finite position {:?}", particle.position);
            particle.position = size * 0.5;
        }

        particle.position = wrap_toroidal(particle.position, size, self.margin);
    }

    /// Advance every particle one frame.
    pub fn step(
        &self,
        store: &mut ParticleStore,
        field: &ForceField,
        frame: &FieldFrame,
        pointer: &PointerState,
        dt_ms: f32,
    ) {
        for particle in store.iter_mut() {
            let force = field.evaluate(particle, frame, pointer);
            self.integrate(particle, force, dt_ms, frame.size);
        }
    }
}

/// Wrap a position that has drifted past `margin` to the opposite edge.
///
/// Positions inside `[-margin, size + margin]` are returned unchanged.
#[inline]
pub fn wrap_toroidal(position: Vec2, size: Vec2, margin: Vec2) -> Vec2 {
    Vec2::new(
        wrap_axis(position.x, size.x, margin.x),
        wrap_axis(position.y, size.y, margin.y),
    )
}

#[inline]
fn wrap_axis(v: f32, extent: f32, margin: f32) -> f32 {
    if v < -margin {
        extent + margin
    } else if v > extent + margin {
        -margin
    } else {
        v
    }
}

/// Draw the current particle state over an opaque background.
pub fn render<S: DrawSurface + ?Sized>(surface: &mut S, store: &ParticleStore, visuals: &VisualConfig, time: f32) {
    let size = surface.logical_size();
    surface.clear(visuals.background.with_alpha(1.0));

    for particle in store.iter() {
        let alpha = visuals.particle_alpha(time, particle.phase_seed);
        if alpha <= 0.0 {
            continue;
        }
        let color = visuals.particle_color.with_alpha(alpha);
        match visuals.shape {
            ParticleShape::Circle => surface.fill_circle(particle.position, particle.size, color),
            ParticleShape::Square => surface.fill_rect(
                particle.position - Vec2::splat(particle.size * 0.5),
                Vec2::splat(particle.size),
                color,
            ),
        }
    }

    if let Some(alpha) = visuals.hairline_alpha {
        surface.fill_rect(
            Vec2::ZERO,
            Vec2::new(size.x, 1.0),
            visuals.particle_color.with_alpha(alpha),
        );
    }
}

/// One complete frame: integrate all particles, then draw them.
#[allow(clippy::too_many_arguments)]
pub fn run_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    store: &mut ParticleStore,
    integrator: &Integrator,
    field: &ForceField,
    frame: &FieldFrame,
    pointer: &PointerState,
    visuals: &VisualConfig,
    dt_ms: f32,
) {
    integrator.step(store, field, frame, pointer, dt_ms);
    render(surface, store, visuals, frame.time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Rgba;
    use crate::field::FieldShape;
    use crate::particle::SpawnParams;
    use crate::surface::PixelSurface;

    const SIZE: Vec2 = Vec2::new(800.0, 600.0);
    const MARGIN: Vec2 = Vec2::new(10.0, 20.0);

    fn still_particle(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            phase_seed: 0.0,
            size: 2.0,
            speed_factor: 1.0,
        }
    }

    #[test]
    fn test_wrap_leaves_inside_points() {
        let p = Vec2::new(-10.0, 620.0);
        assert_eq!(wrap_toroidal(p, SIZE, MARGIN), p);
    }

    #[test]
    fn test_wrap_right_edge_to_left() {
        let wrapped = wrap_toroidal(Vec2::new(810.5, 300.0), SIZE, MARGIN);
        assert!(wrapped.x >= -10.0 && wrapped.x < 0.0);
        assert_eq!(wrapped.y, 300.0);
    }

    #[test]
    fn test_wrap_each_edge() {
        assert_eq!(wrap_toroidal(Vec2::new(-10.5, 0.0), SIZE, MARGIN).x, 810.0);
        assert_eq!(wrap_toroidal(Vec2::new(0.0, -20.5), SIZE, MARGIN).y, 620.0);
        assert_eq!(wrap_toroidal(Vec2::new(0.0, 620.5), SIZE, MARGIN).y, -20.0);
    }

    #[test]
    fn test_damping_decays_monotonically() {
        let integrator = Integrator::new(0.985, 0.06, MARGIN);
        let mut p = still_particle(400.0, 300.0);
        p.velocity = Vec2::new(3.0, -4.0);

        let mut last = p.velocity.length();
        for _ in 0..2000 {
            integrator.integrate(&mut p, Vec2::ZERO, 16.0, SIZE);
            let speed = p.velocity.length();
            assert!(speed <= last);
            last = speed;
        }
        assert!(last < 1e-6);
    }

    #[test]
    fn test_position_scales_with_dt() {
        let integrator = Integrator::new(1.0, 0.06, MARGIN);
        let mut a = still_particle(100.0, 100.0);
        let mut b = still_particle(100.0, 100.0);
        integrator.integrate(&mut a, Vec2::new(1.0, 0.0), 10.0, SIZE);
        integrator.integrate(&mut b, Vec2::new(1.0, 0.0), 20.0, SIZE);
        assert!((a.position.x - 100.6).abs() < 1e-4);
        assert!((b.position.x - 101.2).abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_state_repaired() {
        let integrator = Integrator::new(0.985, 0.06, MARGIN);
        let mut p = still_particle(100.0, 100.0);
        integrator.integrate(&mut p, Vec2::new(f32::INFINITY, 0.0), 16.0, SIZE);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.position, SIZE * 0.5);
    }

    #[test]
    fn test_step_keeps_population_inside_margin() {
        let config = FieldConfig::default();
        let integrator = Integrator::from_config(&config);
        let field = ForceField::new(FieldShape::flow(), 140.0, 0.36);
        let mut store = ParticleStore::create(300, SIZE.x, SIZE.y, &SpawnParams::default(), 5);
        let pointer = PointerState {
            position: Vec2::new(400.0, 300.0),
            active: true,
        };

        for i in 0..500 {
            let frame = FieldFrame {
                time: i as f32 * 0.01,
                swirl: 0.0,
                size: SIZE,
                multiplier: 2.5,
            };
            integrator.step(&mut store, &field, &frame, &pointer, 40.0);
            assert_eq!(store.len(), 300);
            for p in store.iter() {
                assert!(p.position.x >= -MARGIN.x && p.position.x <= SIZE.x + MARGIN.x);
                assert!(p.position.y >= -MARGIN.y && p.position.y <= SIZE.y + MARGIN.y);
            }
        }
    }

    #[test]
    fn test_render_draws_background_and_particles() {
        let mut surface = PixelSurface::new();
        surface.configure(40.0, 40.0, 1.0);
        let mut store = ParticleStore::create(1, 40.0, 40.0, &SpawnParams::default(), 0);
        store[0].position = Vec2::new(20.0, 20.0);
        store[0].size = 3.0;

        let mut visuals = VisualConfig::default();
        visuals
            .alpha_pulse(1.0, 0.0, 0.0)
            .particle_color(Rgba::new(1.0, 0.0, 0.0, 1.0))
            .background(Rgba::BLACK)
            .hairline(None);
        render(&mut surface, &store, &visuals, 0.0);

        assert_eq!(surface.pixel(20, 20), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_render_draws_squares() {
        let mut surface = PixelSurface::new();
        surface.configure(40.0, 40.0, 1.0);
        let mut store = ParticleStore::create(1, 40.0, 40.0, &SpawnParams::default(), 0);
        store[0].position = Vec2::new(20.0, 20.0);
        store[0].size = 4.0;

        let mut visuals = VisualConfig::default();
        visuals
            .shape(ParticleShape::Square)
            .alpha_pulse(1.0, 0.0, 0.0)
            .particle_color(Rgba::new(1.0, 0.0, 0.0, 1.0))
            .background(Rgba::BLACK)
            .hairline(None);
        render(&mut surface, &store, &visuals, 0.0);

        // Side 4 centred on (20, 20) covers columns and rows 18..22.
        for (x, y) in [(18, 18), (21, 18), (18, 21), (21, 21), (20, 20)] {
            assert_eq!(surface.pixel(x, y), Some([255, 0, 0, 255]), "({}, {})", x, y);
        }
        for (x, y) in [(17, 20), (22, 20), (20, 17), (20, 22)] {
            assert_eq!(surface.pixel(x, y), Some([0, 0, 0, 255]), "({}, {})", x, y);
        }
    }

    #[test]
    fn test_render_sub_pixel_square_visible() {
        let mut surface = PixelSurface::new();
        surface.configure(20.0, 20.0, 1.0);
        let mut store = ParticleStore::create(1, 20.0, 20.0, &SpawnParams::default(), 0);
        store[0].position = Vec2::new(10.0, 10.0);
        store[0].size = 0.8;

        let mut visuals = VisualConfig::default();
        visuals
            .shape(ParticleShape::Square)
            .alpha_pulse(1.0, 0.0, 0.0)
            .particle_color(Rgba::new(1.0, 1.0, 1.0, 1.0))
            .background(Rgba::BLACK)
            .hairline(None);
        render(&mut surface, &store, &visuals, 0.0);

        let lit = surface.pixels().iter().filter(|p| p[0] > 0).count();
        assert_eq!(lit, 1);
    }

    #[test]
    fn test_render_hairline_on_top_row() {
        let mut surface = PixelSurface::new();
        surface.configure(10.0, 10.0, 1.0);
        let store = ParticleStore::create(0, 10.0, 10.0, &SpawnParams::default(), 0);

        let mut visuals = VisualConfig::default();
        visuals
            .background(Rgba::BLACK)
            .particle_color(Rgba::new(1.0, 1.0, 1.0, 1.0))
            .hairline(Some(0.5));
        render(&mut surface, &store, &visuals, 0.0);

        assert!(surface.pixel(5, 0).unwrap()[0] > 100);
        assert_eq!(surface.pixel(5, 1), Some([0, 0, 0, 255]));
    }
}
