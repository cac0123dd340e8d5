//! Integration tests for the particle field.
//!
//! These drive the public API the way a host would: mount on a surface,
//! deliver frames through a [`ManualHost`], route events, and tear down.

use particle_field::prelude::*;
use particle_field::{pointer_repulsion, render_snapshot, wrap_toroidal, FieldFrame, PointerState, SnapshotOptions};

fn seeded() -> FieldConfig {
    FieldConfig::new().with_seed(2024)
}

fn mount(config: FieldConfig, env: &Environment) -> (ManualHost, ParticleField<PixelSurface>) {
    let mut host = ManualHost::new();
    let mut field = ParticleField::new(config);
    field.mount(Some(PixelSurface::new()), env, &mut host, 0.0);
    (host, field)
}

// ============================================================================
// Population
// ============================================================================

#[test]
fn test_full_hd_population_clamps_to_max() {
    // floor(1920 * 1080 / 520) = 3987, above the 2200 ceiling
    let (_, field) = mount(seeded(), &Environment::new(1920.0, 1080.0, 1.0));
    assert_eq!(field.particles().unwrap().len(), 2200);
}

#[test]
fn test_tablet_population_uses_density() {
    let (_, field) = mount(seeded(), &Environment::new(1024.0, 768.0, 2.0));
    assert_eq!(field.particles().unwrap().len(), 1512);
}

#[test]
fn test_population_floor() {
    let config = seeded().with_small_screen_breakpoint(0.0);
    let (_, field) = mount(config, &Environment::new(800.0, 200.0, 1.0));
    assert_eq!(field.particles().unwrap().len(), 800);
}

#[test]
fn test_population_constant_across_frames() {
    let (mut host, mut field) = mount(seeded(), &Environment::new(1280.0, 720.0, 1.0));
    let count = field.particles().unwrap().len();
    for _ in 0..10 {
        host.run_frames(&mut field, 0.0, 16.0, 20);
        assert_eq!(field.particles().unwrap().len(), count);
    }
}

// ============================================================================
// Gating
// ============================================================================

#[test]
fn test_reduced_motion_renders_nothing() {
    let env = Environment::new(1920.0, 1080.0, 1.0).with_reduced_motion(true);
    let (host, mut field) = mount(seeded(), &env);

    assert_eq!(field.state(), FieldState::Idle);
    assert_eq!(host.frames_requested(), 0);
    assert_eq!(host.listener_count(), 0);

    let surface = field.take_surface().unwrap();
    assert_eq!(surface.physical_size(), (0, 0));
}

#[test]
fn test_small_viewport_renders_nothing() {
    let (host, field) = mount(seeded(), &Environment::new(767.0, 900.0, 1.0));
    assert_eq!(field.state(), FieldState::Idle);
    assert!(field.particles().is_none());
    assert_eq!(host.pending(), None);
}

#[test]
fn test_breakpoint_is_inclusive() {
    let (_, field) = mount(seeded(), &Environment::new(768.0, 900.0, 1.0));
    assert_eq!(field.state(), FieldState::Running);
}

// ============================================================================
// Surface scaling
// ============================================================================

#[test]
fn test_surface_dpr_clamped_to_two() {
    let (_, field) = mount(seeded(), &Environment::new(1000.0, 800.0, 3.0));
    let surface = field.surface().unwrap();
    assert_eq!(surface.device_pixel_ratio(), 2.0);
    assert_eq!(surface.physical_size(), (2000, 1600));
    assert_eq!(surface.logical_size(), Vec2::new(1000.0, 800.0));
}

#[test]
fn test_resize_keeps_particles() {
    let (mut host, mut field) = mount(seeded(), &Environment::new(1280.0, 720.0, 1.0));
    host.run_frames(&mut field, 0.0, 16.0, 5);
    let before = field.particles().unwrap().len();

    field.handle_resize(Viewport::new(1000.0, 900.0, 1.5));
    host.run_frames(&mut field, 80.0, 16.0, 5);

    assert_eq!(field.particles().unwrap().len(), before);
    assert_eq!(field.surface().unwrap().physical_size(), (1500, 1350));
}

#[test]
fn test_collapsed_viewport_keeps_distribution() {
    let (mut host, mut field) = mount(seeded(), &Environment::new(1280.0, 720.0, 1.0));
    host.run_frames(&mut field, 0.0, 16.0, 2);

    // Minimized window.
    field.handle_resize(Viewport::new(0.0, 0.0, 1.0));
    assert_eq!(host.run_frames(&mut field, 32.0, 16.0, 1), 0);
    assert!(host.pending().is_some());

    field.handle_resize(Viewport::new(1280.0, 720.0, 1.0));
    assert_eq!(host.run_frames(&mut field, 48.0, 16.0, 1), 1);

    let particles = field.particles().unwrap();
    let interior = particles
        .iter()
        .filter(|p| p.position.x > 50.0 && p.position.x < 1230.0 && p.position.y > 50.0 && p.position.y < 670.0)
        .count();
    assert!(interior > particles.len() / 2, "{} of {} in interior", interior, particles.len());
}

#[test]
fn test_collapsed_viewport_leaves_particles_untouched() {
    let (mut host, mut field) = mount(seeded(), &Environment::new(1024.0, 768.0, 1.0));
    host.run_frames(&mut field, 0.0, 16.0, 3);
    let before = field.particles().unwrap().as_slice().to_vec();

    field.handle_resize(Viewport::new(1024.0, 0.0, 1.0));
    host.run_frames(&mut field, 48.0, 16.0, 5);
    assert_eq!(field.particles().unwrap().as_slice(), before.as_slice());
    assert!(field.is_running());
}

// ============================================================================
// Frames and motion
// ============================================================================

#[test]
fn test_particles_stay_within_wrap_margin() {
    let config = seeded();
    let margin = config.wrap_margin;
    let (mut host, mut field) = mount(config, &Environment::new(1024.0, 768.0, 1.0));
    field.handle_pointer_move(Vec2::new(512.0, 384.0));
    field.set_boost(true);

    for step in 0..20 {
        // Irregular frame times, including stalls beyond the cap.
        let gap = if step % 5 == 0 { 500.0 } else { 17.0 };
        host.run_frames(&mut field, step as f64 * 600.0, gap, 10);
        for p in field.particles().unwrap().iter() {
            assert!(p.position.is_finite());
            assert!(p.position.x >= -margin.x && p.position.x <= 1024.0 + margin.x);
            assert!(p.position.y >= -margin.y && p.position.y <= 768.0 + margin.y);
        }
    }
}

#[test]
fn test_long_stall_is_capped() {
    let (mut host, mut field) = mount(seeded(), &Environment::new(1280.0, 720.0, 1.0));
    let handle = host.take_pending().unwrap();
    assert!(field.on_frame(handle, 60_000.0, &mut host));
    assert_eq!(field.clock().delta(), 40.0);
}

#[test]
fn test_seeded_fields_are_identical() {
    let env = Environment::new(1280.0, 720.0, 1.0);
    let (mut host_a, mut a) = mount(seeded(), &env);
    let (mut host_b, mut b) = mount(seeded(), &env);
    host_a.run_frames(&mut a, 0.0, 16.0, 30);
    host_b.run_frames(&mut b, 0.0, 16.0, 30);

    assert_eq!(a.particles().unwrap().as_slice(), b.particles().unwrap().as_slice());
    assert_eq!(a.surface().unwrap().as_bytes(), b.surface().unwrap().as_bytes());
}

#[test]
fn test_boost_speeds_particles_without_respawning() {
    let env = Environment::new(1280.0, 720.0, 1.0);
    let (mut host_calm, mut calm) = mount(seeded(), &env);
    let (mut host_boost, mut boosted) = mount(seeded(), &env);
    let seeds: Vec<f32> = boosted.particles().unwrap().iter().map(|p| p.phase_seed).collect();

    boosted.set_boost(true);
    host_calm.run_frames(&mut calm, 0.0, 16.0, 30);
    host_boost.run_frames(&mut boosted, 0.0, 16.0, 30);

    let energy = |f: &ParticleField<PixelSurface>| -> f32 {
        f.particles().unwrap().iter().map(|p| p.velocity.length_squared()).sum()
    };
    assert!(energy(&boosted) > energy(&calm));

    let after: Vec<f32> = boosted.particles().unwrap().iter().map(|p| p.phase_seed).collect();
    assert_eq!(seeds, after);
}

#[test]
fn test_pointer_pushes_particles_away() {
    let pointer = PointerState {
        position: Vec2::new(100.0, 100.0),
        active: true,
    };
    let push = pointer_repulsion(Vec2::new(130.0, 100.0), 1.0, &pointer, 140.0, 0.36);
    assert!(push.x > 0.0);
    assert!(push.y.abs() < 1e-6);

    let outside = pointer_repulsion(Vec2::new(300.0, 100.0), 1.0, &pointer, 140.0, 0.36);
    assert_eq!(outside, Vec2::ZERO);
}

#[test]
fn test_field_frame_boost_multiplier() {
    let config = FieldConfig::new();
    let calm = FieldFrame::new(&config, 0.0, 0.0, Vec2::new(100.0, 100.0), false);
    let boosted = FieldFrame::new(&config, 0.0, 0.0, Vec2::new(100.0, 100.0), true);
    assert_eq!(calm.multiplier, 1.0);
    assert_eq!(boosted.multiplier, 1.8);
}

#[test]
fn test_wrap_is_toroidal() {
    let size = Vec2::new(100.0, 50.0);
    let margin = Vec2::new(10.0, 20.0);
    assert_eq!(wrap_toroidal(Vec2::new(111.0, 0.0), size, margin).x, -10.0);
    assert_eq!(wrap_toroidal(Vec2::new(-11.0, 0.0), size, margin).x, 110.0);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_teardown_then_stale_frame_draws_nothing() {
    let (mut host, mut field) = mount(seeded(), &Environment::new(1280.0, 720.0, 1.0));
    host.run_frames(&mut field, 0.0, 16.0, 3);
    let stale = host.pending().unwrap();
    let frame_before = field.surface().unwrap().as_bytes().to_vec();

    field.dispose(&mut host);
    field.dispose(&mut host);

    assert!(!field.on_frame(stale, 100.0, &mut host));
    assert_eq!(field.surface().unwrap().as_bytes(), frame_before.as_slice());
    assert_eq!(host.pending(), None);
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.frames_cancelled(), 1);
}

#[test]
fn test_events_after_teardown_ignored() {
    let (mut host, mut field) = mount(seeded(), &Environment::new(1280.0, 720.0, 1.0));
    field.dispose(&mut host);

    field.handle_pointer_move(Vec2::new(5.0, 5.0));
    field.handle_resize(Viewport::new(2000.0, 1000.0, 1.0));
    assert!(!field.pointer().active);
    assert_eq!(field.surface().unwrap().logical_size(), Vec2::new(1280.0, 720.0));
}

// ============================================================================
// Snapshot and config
// ============================================================================

#[test]
fn test_snapshot_draws_particles_over_background() {
    let config = seeded().with_visuals(|v| {
        v.alpha_pulse(0.9, 0.0, 0.0).hairline(None);
    });
    let options = SnapshotOptions {
        width: 800.0,
        height: 600.0,
        frames: 5,
        ..Default::default()
    };
    let snapshot = render_snapshot(&config, &options);
    let background = config.visuals.background.with_alpha(1.0).to_rgba8();
    let lit = snapshot.surface.pixels().iter().filter(|p| **p != background).count();
    assert!(lit > 0);
}

#[test]
fn test_json_config_drives_field() {
    let config = FieldConfig::from_json_str(
        r#"{ "seed": 5, "max_count": 900, "field_shape": { "flow_field": { "gain": 0.03, "scale": 2.0 } } }"#,
    )
    .unwrap();
    let (_, field) = mount(config, &Environment::new(1920.0, 1080.0, 1.0));
    assert_eq!(field.particles().unwrap().len(), 900);
}
