//! Field lifecycle: mounting, the frame loop, and teardown.
//!
//! A [`ParticleField`] moves through three states:
//!
//! | State | Draws | Meaning |
//! |-------|-------|---------|
//! | `Idle` | no | Not started, or gated off at mount |
//! | `Running` | yes | One frame is always pending with the host |
//! | `Disposed` | no | Torn down; terminal |
//!
//! The field never schedules anything itself. A [`FrameHost`] hands out
//! [`FrameHandle`]s, delivers them back through
//! [`ParticleField::on_frame`], and routes listener events. The field only
//! acts on the handle it is currently waiting for, so a callback that
//! arrives after [`ParticleField::dispose`] draws nothing.
//!
//! # Gating
//!
//! Mounting is skipped (the field stays `Idle`, silently) when reduced
//! motion is preferred, when the viewport is narrower than the small-screen
//! breakpoint, or when no drawing surface is available.
//!
//! ```
//! use particle_field::prelude::*;
//!
//! let mut host = ManualHost::new();
//! let mut field = ParticleField::new(FieldConfig::new().with_seed(1));
//! let env = Environment::new(1280.0, 720.0, 1.0);
//!
//! field.mount(Some(PixelSurface::new()), &env, &mut host, 0.0);
//! assert_eq!(field.state(), FieldState::Running);
//!
//! host.run_frames(&mut field, 0.0, 16.0, 3);
//! field.dispose(&mut host);
//! assert_eq!(host.pending(), None);
//! ```

use crate::canvas::DrawSurface;
use crate::config::FieldConfig;
use crate::field::{FieldFrame, ForceField};
use crate::input::{PageState, PointerState};
use crate::integrate::{run_frame, Integrator};
use crate::particle::{ParticleStore, SpawnParams};
use crate::time::FrameClock;
use glam::Vec2;

/// Lifecycle state of a [`ParticleField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Idle,
    Running,
    Disposed,
}

/// Why a mount did not start the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateReason {
    /// The user prefers reduced motion.
    ReducedMotion,
    /// The viewport is below the small-screen breakpoint.
    SmallScreen,
    /// No drawing surface was provided.
    NoSurface,
}

/// Opaque token for one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host events the field subscribes to while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Resize,
    PointerMove,
    PointerLeave,
}

impl Listener {
    pub const ALL: [Listener; 3] = [Listener::Resize, Listener::PointerMove, Listener::PointerLeave];
}

/// Frame scheduling and event routing provided by the embedding host.
pub trait FrameHost {
    /// Schedule one frame callback and return its handle.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Start delivering `listener` events to the field.
    fn listen(&mut self, listener: Listener);

    /// Stop delivering `listener` events to the field.
    fn unlisten(&mut self, listener: Listener);
}

/// Viewport size in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Ambient page state read once at mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub viewport: Viewport,
    pub reduced_motion: bool,
}

impl Environment {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height, device_pixel_ratio),
            reduced_motion: false,
        }
    }

    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }
}

/// Decide whether the field may start in `env`.
pub fn gate(config: &FieldConfig, env: &Environment) -> Option<GateReason> {
    if env.reduced_motion {
        Some(GateReason::ReducedMotion)
    } else if !(env.viewport.width >= config.small_screen_breakpoint) {
        Some(GateReason::SmallScreen)
    } else {
        None
    }
}

/// The particle field component.
pub struct ParticleField<S: DrawSurface> {
    config: FieldConfig,
    field: ForceField,
    integrator: Integrator,
    state: FieldState,
    surface: Option<S>,
    store: Option<ParticleStore>,
    pointer: PointerState,
    page: PageState,
    clock: FrameClock,
    boost: bool,
    pending: Option<FrameHandle>,
    listeners: Vec<Listener>,
}

impl<S: DrawSurface> ParticleField<S> {
    /// Create an idle field.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            field: ForceField::from_config(&config),
            integrator: Integrator::from_config(&config),
            clock: FrameClock::new(config.frame_cap_ms),
            config,
            state: FieldState::Idle,
            surface: None,
            store: None,
            pointer: PointerState::default(),
            page: PageState::default(),
            boost: false,
            pending: None,
            listeners: Vec::new(),
        }
    }

    /// Mount the field on `surface` and start the frame loop.
    ///
    /// Does nothing unless the field is `Idle`. If gating applies the field
    /// stays `Idle` and never draws; the surface is kept so it can be
    /// recovered with [`take_surface`](Self::take_surface).
    pub fn mount<H: FrameHost + ?Sized>(
        &mut self,
        surface: Option<S>,
        env: &Environment,
        host: &mut H,
        now_ms: f64,
    ) -> FieldState {
        if self.state != FieldState::Idle {
            return self.state;
        }

        let reason = match surface {
            None => Some(GateReason::NoSurface),
            Some(_) => gate(&self.config, env),
        };
        self.surface = surface;
        if let Some(reason) = reason {
            log::debug!("particle field not started: {:?}", reason);
            return self.state;
        }
        let Some(surface) = self.surface.as_mut() else {
            return self.state;
        };

        let vp = env.viewport;
        surface.configure(vp.width, vp.height, vp.device_pixel_ratio);

        let count = self.config.particle_count(vp.width, vp.height);
        let seed = self.config.seed.unwrap_or_else(seed_from_clock);
        let params = SpawnParams {
            distribution: self.config.distribution,
            size_range: self.config.size_range,
            speed_factor_range: self.config.speed_factor_range,
        };
        self.store = Some(ParticleStore::create(count, vp.width, vp.height, &params, seed));

        for listener in Listener::ALL {
            host.listen(listener);
            self.listeners.push(listener);
        }
        self.clock.start(now_ms);
        self.pending = Some(host.request_frame());
        self.state = FieldState::Running;

        log::info!(
            "particle field running: {} particles, {}x{} @ {}x",
            count,
            vp.width,
            vp.height,
            vp.device_pixel_ratio
        );
        self.state
    }

    /// Frame callback. Returns `true` if a frame was drawn.
    ///
    /// Ignored unless the field is running and `handle` is the frame it is
    /// waiting for.
    pub fn on_frame<H: FrameHost + ?Sized>(&mut self, handle: FrameHandle, now_ms: f64, host: &mut H) -> bool {
        if self.state != FieldState::Running || self.pending != Some(handle) {
            return false;
        }
        self.pending = None;

        let (Some(surface), Some(store)) = (self.surface.as_mut(), self.store.as_mut()) else {
            return false;
        };

        let dt = self.clock.tick(now_ms);
        let size = surface.logical_size();
        if !(size.x >= 1.0 && size.y >= 1.0) {
            // Minimized or collapsed viewport: hold particles in place until
            // it has an area again, otherwise wrapping piles them on the edges.
            log::trace!("skipping frame on {}x{} viewport", size.x, size.y);
            self.pending = Some(host.request_frame());
            return false;
        }
        let frame = FieldFrame::new(&self.config, now_ms, self.page.scroll_y, size, self.boost);
        run_frame(
            surface,
            store,
            &self.integrator,
            &self.field,
            &frame,
            &self.pointer,
            &self.config.visuals,
            dt,
        );

        self.pending = Some(host.request_frame());
        true
    }

    /// Tear down: cancel the pending frame and remove all listeners.
    ///
    /// Idempotent. Valid from any state.
    pub fn dispose<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if self.state == FieldState::Disposed {
            return;
        }
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        for listener in self.listeners.drain(..) {
            host.unlisten(listener);
        }
        if self.state == FieldState::Running {
            log::info!("particle field disposed after {} frames", self.clock.frame());
        }
        self.store = None;
        self.state = FieldState::Disposed;
    }

    /// Update the boost hint. Takes effect on the next frame; particle
    /// state is untouched.
    pub fn set_boost(&mut self, boost: bool) {
        self.boost = boost;
    }

    /// Update the page scroll offset read by the next frame.
    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.page.scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
    }

    /// Pointer moved (logical, surface-local coordinates).
    pub fn handle_pointer_move(&mut self, position: Vec2) {
        if self.is_listening(Listener::PointerMove) {
            self.pointer.move_to(position);
        }
    }

    /// Pointer left the surface.
    pub fn handle_pointer_leave(&mut self) {
        if self.is_listening(Listener::PointerLeave) {
            self.pointer.leave();
        }
    }

    /// Viewport changed. Reconfigures the surface; particles are kept and
    /// redistribute through wrapping.
    pub fn handle_resize(&mut self, viewport: Viewport) {
        if !self.is_listening(Listener::Resize) {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.configure(viewport.width, viewport.height, viewport.device_pixel_ratio);
            log::debug!(
                "particle field resized to {}x{} @ {}x",
                viewport.width,
                viewport.height,
                viewport.device_pixel_ratio
            );
        }
    }

    /// Recover the surface from a field that is not running.
    pub fn take_surface(&mut self) -> Option<S> {
        if self.state == FieldState::Running {
            None
        } else {
            self.surface.take()
        }
    }

    #[inline]
    pub fn state(&self) -> FieldState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == FieldState::Running
    }

    #[inline]
    pub fn boost(&self) -> bool {
        self.boost
    }

    #[inline]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The frame the field is waiting for, if any.
    #[inline]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_listening(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn particles(&self) -> Option<&ParticleStore> {
        self.store.as_ref()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

/// Seed derived from the wall clock, different on every run.
fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

/// Host driven by explicit calls, for headless rendering and tests.
#[derive(Debug, Default)]
pub struct ManualHost {
    next_id: u64,
    pending: Option<FrameHandle>,
    listeners: Vec<Listener>,
    requested: u64,
    cancelled: u64,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scheduled frame, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Remove and return the scheduled frame.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn is_listening(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Total frames ever requested.
    pub fn frames_requested(&self) -> u64 {
        self.requested
    }

    /// Total frames cancelled while pending.
    pub fn frames_cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Deliver up to `frames` scheduled frames at `start_ms`, `start_ms +
    /// step_ms`, ... Stops early when nothing is scheduled. Returns the
    /// number of frames drawn.
    pub fn run_frames<S: DrawSurface>(
        &mut self,
        field: &mut ParticleField<S>,
        start_ms: f64,
        step_ms: f64,
        frames: u32,
    ) -> u32 {
        let mut drawn = 0;
        for i in 0..frames {
            let Some(handle) = self.take_pending() else {
                break;
            };
            if field.on_frame(handle, start_ms + step_ms * (i as f64 + 1.0), self) {
                drawn += 1;
            }
        }
        drawn
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }

    fn listen(&mut self, listener: Listener) {
        if !self.listeners.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    fn unlisten(&mut self, listener: Listener) {
        self.listeners.retain(|l| *l != listener);
    }
}
