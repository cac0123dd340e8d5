//! Native window host.
//!
//! Runs a [`ParticleField`] in a winit window. Frames are scheduled with
//! `request_redraw`, so the event loop sleeps (`ControlFlow::Wait`) whenever
//! the field is not running. Controls:
//!
//! - Mouse: repels particles
//! - Wheel: scrolls the virtual page (shifts the swirl phase)
//! - Left button / Space (held): boost
//! - M: toggle reduced motion (remounts the field)

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::gpu::GpuState;
use crate::input::{Input, InputEvent};
use crate::lifecycle::{Environment, FieldState, FrameHandle, FrameHost, Listener, ParticleField, Viewport};
use crate::surface::PixelSurface;
use crate::time::HostClock;

const WINDOW_TITLE: &str = "Particle Field";
const TITLE_UPDATE_MS: f64 = 500.0;

/// [`FrameHost`] backed by a winit window.
#[derive(Default)]
struct WindowHost {
    window: Option<Arc<Window>>,
    next_id: u64,
    pending: Option<FrameHandle>,
    listeners: Vec<Listener>,
}

impl FrameHost for WindowHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle::new(self.next_id);
        self.pending = Some(handle);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        // A redraw already queued with the OS still arrives, but finds no
        // pending handle.
        if self.pending == Some(handle) {
            self.pending = None;
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

impl WindowHost {
    fn routes(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }
}

pub struct App {
    config: FieldConfig,
    reduced_motion: bool,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    host: WindowHost,
    field: Option<ParticleField<PixelSurface>>,
    input: Input,
    clock: HostClock,
    last_title_update: f64,
    error: Option<FieldError>,
}

impl App {
    pub fn new(config: FieldConfig, reduced_motion: bool) -> Self {
        Self {
            config,
            reduced_motion,
            window: None,
            gpu: None,
            host: WindowHost::default(),
            field: None,
            input: Input::new(),
            clock: HostClock::new(),
            last_title_update: 0.0,
            error: None,
        }
    }

    fn viewport(window: &Window) -> Viewport {
        let scale = window.scale_factor();
        let logical = window.inner_size().to_logical::<f32>(scale);
        Viewport::new(logical.width, logical.height, scale as f32)
    }

    /// Dispose the current field (if any) and mount a fresh one.
    fn mount_field(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let recycled = self.field.take().and_then(|mut old| {
            old.dispose(&mut self.host);
            old.take_surface()
        });
        let surface = match self.gpu {
            Some(_) => Some(recycled.unwrap_or_else(|| PixelSurface::with_max_dpr(self.config.max_dpr))),
            None => None,
        };

        let env = Environment {
            viewport: Self::viewport(&window),
            reduced_motion: self.reduced_motion,
        };

        let mut field = ParticleField::new(self.config.clone());
        field.set_scroll(self.input.scroll_y());
        field.set_boost(self.input.boost());
        let state = field.mount(surface, &env, &mut self.host, self.clock.now_ms());
        self.field = Some(field);

        if state != FieldState::Running {
            window.set_title(WINDOW_TITLE);
            // Paint the static background once.
            window.request_redraw();
        }
    }

    fn dispose_field(&mut self) {
        if let Some(field) = self.field.as_mut() {
            field.dispose(&mut self.host);
        }
    }

    fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::ToggleReducedMotion => {
                self.reduced_motion = !self.reduced_motion;
                log::info!("reduced motion {}", if self.reduced_motion { "on" } else { "off" });
                self.mount_field();
            }
            InputEvent::Scroll(y) => {
                if let Some(field) = self.field.as_mut() {
                    field.set_scroll(y);
                }
            }
            InputEvent::Boost(on) => {
                if let Some(field) = self.field.as_mut() {
                    field.set_boost(on);
                }
            }
            InputEvent::PointerMove(position) => {
                if let (true, Some(field)) = (self.host.routes(Listener::PointerMove), self.field.as_mut()) {
                    field.handle_pointer_move(position);
                }
            }
            InputEvent::PointerLeave => {
                if let (true, Some(field)) = (self.host.routes(Listener::PointerLeave), self.field.as_mut()) {
                    field.handle_pointer_leave();
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.clock.now_ms();

        if let (Some(handle), Some(field)) = (self.host.pending.take(), self.field.as_mut()) {
            field.on_frame(handle, now, &mut self.host);
        }

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let frame = self
            .field
            .as_ref()
            .filter(|f| f.is_running())
            .and_then(|f| f.surface());

        match gpu.render(frame) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.resize(gpu.size()),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        self.update_title(now);
    }

    fn update_title(&mut self, now: f64) {
        if now - self.last_title_update < TITLE_UPDATE_MS {
            return;
        }
        self.last_title_update = now;
        if let (Some(window), Some(field)) = (&self.window, &self.field) {
            if field.is_running() {
                window.set_title(&format!("{} - {:.0} FPS", WINDOW_TITLE, field.clock().fps()));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());
        self.host.window = Some(window.clone());

        // No GPU means no drawing surface: the field stays idle.
        match pollster::block_on(GpuState::new(window, self.config.visuals.background)) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => log::warn!("{}; particle field disabled", e),
        }

        self.mount_field();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.dispose_field();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(physical_size);
                }
                let Some(window) = self.window.clone() else {
                    return;
                };
                if let (true, Some(field)) = (self.host.routes(Listener::Resize), self.field.as_mut()) {
                    field.handle_resize(Self::viewport(&window));
                }
                if !self.field.as_ref().is_some_and(|f| f.is_running()) {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                if let Some(input) = self.input.handle_event(&other, scale) {
                    self.dispatch(input);
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.dispose_field();
    }
}

/// Open a window and run the field until it is closed.
pub fn run(config: FieldConfig, reduced_motion: bool) -> Result<(), FieldError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, reduced_motion);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
