//! Pointer, page and interaction state.
//!
//! [`PointerState`] and [`PageState`] are the plain scalars the frame loop
//! reads. [`Input`] translates raw winit window events into
//! [`InputEvent`]s for the native host, converting physical cursor
//! coordinates to logical pixels on the way.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Logical pixels scrolled per wheel line.
const LINE_SCROLL_PX: f32 = 40.0;

/// Latest raw pointer sample. Not smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Pointer position in surface-local logical pixels.
    pub position: Vec2,
    /// Whether the pointer is over the surface.
    pub active: bool,
}

impl PointerState {
    /// Record a move to `position`; the pointer becomes active.
    #[inline]
    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
        self.active = true;
    }

    /// Record the pointer leaving; the last position is kept.
    #[inline]
    pub fn leave(&mut self) {
        self.active = false;
    }
}

/// Ambient page state read fresh every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageState {
    /// Vertical scroll offset in logical pixels.
    pub scroll_y: f32,
}

/// A host-level event, already in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a logical position.
    PointerMove(Vec2),
    /// Pointer left the surface.
    PointerLeave,
    /// Page scroll offset changed to this absolute value.
    Scroll(f32),
    /// Boost hint switched on or off.
    Boost(bool),
    /// User asked to flip the reduced-motion preference.
    ToggleReducedMotion,
}

/// Translates winit window events for the native host.
///
/// The wheel drives a virtual page scroll (never below zero). Boost is held
/// while the left mouse button or the space bar is down.
#[derive(Debug, Default)]
pub struct Input {
    scroll_y: f32,
    mouse_boost: bool,
    key_boost: bool,
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual scroll offset.
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Whether boost is currently held.
    pub fn boost(&self) -> bool {
        self.mouse_boost || self.key_boost
    }

    /// Process a winit window event. `scale_factor` converts physical
    /// cursor positions into logical pixels.
    pub fn handle_event(&mut self, event: &WindowEvent, scale_factor: f64) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(scale_factor);
                Some(InputEvent::PointerMove(Vec2::new(logical.x, logical.y)))
            }

            WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeave),

            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y * LINE_SCROLL_PX,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / scale_factor) as f32,
                };
                // Wheel up (positive) scrolls toward the top of the page.
                let next = (self.scroll_y - dy).max(0.0);
                if next == self.scroll_y {
                    return None;
                }
                self.scroll_y = next;
                Some(InputEvent::Scroll(next))
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let was = self.boost();
                self.mouse_boost = *state == ElementState::Pressed;
                self.boost_change(was)
            }

            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(KeyCode::Space) => {
                    let was = self.boost();
                    self.key_boost = event.state == ElementState::Pressed;
                    self.boost_change(was)
                }
                PhysicalKey::Code(KeyCode::KeyM)
                    if event.state == ElementState::Pressed && !event.repeat =>
                {
                    Some(InputEvent::ToggleReducedMotion)
                }
                _ => None,
            },

            _ => None,
        }
    }

    fn boost_change(&self, was: bool) -> Option<InputEvent> {
        let now = self.boost();
        (now != was).then_some(InputEvent::Boost(now))
    }
}
