//! Frame timing.
//!
//! [`FrameClock`] turns the host's frame timestamps into clamped deltas, so a
//! long pause (backgrounded window, debugger, slow frame) never produces one
//! giant integration step. Timestamps are milliseconds, like a browser's
//! animation-frame clock; [`HostClock`] produces them from `std::time` for
//! native hosts.
//!
//! ```
//! use particle_field::time::FrameClock;
//!
//! let mut clock = FrameClock::new(40.0);
//! clock.start(1000.0);
//! assert_eq!(clock.tick(1016.0), 16.0);
//! // A 5 second stall is integrated as a single 40ms step.
//! assert_eq!(clock.tick(6016.0), 40.0);
//! ```

use std::time::Instant;

/// How often the FPS estimate is refreshed, in milliseconds.
const FPS_UPDATE_INTERVAL_MS: f64 = 500.0;

/// Clamped frame-delta tracker.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Largest delta ever returned, in milliseconds.
    frame_cap_ms: f32,
    /// Timestamp of the previous frame.
    last_frame: f64,
    /// Delta returned by the most recent tick.
    delta_ms: f32,
    /// Frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Timestamp of last FPS update.
    fps_update_time: f64,
}

impl FrameClock {
    /// Create a clock that caps deltas at `frame_cap_ms`.
    pub fn new(frame_cap_ms: f32) -> Self {
        Self {
            frame_cap_ms,
            last_frame: 0.0,
            delta_ms: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: 0.0,
        }
    }

    /// Reset the clock so the next tick measures from `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.last_frame = now_ms;
        self.delta_ms = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = now_ms;
    }

    /// Advance to `now_ms` and return the clamped delta in milliseconds.
    ///
    /// Timestamps that go backwards (or are not finite) yield a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let raw = now_ms - self.last_frame;
        self.delta_ms = if raw.is_finite() {
            (raw as f32).clamp(0.0, self.frame_cap_ms)
        } else {
            0.0
        };
        if now_ms.is_finite() {
            self.last_frame = now_ms;
        }
        self.frame_count += 1;

        let since = now_ms - self.fps_update_time;
        if since >= FPS_UPDATE_INTERVAL_MS {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = (frames as f64 * 1000.0 / since) as f32;
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now_ms;
        }

        self.delta_ms
    }

    /// Delta returned by the last tick, in milliseconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_ms
    }

    /// Timestamp of the last tick (or start).
    #[inline]
    pub fn last_frame(&self) -> f64 {
        self.last_frame
    }

    /// Frames ticked since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed every half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Monotonic millisecond timestamps measured from creation.
#[derive(Debug, Clone, Copy)]
pub struct HostClock {
    start: Instant,
}

impl HostClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    /// Milliseconds since this clock was created.
    pub fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}
