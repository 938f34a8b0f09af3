use std::time::{Duration, Instant};

use log::debug;

use crate::models::{BaseGesture, Edge, Gesture};

/// Fraction of the screen dimension that counts as an edge band.
const EDGE_STRICTNESS: f32 = 0.15;
/// Minimum horizontal displacement is a quarter of the screen width.
const HORIZONTAL_DIVISOR: f32 = 4.0;
/// Minimum vertical displacement is an eighth of the screen height.
const VERTICAL_DIVISOR: f32 = 8.0;
/// Downward swipes starting above this y are ignored so a pull on the
/// system gesture bar is not mistaken for an intentional swipe.
const TOP_START_GUARD_PX: f32 = 100.0;

/// A point in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Settings snapshot consumed by a single classification pass. Read fresh
/// per call so settings changes take effect immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifySettings {
    pub double_actions_enabled: bool,
    pub edge_actions_enabled: bool,
}

/// Classify a completed pointer trace into zero or one swipe gesture.
///
/// `pointer_count` is the peak concurrent pointer count buffered by
/// [`PointerDebounce`]. Taps, double-taps and long-presses are detected by
/// the host's tap-timing state machine, not here; traces that fail both
/// displacement thresholds yield `None` and never fall through to a tap.
///
/// Pure function of its inputs, no side effects.
pub fn classify(
    start: Point,
    end: Point,
    pointer_count: u32,
    settings: ClassifySettings,
    width: f32,
    height: f32,
) -> Option<Gesture> {
    let diff_x = start.x - end.x;
    let diff_y = start.y - end.y;

    let base = if diff_x.abs() > diff_y.abs() {
        // horizontal swipe
        if diff_x > width / HORIZONTAL_DIVISOR {
            Some(BaseGesture::SwipeLeft)
        } else if diff_x < -width / HORIZONTAL_DIVISOR {
            Some(BaseGesture::SwipeRight)
        } else {
            None
        }
    } else {
        // vertical swipe
        if diff_y < -height / VERTICAL_DIVISOR && start.y > TOP_START_GUARD_PX {
            Some(BaseGesture::SwipeDown)
        } else if diff_y > height / VERTICAL_DIVISOR {
            Some(BaseGesture::SwipeUp)
        } else {
            None
        }
    };

    let mut gesture = Gesture::new(base?);

    if settings.double_actions_enabled && pointer_count > 1 {
        gesture = gesture.double_variant();
    }

    if settings.edge_actions_enabled {
        // Left/right first, then top/bottom; a vertical edge match
        // overwrites a horizontal one. Kept exactly for compatibility.
        if start.x.max(end.x) < EDGE_STRICTNESS * width {
            gesture = gesture.edge_variant(Edge::Left);
        } else if start.x.min(end.x) > (1.0 - EDGE_STRICTNESS) * width {
            gesture = gesture.edge_variant(Edge::Right);
        }
        if start.y.max(end.y) < EDGE_STRICTNESS * height {
            gesture = gesture.edge_variant(Edge::Top);
        } else if start.y.min(end.y) > (1.0 - EDGE_STRICTNESS) * height {
            gesture = gesture.edge_variant(Edge::Bottom);
        }
    }

    debug!(
        "classified trace ({:.0},{:.0})->({:.0},{:.0}) pointers={} as {}",
        start.x,
        start.y,
        end.x,
        end.y,
        pointer_count,
        gesture
    );
    Some(gesture)
}

/// How long the buffered pointer count stays elevated after the last
/// elevation, so a double-finger swipe still classifies as such when the
/// second finger lifts slightly before the displacement finishes.
const POINTER_RESET_DELAY: Duration = Duration::from_millis(300);

/// Short-lived buffer for the concurrent pointer count.
///
/// Observing a higher count than the current buffered value stores it and
/// arms a reset deadline; reads past the deadline decay back to 1. A new
/// elevation replaces the pending deadline, so at most one is outstanding.
#[derive(Debug)]
pub struct PointerDebounce {
    count: u32,
    reset_at: Option<Instant>,
}

impl Default for PointerDebounce {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerDebounce {
    pub fn new() -> Self {
        Self { count: 1, reset_at: None }
    }

    /// Feed the pointer count of an incoming touch event.
    pub fn observe(&mut self, pointer_count: u32) {
        self.observe_at(pointer_count, Instant::now());
    }

    /// The buffered count as of now.
    pub fn current(&self) -> u32 {
        self.current_at(Instant::now())
    }

    fn observe_at(&mut self, pointer_count: u32, now: Instant) {
        if pointer_count > self.current_at(now) {
            self.count = pointer_count;
            self.reset_at = Some(now + POINTER_RESET_DELAY);
        }
    }

    fn current_at(&self, now: Instant) -> u32 {
        match self.reset_at {
            Some(deadline) if now < deadline => self.count,
            _ => 1,
        }
    }
}
