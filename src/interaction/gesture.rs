//! Tap recognition for touch input

use crate::layout::Point;

/// A finished tap: where and when the finger went down
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    at: Point,
    time_ms: f64,
}

/// Recognises two quick taps close to each other.
///
/// A tap is armed when a single finger touches down, spoiled if it travels
/// farther than the slop, and completed when the finger lifts. The second
/// completed tap within the time window and slop of the first is a double tap.
#[derive(Debug, Clone, Copy)]
pub struct DoubleTapDetector {
    max_interval_ms: f64,
    max_slop: f64,
    armed: Option<Tap>,
    moved: bool,
    previous: Option<Tap>,
}

impl DoubleTapDetector {
    pub fn new(max_interval_ms: f64, max_slop: f64) -> Self {
        Self {
            max_interval_ms,
            max_slop,
            armed: None,
            moved: false,
            previous: None,
        }
    }

    /// A single finger touched down
    pub fn arm(&mut self, at: Point, time_ms: f64) {
        self.armed = Some(Tap { at, time_ms });
        self.moved = false;
    }

    /// The finger moved; travelling beyond the slop turns the tap into a drag
    pub fn update(&mut self, at: Point) {
        if let Some(tap) = self.armed {
            if tap.at.distance(at) > self.max_slop {
                self.moved = true;
            }
        }
    }

    /// The finger lifted. Returns `true` when this completes a double tap.
    pub fn release(&mut self, time_ms: f64) -> bool {
        let Some(tap) = self.armed.take() else {
            return false;
        };
        if self.moved {
            self.previous = None;
            return false;
        }
        if let Some(previous) = self.previous.take() {
            let interval = time_ms - previous.time_ms;
            if interval >= 0.0
                && interval <= self.max_interval_ms
                && previous.at.distance(tap.at) <= self.max_slop
            {
                return true;
            }
        }
        self.previous = Some(tap);
        false
    }

    /// Forget everything, e.g. when a second finger turns the gesture into a pinch
    pub fn cancel(&mut self) {
        self.armed = None;
        self.moved = false;
        self.previous = None;
    }
}
