//! Tap vs. drag disambiguation for the touch picker.
//!
//! The picker spins under the same finger that confirms a selection, so a
//! touch sequence has to be classified before the picker reacts to it.
//!
//! # State Machine
//!
//! | State      | Event        | Next       | Effect                          |
//! |------------|--------------|------------|---------------------------------|
//! | `Idle`     | touch start  | `Tracking` | record origin and time          |
//! | `Tracking` | rotation     | `Tracking` | mark the gesture as rotated     |
//! | `Tracking` | touch start  | `Tracking` | restart from the new origin     |
//! | `Tracking` | touch end    | `Resolved` | classify                        |
//! | `Tracking` | cancel       | `Idle`     | -                               |
//! | `Resolved` | (immediate)  | `Idle`     | -                               |
//! | `Idle`     | touch end    | `Idle`     | `Unpaired`                      |
//!
//! Rotations also arm a busy window independent of the state: a stationary
//! touch end inside that window is never a tap.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::NavigatorConfig;
use crate::layout::Band;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: TouchPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Tracking {
        origin: TouchPoint,
        started_at: Instant,
        rotated: bool,
    },
    Resolved,
}

/// How a finished touch sequence was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchDecision {
    /// Stationary tap inside the center band: open the active entry.
    Confirm,
    /// Stationary tap that missed the center band.
    TapOutsideBand,
    /// Stationary, but a picker rotation belongs to this gesture or its busy window.
    Suppressed,
    /// Moved past the tap slop: a scroll or a spin.
    Drag,
    /// Touch end with no matching touch start.
    Unpaired,
}

impl TouchDecision {
    pub fn commits_navigation(self) -> bool {
        self == Self::Confirm
    }
}

#[derive(Debug, Clone)]
pub struct GestureDisambiguator {
    tap_slop_px: f32,
    busy_window: Duration,
    state: GestureState,
    busy_until: Option<Instant>,
}

impl GestureDisambiguator {
    pub fn new(tap_slop_px: f32, busy_window: Duration) -> Self {
        Self {
            tap_slop_px,
            busy_window,
            state: GestureState::Idle,
            busy_until: None,
        }
    }

    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self::new(config.tap_slop_px, config.busy_window)
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// A touch sequence is in progress.
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, GestureState::Tracking { .. })
    }

    pub fn is_busy(&self, now: Instant) -> bool {
        self.busy_until.is_some_and(|until| now < until)
    }

    pub fn touch_start(&mut self, at: TouchPoint, now: Instant) {
        trace!(x = at.x, y = at.y, "Touch start");
        self.state = GestureState::Tracking {
            origin: at,
            started_at: now,
            rotated: false,
        };
    }

    /// Records a picker rotation. Arms the busy window and taints the current
    /// gesture, if any.
    pub fn note_rotation(&mut self, now: Instant) {
        let until = now + self.busy_window;
        self.busy_until = Some(self.busy_until.map_or(until, |prev| prev.max(until)));
        if let GestureState::Tracking { rotated, .. } = &mut self.state {
            *rotated = true;
        }
    }

    /// Classifies the sequence ending at `at` against the tap band and returns
    /// to `Idle`.
    pub fn touch_end(&mut self, at: TouchPoint, now: Instant, band: Band) -> TouchDecision {
        let GestureState::Tracking {
            origin,
            started_at,
            rotated,
        } = self.state
        else {
            return TouchDecision::Unpaired;
        };

        self.state = GestureState::Resolved;
        let distance = origin.distance_to(at);
        let decision = if distance >= self.tap_slop_px {
            TouchDecision::Drag
        } else if rotated || self.is_busy(now) {
            TouchDecision::Suppressed
        } else if band.contains(at.y) {
            TouchDecision::Confirm
        } else {
            TouchDecision::TapOutsideBand
        };

        debug!(
            ?decision,
            distance,
            held_ms = now.saturating_duration_since(started_at).as_millis() as u64,
            "Touch sequence resolved"
        );
        self.state = GestureState::Idle;
        decision
    }

    /// Abandons the in-progress sequence without classifying it. The busy
    /// window stays armed.
    pub fn cancel(&mut self) {
        if self.is_tracking() {
            trace!("Touch sequence cancelled");
        }
        self.state = GestureState::Idle;
    }

    /// Drops any in-progress sequence and the busy window, e.g. when the
    /// touch layout goes away.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.busy_until = None;
    }
}
