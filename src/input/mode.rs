//! Input modality detection.
//!
//! The navigator renders nothing interaction-specific until the first probe
//! lands, so a pointer list never flashes on a phone (or the reverse).

use tracing::debug;

use crate::layout::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Loading,
    PointerDriven,
    TouchDriven,
}

impl InteractionMode {
    pub fn is_resolved(self) -> bool {
        self != Self::Loading
    }
}

/// What the platform reports about touch input. `None` means the signal is
/// not exposed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchCapabilities {
    /// Touch events are supported by the document.
    pub touch_events: Option<bool>,
    /// Reported maximum simultaneous touch points.
    pub max_touch_points: Option<u32>,
}

impl TouchCapabilities {
    pub fn touch() -> Self {
        Self {
            touch_events: Some(true),
            max_touch_points: Some(5),
        }
    }

    pub fn pointer() -> Self {
        Self {
            touch_events: Some(false),
            max_touch_points: Some(0),
        }
    }

    /// True only when some signal positively reports touch. Missing or partial
    /// information never counts as touch.
    pub fn reports_touch(&self) -> bool {
        self.touch_events == Some(true) || self.max_touch_points.is_some_and(|n| n > 0)
    }
}

#[derive(Debug, Clone)]
pub struct InteractionModeDetector {
    touch_breakpoint_px: Option<u32>,
    mode: InteractionMode,
}

impl InteractionModeDetector {
    pub fn new(touch_breakpoint_px: Option<u32>) -> Self {
        Self {
            touch_breakpoint_px,
            mode: InteractionMode::Loading,
        }
    }

    /// Last classified mode; `Loading` until the first probe.
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn classify(&self, caps: TouchCapabilities, viewport: Viewport) -> InteractionMode {
        let narrow = self
            .touch_breakpoint_px
            .is_some_and(|breakpoint| viewport.width < breakpoint);
        if caps.reports_touch() || narrow {
            InteractionMode::TouchDriven
        } else {
            InteractionMode::PointerDriven
        }
    }

    /// Probes and stores the mode. Returns the new mode when it changed.
    pub fn probe(&mut self, caps: TouchCapabilities, viewport: Viewport) -> Option<InteractionMode> {
        let mode = self.classify(caps, viewport);
        if mode == self.mode {
            return None;
        }
        debug!(from = ?self.mode, to = ?mode, width = viewport.width, "Interaction mode changed");
        self.mode = mode;
        Some(mode)
    }
}
