// Page scroll suspension for the touch picker layout.
// The lock is an RAII guard: dropping it on a mode change, unmount or unwind
// always leaves page scrolling enabled.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::input::InteractionMode;

/// The document-level scroll the navigator needs to freeze.
pub trait ScrollSurface {
    /// Enables or disables outer-page scrolling.
    fn set_page_scroll(&self, enabled: bool);
    fn page_scroll_enabled(&self) -> bool;
}

/// In-memory page scroll state, used headless and as the default surface.
#[derive(Debug)]
pub struct PageScroll {
    enabled: Cell<bool>,
}

impl PageScroll {
    pub fn new() -> Self {
        Self {
            enabled: Cell::new(true),
        }
    }
}

impl Default for PageScroll {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSurface for PageScroll {
    fn set_page_scroll(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn page_scroll_enabled(&self) -> bool {
        self.enabled.get()
    }
}

/// Held while page scroll is frozen. Page scroll is enabled again on drop,
/// whatever it was before.
pub struct ScrollLockGuard {
    surface: Rc<dyn ScrollSurface>,
}

impl ScrollLockGuard {
    fn acquire(surface: Rc<dyn ScrollSurface>) -> Self {
        surface.set_page_scroll(false);
        debug!("Page scroll locked");
        Self { surface }
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.surface.set_page_scroll(true);
        debug!("Page scroll released");
    }
}

impl std::fmt::Debug for ScrollLockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollLockGuard").finish_non_exhaustive()
    }
}

/// Keeps the page scroll lock in step with the interaction mode.
pub struct ScrollLockManager {
    surface: Rc<dyn ScrollSurface>,
    guard: Option<ScrollLockGuard>,
}

impl ScrollLockManager {
    pub fn new(surface: Rc<dyn ScrollSurface>) -> Self {
        Self {
            surface,
            guard: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.guard.is_some()
    }

    /// Locks for `TouchDriven`, releases for anything else.
    pub fn sync(&mut self, mode: InteractionMode) {
        match (mode, self.guard.is_some()) {
            (InteractionMode::TouchDriven, false) => {
                self.guard = Some(ScrollLockGuard::acquire(Rc::clone(&self.surface)));
            }
            (InteractionMode::TouchDriven, true) => {}
            (_, true) => self.release(),
            (_, false) => {}
        }
    }

    /// Whether a touch move should have its default action prevented.
    pub fn should_prevent_touch_move(&self, cancelable: bool) -> bool {
        cancelable && self.is_locked()
    }

    pub fn release(&mut self) {
        self.guard.take();
    }
}

impl std::fmt::Debug for ScrollLockManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollLockManager")
            .field("guard", &self.guard)
            .finish()
    }
}
