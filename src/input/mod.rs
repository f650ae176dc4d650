//! Input handling for the navigator:
//! - `InteractionModeDetector` - pointer vs. touch classification
//! - `GestureDisambiguator` - tap vs. drag on the picker surface
//! - `ScrollLockManager` - page scroll suspension in touch mode
//! - `EventChain` - capture/bubble priority observers

pub mod dispatch;
pub mod gesture;
pub mod mode;
pub mod scroll_lock;

pub use dispatch::{EventChain, Phase, Propagation};
pub use gesture::{GestureDisambiguator, GestureState, TouchDecision, TouchPoint};
pub use mode::{InteractionMode, InteractionModeDetector, TouchCapabilities};
pub use scroll_lock::{PageScroll, ScrollLockGuard, ScrollLockManager, ScrollSurface};
