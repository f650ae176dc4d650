// Priority observer chain
// Capture-phase observers see an event before any bubble-phase observer and
// can stop it from travelling further, the way the tap detector has to beat
// the picker widget's own tap handling.

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Bubble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

type Observer<E> = Box<dyn FnMut(&E) -> Propagation>;

/// Ordered observers for one event type. Capture observers run first, each
/// phase in registration order.
pub struct EventChain<E> {
    capture: Vec<Observer<E>>,
    bubble: Vec<Observer<E>>,
}

impl<E> EventChain<E> {
    pub fn new() -> Self {
        Self {
            capture: Vec::new(),
            bubble: Vec::new(),
        }
    }

    pub fn observe<F>(&mut self, phase: Phase, observer: F)
    where
        F: FnMut(&E) -> Propagation + 'static,
    {
        match phase {
            Phase::Capture => self.capture.push(Box::new(observer)),
            Phase::Bubble => self.bubble.push(Box::new(observer)),
        }
    }

    /// Delivers `event`. Returns `Stop` if an observer halted it.
    pub fn dispatch(&mut self, event: &E) -> Propagation {
        for (index, observer) in self
            .capture
            .iter_mut()
            .chain(self.bubble.iter_mut())
            .enumerate()
        {
            if observer(event) == Propagation::Stop {
                trace!(index, "Event propagation stopped");
                return Propagation::Stop;
            }
        }
        Propagation::Continue
    }

    pub fn len(&self) -> usize {
        self.capture.len() + self.bubble.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for EventChain<E> {
    fn default() -> Self {
        Self::new()
    }
}
