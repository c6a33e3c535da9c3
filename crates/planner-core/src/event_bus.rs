//! Event bus carrying session and notice events from stores to the UI.
//!
//! Single-threaded (WASM) and buffered; the UI drains it once per frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use planner_types::event::AppEvent;

/// Shared event bus, clone-cheap via Rc.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<AppEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: AppEvent) {
        log::debug!("event: {:?}", event);
        self.inner.borrow_mut().push_back(event);
    }

    /// Drain all pending events. Called by the UI layer each frame.
    pub fn drain(&self) -> Vec<AppEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    /// Pending events mean the UI should repaint.
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }
}
