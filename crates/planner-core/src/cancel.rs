//! Cooperative cancellation for in-flight requests.
//!
//! Single-threaded (WASM constraint): shared state lives in an `Rc<RefCell>`.
//! Platform adapters register a hook (e.g. `AbortController::abort`) that
//! runs when the token is cancelled.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type CancelHook = Box<dyn FnOnce()>;

#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Rc<RefCell<CancelState>>,
}

#[derive(Default)]
struct CancelState {
    cancelled: bool,
    hooks: Vec<CancelHook>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel and run every registered hook once. Idempotent.
    pub fn cancel(&self) {
        let hooks = {
            let mut state = self.inner.borrow_mut();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
            std::mem::take(&mut state.hooks)
        };
        for hook in hooks {
            hook();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.borrow().cancelled
    }

    /// Register a hook. Runs immediately if already cancelled.
    pub fn on_cancel(&self, hook: impl FnOnce() + 'static) {
        let mut state = self.inner.borrow_mut();
        if state.cancelled {
            drop(state);
            hook();
        } else {
            state.hooks.push(Box::new(hook));
        }
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
