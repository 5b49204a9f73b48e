//! Teardown registration for one render pass.

use crate::dom::Fragment;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

type Callback = Box<dyn FnOnce()>;

/// Collects teardown callbacks while a pass renders entities.
#[derive(Clone, Default)]
pub struct TeardownRegistrar {
    callbacks: Rc<RefCell<Vec<Callback>>>,
}

impl TeardownRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, callback: impl FnOnce() + 'static) {
        self.callbacks.borrow_mut().push(Box::new(callback));
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }

    /// Seals the pass: the returned handle owns its callbacks and fragment.
    pub fn into_teardown(self, fragment: Fragment) -> Teardown {
        Teardown {
            registrar: self,
            fragment,
        }
    }
}

/// Reverts one render pass. Consumed by `run`, so it cannot run twice.
pub struct Teardown {
    registrar: TeardownRegistrar,
    fragment: Fragment,
}

impl Teardown {
    /// Runs every registered callback in registration order, then clears the
    /// rendered fragment. Returns the number of callbacks run.
    pub fn run(self) -> usize {
        let callbacks = std::mem::take(&mut *self.registrar.callbacks.borrow_mut());
        let count = callbacks.len();
        for callback in callbacks {
            callback();
        }
        self.fragment.clear();
        count
    }

    pub fn pending_callbacks(&self) -> usize {
        self.registrar.len()
    }
}

impl Debug for Teardown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("pending_callbacks", &self.pending_callbacks())
            .finish()
    }
}
