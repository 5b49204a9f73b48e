//! Explicit "enqueue now, apply at checkpoint" task queue.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

type Task = Box<dyn FnOnce()>;

/// Single-threaded FIFO of deferred mutations.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct UpdateQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs queued tasks in FIFO order until the queue is empty.
    ///
    /// Tasks scheduled while flushing run in the same flush. Returns the number
    /// of tasks executed.
    pub fn flush(&self) -> usize {
        let mut executed = 0;
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };
            task();
            executed += 1;
        }
        executed
    }
}

impl Debug for UpdateQueue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
