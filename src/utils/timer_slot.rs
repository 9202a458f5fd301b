use std::cell::RefCell;
use std::rc::Rc;

use crate::page::Page;

/// Cancel-and-replace holder for a single pending timer
///
/// Each logical operation (restoring a button, dismissing a toast) owns one
/// slot. Scheduling into a slot cancels whatever was pending there, so two
/// overlapping triggers never race each other.
///
/// # Example
/// ```ignore
/// let slot = TimerSlot::new();
/// slot.schedule(&page, 2000, move || restore_button());
/// slot.schedule(&page, 2000, move || restore_button()); // first one cancelled
/// ```
pub struct TimerSlot<P: Page> {
    pending: Rc<RefCell<Option<P::Timer>>>,
}

impl<P: Page> TimerSlot<P> {
    pub fn new() -> Self {
        Self {
            pending: Rc::new(RefCell::new(None)),
        }
    }

    /// Schedule `callback` after `delay_ms`, cancelling any pending timer
    pub fn schedule<F>(&self, page: &P, delay_ms: u32, callback: F)
    where
        F: FnOnce() + 'static,
    {
        // Drop the previous handle first so it can never fire
        self.cancel();

        let timer = page.set_timeout(delay_ms, Box::new(callback));
        *self.pending.borrow_mut() = Some(timer);
    }

    /// Cancel the pending timer, if any
    pub fn cancel(&self) {
        let previous = self.pending.borrow_mut().take();
        drop(previous);
    }
}

impl<P: Page> Clone for TimerSlot<P> {
    fn clone(&self) -> Self {
        Self {
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<P: Page> Default for TimerSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}
