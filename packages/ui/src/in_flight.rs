//! One-at-a-time marker shared by the actions of a single page.

use std::cell::Cell;
use std::rc::Rc;

/// Marks that one of a page's requests is running. Clones share the marker.
#[derive(Clone, Debug, Default)]
pub struct InFlight {
    busy: Rc<Cell<bool>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the marker, `None` if another action holds it.
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        if self.busy.replace(true) {
            return None;
        }
        Some(InFlightGuard {
            busy: Rc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

/// Releases the marker when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    busy: Rc<Cell<bool>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}
