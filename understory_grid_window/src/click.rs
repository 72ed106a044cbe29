// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click relay from long-lived cells to one grid-level listener.
//!
//! A grid hands every cell it creates a clone of the same [`ClickRelay`]. The
//! cell publishes the index it is bound to *at the moment of activation*, so a
//! subscription installed once at creation stays correct while the cell is
//! rebound to other indices by scrolling.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

type Listener = Box<dyn FnMut(usize)>;

/// Shared slot holding the grid-level click listener.
///
/// Cloning is cheap and all clones publish to the same listener. The listener
/// can be replaced or cleared at any time without touching the cells.
#[derive(Clone, Default)]
pub struct ClickRelay {
    listener: Rc<RefCell<Option<Listener>>>,
}

impl fmt::Debug for ClickRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickRelay")
            .field("has_listener", &self.has_listener())
            .field("subscribers", &Rc::strong_count(&self.listener))
            .finish()
    }
}

impl ClickRelay {
    /// Creates a relay without a listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `listener`, replacing any previous one.
    pub fn set_listener(&self, listener: impl FnMut(usize) + 'static) {
        match self.listener.try_borrow_mut() {
            Ok(mut slot) => *slot = Some(Box::new(listener)),
            Err(_) => tracing::warn!("cannot replace click listener while it is running"),
        }
    }

    /// Removes the current listener, if any.
    pub fn clear_listener(&self) {
        if let Ok(mut slot) = self.listener.try_borrow_mut() {
            *slot = None;
        }
    }

    /// Returns `true` if a listener is installed.
    #[must_use]
    pub fn has_listener(&self) -> bool {
        self.listener
            .try_borrow()
            .map(|slot| slot.is_some())
            .unwrap_or(true)
    }

    /// Delivers `index` to the listener.
    ///
    /// Returns `true` if a listener received it. Publishing from inside the
    /// listener itself is dropped.
    pub fn publish(&self, index: usize) -> bool {
        let Ok(mut slot) = self.listener.try_borrow_mut() else {
            tracing::debug!(index, "dropping re-entrant cell click");
            return false;
        };
        match slot.as_mut() {
            Some(listener) => {
                listener(index);
                true
            }
            None => false,
        }
    }
}
