// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability every pooled cell provides to the grid.

use kurbo::{Point, Size};

use crate::ClickRelay;

/// Index bookkeeping and click subscription embedded in every cell.
///
/// A binding is either unbound (the cell is free, or was just recycled) or
/// bound to exactly one item index. The grid owns the index; hosts only read
/// it, typically from a click or press handler:
///
/// ```compile_fail
/// use understory_grid_window::CellBinding;
///
/// let mut binding = CellBinding::new();
/// binding.set_index(7);
/// ```
#[derive(Debug, Default)]
pub struct CellBinding {
    index: Option<usize>,
    clicks: Option<ClickRelay>,
}

impl CellBinding {
    /// Creates an unbound, unsubscribed binding.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index: None,
            clicks: None,
        }
    }

    /// Returns the item index this cell currently represents.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns `true` if the cell is bound to an item.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.index.is_some()
    }

    /// Records which item index this cell represents. No rendering happens here.
    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = Some(index);
    }

    /// Clears the bound index.
    pub(crate) fn clear_index(&mut self) {
        self.index = None;
    }

    /// Routes future activations to `relay`.
    ///
    /// The grid calls this once, when the cell is created.
    pub(crate) fn subscribe(&mut self, relay: ClickRelay) {
        self.clicks = Some(relay);
    }

    /// Returns `true` if activations are routed anywhere.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.clicks.is_some()
    }

    /// Reports a user activation of this cell.
    ///
    /// Publishes the index bound *now*. Returns `false` if the cell is unbound,
    /// unsubscribed, or nobody is listening.
    pub fn activate(&self) -> bool {
        let Some(index) = self.index else {
            return false;
        };
        self.clicks
            .as_ref()
            .is_some_and(|relay| relay.publish(index))
    }
}

/// A reusable view handle managed by a [`GridWindow`](crate::GridWindow).
///
/// Only the binding accessors are required. The provided hooks are no-ops and
/// let hosts mirror the grid's decisions onto real views:
///
/// - [`set_active`](GridCell::set_active) when the pool hands the cell out or
///   takes it back (show/hide, attach to the content or to a holding area),
/// - [`place`](GridCell::place) when the cell is positioned for a new index,
/// - [`on_recycle`](GridCell::on_recycle) before the cell returns to the pool,
/// - [`is_alive`](GridCell::is_alive) to report a view destroyed out of band.
///
/// When recycling, the grid clears the binding index first and then calls
/// [`on_recycle`](GridCell::on_recycle), so overrides only need to reset their
/// own transient state (pending image loads, badges, press animations).
pub trait GridCell {
    /// Shared access to the embedded binding.
    fn binding(&self) -> &CellBinding;

    /// Exclusive access to the embedded binding.
    fn binding_mut(&mut self) -> &mut CellBinding;

    /// Shorthand for `self.binding().index()`.
    fn index(&self) -> Option<usize> {
        self.binding().index()
    }

    /// Called with `true` when leaving the pool and `false` when returning to it.
    fn set_active(&mut self, active: bool) {
        let _ = active;
    }

    /// Positions the cell.
    ///
    /// `origin` is the cell's top-left corner in content coordinates, with `y`
    /// growing upward from the top edge of the content (so rows have `y <= 0`).
    fn place(&mut self, origin: Point, size: Size) {
        let _ = (origin, size);
    }

    /// Resets collaborator state before the cell returns to the pool.
    fn on_recycle(&mut self) {}

    /// Returns `false` once the underlying view was destroyed by someone else.
    fn is_alive(&self) -> bool {
        true
    }
}

/// Unbinds `cell` and runs its recycle hook.
pub(crate) fn recycle<C: GridCell>(cell: &mut C) {
    cell.binding_mut().clear_index();
    cell.on_recycle();
}
