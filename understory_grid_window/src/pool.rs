// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A LIFO pool of inert, reusable cells.

use alloc::vec::Vec;
use core::fmt;

use crate::GridCell;
use crate::GridError;
use crate::cell::recycle;

/// Creates cells on demand for a [`CellPool`].
///
/// Returning `None` means the factory could not produce a usable cell; the
/// pool reports that as [`GridError::MalformedCell`]. Any `FnMut() -> Option<C>`
/// is a factory.
pub trait CellFactory<C> {
    /// Creates a new cell.
    fn create(&mut self) -> Option<C>;
}

impl<C, F> CellFactory<C> for F
where
    F: FnMut() -> Option<C>,
{
    fn create(&mut self) -> Option<C> {
        self()
    }
}

/// Lifetime counters of a [`CellPool`].
///
/// At any time, `created == available + handed_out + discarded + destroyed`,
/// where `handed_out` is the number of cells currently held outside the pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Cells produced by the factory.
    pub created: usize,
    /// Successful `get` calls.
    pub acquired: usize,
    /// Cells returned with `put` and kept for reuse.
    pub released: usize,
    /// Cells dropped because they were no longer alive.
    pub discarded: usize,
    /// Free cells dropped by [`CellPool::clear`].
    pub destroyed: usize,
    /// Factory calls that produced nothing.
    pub factory_failures: usize,
}

impl PoolStats {
    /// Number of cells currently held outside the pool.
    ///
    /// Saturates at zero if the pool was handed cells it never created.
    #[must_use]
    pub const fn handed_out(&self, available: usize) -> usize {
        self.created
            .saturating_sub(available)
            .saturating_sub(self.discarded)
            .saturating_sub(self.destroyed)
    }
}

/// LIFO store of free cells, backed by a [`CellFactory`].
///
/// Cells move by value: a cell is owned either by the pool or by whoever
/// called [`get`](Self::get), so the same cell can never be handed out twice
/// without an intervening [`put`](Self::put).
pub struct CellPool<C, F> {
    factory: F,
    free: Vec<C>,
    stats: PoolStats,
}

impl<C, F> fmt::Debug for CellPool<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellPool")
            .field("available", &self.free.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<C: GridCell, F: CellFactory<C>> CellPool<C, F> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            free: Vec::new(),
            stats: PoolStats::default(),
        }
    }

    /// Creates a pool pre-filled with `initial` inert cells.
    #[must_use]
    pub fn with_capacity(factory: F, initial: usize) -> Self {
        let mut pool = Self::new(factory);
        pool.reserve(initial);
        pool
    }

    /// Number of free cells.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Lifetime counters.
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Takes a free cell, or creates one, and activates it.
    ///
    /// Free cells that died while pooled are discarded on the way.
    pub fn try_get(&mut self) -> Result<C, GridError> {
        let mut cell = loop {
            match self.free.pop() {
                Some(cell) if cell.is_alive() => break cell,
                Some(_) => self.stats.discarded += 1,
                None => break self.create()?,
            }
        };
        cell.set_active(true);
        self.stats.acquired += 1;
        Ok(cell)
    }

    /// Like [`try_get`](Self::try_get), discarding the error.
    pub fn get(&mut self) -> Option<C> {
        self.try_get().ok()
    }

    /// Deactivates `cell` and keeps it for reuse.
    ///
    /// A cell that is still bound is recycled first, so every cell leaving the
    /// pool is unbound. Dead cells are dropped.
    pub fn put(&mut self, mut cell: C) {
        if !cell.is_alive() {
            tracing::debug!("dropping dead cell instead of pooling it");
            self.stats.discarded += 1;
            return;
        }
        if cell.binding().is_bound() {
            recycle(&mut cell);
        }
        cell.set_active(false);
        self.stats.released += 1;
        self.free.push(cell);
    }

    /// Creates inert cells until at least `count` are free.
    ///
    /// Returns how many cells were created. Stops early if the factory fails.
    pub fn reserve(&mut self, count: usize) -> usize {
        let mut made = 0;
        while self.free.len() < count {
            let Ok(mut cell) = self.create() else {
                break;
            };
            cell.set_active(false);
            self.free.push(cell);
            made += 1;
        }
        made
    }

    /// Drops every free cell. Cells handed out are unaffected.
    pub fn clear(&mut self) {
        self.stats.destroyed += self.free.len();
        self.free.clear();
    }

    /// Shared access to the factory.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    fn create(&mut self) -> Result<C, GridError> {
        match self.factory.create() {
            Some(cell) => {
                self.stats.created += 1;
                Ok(cell)
            }
            None => {
                self.stats.factory_failures += 1;
                Err(GridError::MalformedCell)
            }
        }
    }
}
