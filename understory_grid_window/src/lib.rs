// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_grid_window --heading-base-level=0

//! Understory Grid Window: a recycling, virtualized grid of square cells.
//!
//! A scrolling grid over thousands of items only ever needs enough cells to
//! cover the viewport plus a few buffer rows. This crate keeps exactly that
//! many cells alive and rebinds them to item indices as the user scrolls.
//!
//! The core concepts are:
//!
//! - [`GridCell`] and [`CellBinding`]: the capability a host cell type provides.
//!   The binding carries the item index the cell currently shows and the
//!   [`ClickRelay`] it reports activations to.
//! - [`CellPool`]: a LIFO store of inert cells backed by a [`CellFactory`].
//! - [`GridLayout`] and [`CellGeometry`]: spacing, padding, buffer rows, and the
//!   square cell size and placement they imply for a column count and width.
//! - [`compute_row_window`]: which rows should be bound for a scroll offset.
//! - [`GridWindow`]: the engine tying these together. It is built from host
//!   collaborators ([`Viewport`], [`ContentSurface`], [`ScrollSource`]) via
//!   [`GridWindowBuilder`] and reacts to scrolls, column changes, resizes, and
//!   data refreshes with the minimum amount of rebinding.
//!
//! This crate does not render anything and does not own item data. Hosts
//! supply a factory for their cell type and a configure callback that loads
//! the data for an index into a cell.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::Size;
//! use understory_grid_window::{
//!     CellBinding, ContentSurface, GridCell, GridWindow, ScrollSource, Viewport,
//! };
//!
//! #[derive(Default)]
//! struct Thumbnail {
//!     binding: CellBinding,
//!     label: String,
//! }
//!
//! impl GridCell for Thumbnail {
//!     fn binding(&self) -> &CellBinding {
//!         &self.binding
//!     }
//!     fn binding_mut(&mut self) -> &mut CellBinding {
//!         &mut self.binding
//!     }
//!     fn on_recycle(&mut self) {
//!         self.label.clear();
//!     }
//! }
//!
//! // A host whose viewport is 230 wide and 400 tall.
//! #[derive(Clone, Default)]
//! struct Host(Rc<RefCell<(f64, f64)>>);
//!
//! impl Viewport for Host {
//!     fn size(&self) -> Size {
//!         Size::new(230.0, 400.0)
//!     }
//! }
//! impl ContentSurface for Host {
//!     fn set_extent(&mut self, extent: f64) {
//!         self.0.borrow_mut().1 = extent;
//!     }
//! }
//! impl ScrollSource for Host {
//!     fn offset(&self) -> f64 {
//!         self.0.borrow().0
//!     }
//!     fn scroll_to_top(&mut self) {
//!         self.0.borrow_mut().0 = 0.0;
//!     }
//! }
//!
//! let host = Host::default();
//! let mut grid = GridWindow::builder()
//!     .viewport(host.clone())
//!     .content(host.clone())
//!     .scroll_source(host.clone())
//!     .factory(|| Some(Thumbnail::default()))
//!     .on_configure(|cell: &mut Thumbnail, index| cell.label = format!("#{index}"))
//!     .build()
//!     .unwrap();
//!
//! grid.initialize(100);
//!
//! // Two 100-unit columns; rows 0..=6 are bound (visible rows plus buffer).
//! assert_eq!(grid.active_len(), 14);
//! assert_eq!(grid.cell(3).unwrap().label, "#3");
//! assert_eq!(host.0.borrow().1, 50.0 * 110.0 - 10.0 + 20.0);
//!
//! // Scrolling far down reuses the same cells.
//! grid.on_scroll_offset_changed(2_000.0);
//! assert!(grid.cell(0).is_none());
//! assert!(grid.pool_stats().created <= 20);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` in `kurbo` and `tracing`.
//! - `libm`: floating point support for `kurbo` without `std`.
//! - `serde`: `Serialize`/`Deserialize` for [`GridLayout`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cell;
mod click;
mod error;
mod grid;
mod layout;
mod pool;
mod util;
mod window;

pub use cell::{CellBinding, GridCell};
pub use click::ClickRelay;
pub use error::GridError;
pub use grid::{
    ContentSurface, DEFAULT_COLUMNS, GridWindow, GridWindowBuilder, ScrollSource, Viewport,
};
pub use layout::{CellGeometry, GridLayout};
pub use pool::{CellFactory, CellPool, PoolStats};
pub use window::{RowWindow, compute_row_window};
