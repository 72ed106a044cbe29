// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests driving a grid through random operation sequences.
//!
//! After every operation:
//!
//! 1. Every created cell is either pooled, bound, discarded, or destroyed.
//! 2. The bound indices are exactly the window's indices, all below the item count.
//! 3. Each bound cell reports the index it is stored under.
//! 4. Cells leave the pool unbound and with their payload cleared.
//!
//! Separately, repeating a scroll offset or a column count does no work.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::rc::Rc;

use kurbo::Size;
use proptest::prelude::*;
use understory_grid_window::{
    CellBinding, ContentSurface, GridCell, GridLayout, GridWindow, ScrollSource, Viewport,
};

#[derive(Debug)]
struct Screen {
    size: Size,
    offset: f64,
    extent: f64,
}

#[derive(Clone, Debug)]
struct Host(Rc<RefCell<Screen>>);

impl Viewport for Host {
    fn size(&self) -> Size {
        self.0.borrow().size
    }
}

impl ContentSurface for Host {
    fn set_extent(&mut self, extent: f64) {
        self.0.borrow_mut().extent = extent;
    }
}

impl ScrollSource for Host {
    fn offset(&self) -> f64 {
        self.0.borrow().offset
    }

    fn scroll_to_top(&mut self) {
        self.0.borrow_mut().offset = 0.0;
    }
}

#[derive(Debug)]
struct Photo {
    binding: CellBinding,
    payload: Option<usize>,
    dirty_acquires: Rc<Cell<usize>>,
}

impl GridCell for Photo {
    fn binding(&self) -> &CellBinding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut CellBinding {
        &mut self.binding
    }

    fn set_active(&mut self, active: bool) {
        if active && (self.binding.is_bound() || self.payload.is_some()) {
            self.dirty_acquires.set(self.dirty_acquires.get() + 1);
        }
    }

    fn on_recycle(&mut self) {
        self.payload = None;
    }
}

#[derive(Clone, Debug)]
enum Op {
    Scroll(f64),
    Columns(usize),
    Count {
        count: usize,
        force: bool,
        to_top: bool,
    },
    Resize(f64, f64),
    Refresh,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-200.0..6_000.0f64).prop_map(Op::Scroll),
        1 => (1usize..=6).prop_map(Op::Columns),
        1 => (0usize..=300, any::<bool>(), any::<bool>())
            .prop_map(|(count, force, to_top)| Op::Count { count, force, to_top }),
        1 => (120.0..800.0f64, 100.0..900.0f64).prop_map(|(w, h)| Op::Resize(w, h)),
        1 => Just(Op::Refresh),
    ]
}

struct Rig {
    host: Host,
    grid: GridWindow<Photo>,
    configured: Rc<Cell<usize>>,
    dirty_acquires: Rc<Cell<usize>>,
}

fn rig(item_count: usize, buffer_rows: usize) -> Rig {
    let host = Host(Rc::new(RefCell::new(Screen {
        size: Size::new(360.0, 480.0),
        offset: 0.0,
        extent: 0.0,
    })));
    let configured = Rc::new(Cell::new(0));
    let dirty_acquires = Rc::new(Cell::new(0));

    let counter = configured.clone();
    let dirty = dirty_acquires.clone();
    let mut grid = GridWindow::builder()
        .viewport(host.clone())
        .content(host.clone())
        .scroll_source(host.clone())
        .layout(GridLayout::uniform(8.0, 12.0, buffer_rows))
        .factory(move || {
            Some(Photo {
                binding: CellBinding::new(),
                payload: None,
                dirty_acquires: dirty.clone(),
            })
        })
        .on_configure(move |photo: &mut Photo, index| {
            photo.payload = Some(index);
            counter.set(counter.get() + 1);
        })
        .build()
        .unwrap();
    grid.initialize(item_count);
    Rig {
        host,
        grid,
        configured,
        dirty_acquires,
    }
}

fn apply(rig: &mut Rig, op: &Op) {
    match *op {
        Op::Scroll(offset) => {
            rig.host.0.borrow_mut().offset = offset;
            rig.grid.on_scroll_offset_changed(offset);
        }
        Op::Columns(n) => rig.grid.set_column_count(NonZeroUsize::new(n).unwrap()),
        Op::Count {
            count,
            force,
            to_top,
        } => rig.grid.refresh_with_new_count(count, force, to_top),
        Op::Resize(width, height) => {
            rig.host.0.borrow_mut().size = Size::new(width, height);
            rig.grid.relayout();
        }
        Op::Refresh => rig.grid.refresh_data(),
    }
}

fn check(rig: &Rig) -> Result<(), TestCaseError> {
    let grid = &rig.grid;
    let stats = grid.pool_stats();
    prop_assert_eq!(
        stats.created,
        grid.pool_available() + grid.active_len() + stats.discarded + stats.destroyed,
        "cells leaked: {:?}",
        stats
    );

    let bound: BTreeSet<usize> = grid.active_cells().map(|(index, _)| index).collect();
    for (index, photo) in grid.active_cells() {
        prop_assert!(index < grid.item_count(), "index {} out of range", index);
        prop_assert_eq!(photo.index(), Some(index));
        prop_assert_eq!(photo.payload, Some(index));
    }

    let expected: BTreeSet<usize> = match grid.window() {
        Some(window) => window
            .indices(grid.geometry().columns(), grid.item_count())
            .collect(),
        None => BTreeSet::new(),
    };
    prop_assert_eq!(bound, expected);
    if let Some(window) = grid.window() {
        prop_assert!(grid.active_len() <= window.row_count() * grid.geometry().columns());
    }

    prop_assert_eq!(rig.dirty_acquires.get(), 0, "a cell left the pool still bound");
    prop_assert_eq!(rig.host.0.borrow().extent, grid.content_extent());
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_across_operations(
        item_count in 0usize..=300,
        buffer_rows in 0usize..=3,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut rig = rig(item_count, buffer_rows);
        check(&rig)?;
        for op in &ops {
            apply(&mut rig, op);
            check(&rig)?;
        }
    }
}

proptest! {
    #[test]
    fn repeating_a_scroll_does_no_work(
        item_count in 1usize..=300,
        first in 0.0..4_000.0f64,
        second in 0.0..4_000.0f64,
    ) {
        let mut rig = rig(item_count, 2);
        apply(&mut rig, &Op::Scroll(first));
        apply(&mut rig, &Op::Scroll(second));

        let stats = rig.grid.pool_stats();
        let configured = rig.configured.get();
        apply(&mut rig, &Op::Scroll(second));
        prop_assert_eq!(rig.grid.pool_stats(), stats);
        prop_assert_eq!(rig.configured.get(), configured);
    }
}

proptest! {
    #[test]
    fn repeating_a_column_count_does_no_work(
        item_count in 0usize..=300,
        columns in 1usize..=6,
        offset in 0.0..2_000.0f64,
    ) {
        let mut rig = rig(item_count, 2);
        apply(&mut rig, &Op::Scroll(offset));
        apply(&mut rig, &Op::Columns(columns));

        let stats = rig.grid.pool_stats();
        let configured = rig.configured.get();
        let window = rig.grid.window();
        apply(&mut rig, &Op::Columns(columns));
        prop_assert_eq!(rig.grid.pool_stats(), stats);
        prop_assert_eq!(rig.configured.get(), configured);
        prop_assert_eq!(rig.grid.window(), window);
        check(&rig)?;
    }
}
