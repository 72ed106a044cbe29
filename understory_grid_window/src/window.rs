// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The row window: which rows of the grid should currently hold bound cells.

use core::ops::Range;

use crate::CellGeometry;
use crate::util::{ceil_to_i64, floor_to_i64, saturating_i64};

/// A contiguous range of grid rows, visible or buffered.
///
/// Rows are stored half-open (`start..end`), so the inclusive last row is
/// `end - 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RowWindow {
    /// First row (inclusive).
    pub start: usize,
    /// One past the last row (exclusive).
    pub end: usize,
}

impl RowWindow {
    /// A window with no rows.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Creates a window over the inclusive rows `first..=last`.
    #[must_use]
    pub const fn inclusive(first: usize, last: usize) -> Self {
        Self {
            start: first,
            end: last + 1,
        }
    }

    /// Returns `true` if the window holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of rows in the window.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// First row, if any.
    #[must_use]
    pub const fn first_row(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.start)
        }
    }

    /// Last row (inclusive), if any.
    #[must_use]
    pub const fn last_row(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }

    /// Returns `true` if `row` lies inside the window.
    #[must_use]
    pub const fn contains_row(&self, row: usize) -> bool {
        row >= self.start && row < self.end
    }

    /// Row range covered by the window.
    #[must_use]
    pub const fn rows(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Item indices covered by the window, clipped to `item_count`.
    #[must_use]
    pub fn indices(&self, columns: usize, item_count: usize) -> Range<usize> {
        if self.is_empty() {
            return 0..0;
        }
        let start = self.start.saturating_mul(columns).min(item_count);
        let end = self.end.saturating_mul(columns).min(item_count);
        start..end
    }
}

/// Compute the rows that should be bound for a scroll position.
///
/// - `scroll_offset`: distance from the top of the content to the top of the
///   viewport (positive when scrolled down).
/// - `viewport_height`: height of the visible area.
///
/// The window covers every row intersecting the viewport, widened by the
/// layout's buffer rows on both sides and clipped to the grid:
///
/// - `first = max(0, floor((offset - v_padding) / pitch) - buffer_rows)`
/// - `last = min(ceil((offset + viewport_height - v_padding) / pitch) + buffer_rows, rows - 1)`
///
/// where `pitch` is the cell extent plus vertical spacing. An empty grid,
/// degenerate (zero-height) rows, or a viewport scrolled entirely past the
/// content yield [`RowWindow::EMPTY`].
#[must_use]
pub fn compute_row_window(
    geometry: &CellGeometry,
    item_count: usize,
    scroll_offset: f64,
    viewport_height: f64,
) -> RowWindow {
    let total_rows = geometry.row_count(item_count);
    if total_rows == 0 {
        return RowWindow::EMPTY;
    }
    let pitch = geometry.row_pitch();
    if pitch.is_nan() || pitch <= 0.0 {
        return RowWindow::EMPTY;
    }

    let padding = geometry.layout().vertical_padding;
    let buffer = saturating_i64(geometry.layout().buffer_rows);

    let first = floor_to_i64((scroll_offset - padding) / pitch)
        .saturating_sub(buffer)
        .max(0);
    let last = ceil_to_i64((scroll_offset + viewport_height - padding) / pitch)
        .saturating_add(buffer)
        .min(saturating_i64(total_rows) - 1);

    if last < first {
        return RowWindow::EMPTY;
    }
    match (usize::try_from(first), usize::try_from(last)) {
        (Ok(first), Ok(last)) => RowWindow::inclusive(first, last),
        _ => RowWindow::EMPTY,
    }
}
