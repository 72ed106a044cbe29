// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout parameters and the cell geometry derived from them.
//!
//! Cells are square: their extent is derived from the viewport width, the
//! horizontal padding and spacing, and the column count, and the same value is
//! used as the row height. Items are laid out row-major, so item `i` sits in
//! row `i / columns` and column `i % columns`.
//!
//! Coordinates follow a top-left anchored content surface whose `y` axis grows
//! upward: the first row starts at `y = -vertical_padding` and later rows move
//! further below zero. The scroll axis is measured as a positive offset from
//! the top of the content.

use core::num::NonZeroUsize;

use kurbo::{Point, Size};

use crate::util::ceil_to_i64;

/// Spacing, padding, and overscan of a [`GridWindow`](crate::GridWindow).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GridLayout {
    /// Gap between neighbouring columns.
    pub horizontal_spacing: f64,
    /// Gap between neighbouring rows.
    pub vertical_spacing: f64,
    /// Space between the content edge and the first/last column.
    pub horizontal_padding: f64,
    /// Space between the content edge and the first/last row.
    pub vertical_padding: f64,
    /// Extra rows kept bound above and below the viewport to hide pop-in.
    pub buffer_rows: usize,
}

impl GridLayout {
    /// Ten units of spacing and padding with two buffer rows.
    pub const DEFAULT: Self = Self::uniform(10.0, 10.0, 2);

    /// Uses the same `spacing` and `padding` on both axes.
    #[must_use]
    pub const fn uniform(spacing: f64, padding: f64, buffer_rows: usize) -> Self {
        Self {
            horizontal_spacing: spacing,
            vertical_spacing: spacing,
            horizontal_padding: padding,
            vertical_padding: padding,
            buffer_rows,
        }
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Cell size and placement for one column count and viewport width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellGeometry {
    layout: GridLayout,
    columns: NonZeroUsize,
    cell_extent: f64,
}

impl CellGeometry {
    /// Derives the square cell extent for `columns` columns across `viewport_width`.
    ///
    /// The extent is `(width - 2 * h_padding - h_spacing * (columns - 1)) / columns`,
    /// clamped at zero.
    #[must_use]
    pub fn new(layout: GridLayout, columns: NonZeroUsize, viewport_width: f64) -> Self {
        let count = columns.get() as f64;
        let available = viewport_width
            - layout.horizontal_padding * 2.0
            - layout.horizontal_spacing * (count - 1.0);
        let cell_extent = (available / count).max(0.0);
        Self {
            layout,
            columns,
            cell_extent,
        }
    }

    /// The layout this geometry was derived from.
    #[must_use]
    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns.get()
    }

    /// Number of columns, as a [`NonZeroUsize`].
    #[must_use]
    pub const fn column_count(&self) -> NonZeroUsize {
        self.columns
    }

    /// Width and height of every cell.
    #[must_use]
    pub const fn cell_extent(&self) -> f64 {
        self.cell_extent
    }

    /// Size of every cell.
    #[must_use]
    pub const fn cell_size(&self) -> Size {
        Size::new(self.cell_extent, self.cell_extent)
    }

    /// Distance between the tops of two consecutive rows.
    #[must_use]
    pub fn row_pitch(&self) -> f64 {
        self.cell_extent + self.layout.vertical_spacing
    }

    /// Number of rows needed for `item_count` items.
    #[must_use]
    pub const fn row_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.columns.get())
    }

    /// Row containing item `index`.
    #[must_use]
    pub const fn row_of(&self, index: usize) -> usize {
        index / self.columns.get()
    }

    /// Column containing item `index`.
    #[must_use]
    pub const fn column_of(&self, index: usize) -> usize {
        index % self.columns.get()
    }

    /// Total scrollable height of `item_count` items.
    ///
    /// An empty grid still reserves its top and bottom padding.
    #[must_use]
    pub fn content_extent(&self, item_count: usize) -> f64 {
        let rows = self.row_count(item_count);
        let padding = self.layout.vertical_padding * 2.0;
        let extent = if rows == 0 {
            padding
        } else {
            rows as f64 * self.row_pitch() - self.layout.vertical_spacing + padding
        };
        extent.max(0.0)
    }

    /// Top-left corner of the cell at (`row`, `column`).
    #[must_use]
    pub fn cell_origin(&self, row: usize, column: usize) -> Point {
        let x = self.layout.horizontal_padding
            + column as f64 * (self.cell_extent + self.layout.horizontal_spacing);
        let y = -self.layout.vertical_padding - row as f64 * self.row_pitch();
        Point::new(x, y)
    }

    /// Top-left corner of the cell showing item `index`.
    #[must_use]
    pub fn origin_of(&self, index: usize) -> Point {
        self.cell_origin(self.row_of(index), self.column_of(index))
    }

    /// Rows that fit in a viewport of `viewport_height`, plus one for a partial row.
    #[must_use]
    pub fn visible_rows(&self, viewport_height: f64) -> usize {
        let pitch = self.row_pitch();
        if pitch <= 0.0 {
            return 1;
        }
        let rows = ceil_to_i64(viewport_height / pitch).max(0);
        usize::try_from(rows).unwrap_or(usize::MAX).saturating_add(1)
    }

    /// Cells needed to cover the viewport and both buffers.
    #[must_use]
    pub fn pool_capacity(&self, viewport_height: f64) -> usize {
        self.visible_rows(viewport_height)
            .saturating_add(self.layout.buffer_rows.saturating_mul(2))
            .saturating_mul(self.columns.get())
    }
}
