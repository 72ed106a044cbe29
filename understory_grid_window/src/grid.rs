// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grid windowing engine: binds pooled cells to the rows in view.

use alloc::boxed::Box;
use core::fmt;
use core::num::NonZeroUsize;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::cell::recycle;
use crate::{
    CellFactory, CellGeometry, CellPool, ClickRelay, GridCell, GridError, GridLayout, PoolStats,
    RowWindow, compute_row_window,
};

/// Source of the visible area's size.
pub trait Viewport {
    /// Current width and height of the visible area.
    fn size(&self) -> Size;
}

/// The scrollable surface cells are placed on.
pub trait ContentSurface {
    /// Receives the total content height whenever it changes.
    fn set_extent(&mut self, extent: f64);
}

/// The host's scroll state along the vertical axis.
pub trait ScrollSource {
    /// Distance from the top of the content to the top of the viewport.
    fn offset(&self) -> f64;

    /// Jumps to the top of the content.
    ///
    /// Hosts are expected to report the new offset through
    /// [`GridWindow::on_scroll_offset_changed`] like any other scroll.
    fn scroll_to_top(&mut self);
}

type BoxedFactory<C> = Box<dyn FnMut() -> Option<C>>;
type Configure<C> = Box<dyn FnMut(&mut C, usize)>;

/// Default number of columns.
pub const DEFAULT_COLUMNS: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(columns) => columns,
    None => unreachable!(),
};

/// Collects the collaborators of a [`GridWindow`].
///
/// The viewport, content surface, scroll source, and cell factory are
/// required; [`build`](Self::build) refuses to produce a grid without them.
pub struct GridWindowBuilder<C> {
    viewport: Option<Box<dyn Viewport>>,
    content: Option<Box<dyn ContentSurface>>,
    scroll: Option<Box<dyn ScrollSource>>,
    factory: Option<Box<dyn CellFactory<C>>>,
    configure: Option<Configure<C>>,
    clicks: ClickRelay,
    layout: GridLayout,
    columns: NonZeroUsize,
}

impl<C> fmt::Debug for GridWindowBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridWindowBuilder")
            .field("has_viewport", &self.viewport.is_some())
            .field("has_content", &self.content.is_some())
            .field("has_scroll", &self.scroll.is_some())
            .field("has_factory", &self.factory.is_some())
            .field("layout", &self.layout)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl<C: GridCell + 'static> Default for GridWindowBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: GridCell + 'static> GridWindowBuilder<C> {
    /// Starts with the default layout and two columns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            viewport: None,
            content: None,
            scroll: None,
            factory: None,
            configure: None,
            clicks: ClickRelay::new(),
            layout: GridLayout::DEFAULT,
            columns: DEFAULT_COLUMNS,
        }
    }

    /// Sets the viewport.
    #[must_use]
    pub fn viewport(mut self, viewport: impl Viewport + 'static) -> Self {
        self.viewport = Some(Box::new(viewport));
        self
    }

    /// Sets the content surface.
    #[must_use]
    pub fn content(mut self, content: impl ContentSurface + 'static) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    /// Sets the scroll source.
    #[must_use]
    pub fn scroll_source(mut self, scroll: impl ScrollSource + 'static) -> Self {
        self.scroll = Some(Box::new(scroll));
        self
    }

    /// Sets the factory the pool creates cells with.
    #[must_use]
    pub fn factory(mut self, factory: impl CellFactory<C> + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Sets spacing, padding, and buffer rows.
    #[must_use]
    pub fn layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the initial column count.
    #[must_use]
    pub fn columns(mut self, columns: NonZeroUsize) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the callback that binds item data into a freshly bound cell.
    #[must_use]
    pub fn on_configure(mut self, configure: impl FnMut(&mut C, usize) + 'static) -> Self {
        self.configure = Some(Box::new(configure));
        self
    }

    /// Sets the listener receiving the index of activated cells.
    #[must_use]
    pub fn on_click(self, listener: impl FnMut(usize) + 'static) -> Self {
        self.clicks.set_listener(listener);
        self
    }

    /// Builds the grid.
    ///
    /// The grid starts empty; call [`GridWindow::initialize`] to populate it.
    pub fn build(self) -> Result<GridWindow<C>, GridError> {
        let viewport = self.viewport.ok_or(GridError::MissingViewport)?;
        let content = self.content.ok_or(GridError::MissingContent)?;
        let scroll = self.scroll.ok_or(GridError::MissingScrollSource)?;
        let mut user_factory = self.factory.ok_or(GridError::MissingCellFactory)?;

        // Every cell is subscribed exactly once, when it is created.
        let relay = self.clicks.clone();
        let factory: BoxedFactory<C> = Box::new(move || {
            let mut cell = user_factory.create()?;
            cell.binding_mut().subscribe(relay.clone());
            Some(cell)
        });

        let viewport_size = viewport.size();
        let geometry = CellGeometry::new(self.layout, self.columns, viewport_size.width);
        Ok(GridWindow {
            viewport,
            content,
            scroll,
            pool: CellPool::new(factory),
            active: HashMap::new(),
            configure: self.configure,
            clicks: self.clicks,
            geometry,
            viewport_size,
            item_count: 0,
            window: None,
            content_extent: geometry.content_extent(0),
        })
    }
}

/// Recycling grid over a dense sequence of `0..item_count` items.
///
/// The grid keeps a cell bound for every item whose row falls inside the
/// current [`RowWindow`] (the rows in view plus the buffer rows), and nothing
/// else. Cells leaving the window go back to a [`CellPool`] and are reused for
/// items entering it, so the number of cells ever created is bounded by the
/// window size rather than the item count.
///
/// Work is incremental. A scroll that leaves the window unchanged does
/// nothing; a scroll that moves it only recycles the rows that left and binds
/// the rows that entered. Layout changes (columns, viewport width, spacing)
/// and item count changes recycle every cell and repopulate.
///
/// The configure callback runs once for each newly bound cell. It must not
/// call back into the grid; the grid is mutably borrowed while it runs.
pub struct GridWindow<C> {
    viewport: Box<dyn Viewport>,
    content: Box<dyn ContentSurface>,
    scroll: Box<dyn ScrollSource>,
    pool: CellPool<C, BoxedFactory<C>>,
    active: HashMap<usize, C>,
    configure: Option<Configure<C>>,
    clicks: ClickRelay,
    geometry: CellGeometry,
    viewport_size: Size,
    item_count: usize,
    window: Option<RowWindow>,
    content_extent: f64,
}

impl<C> fmt::Debug for GridWindow<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridWindow")
            .field("item_count", &self.item_count)
            .field("geometry", &self.geometry)
            .field("viewport_size", &self.viewport_size)
            .field("window", &self.window)
            .field("content_extent", &self.content_extent)
            .field("active", &self.active.len())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl<C: GridCell + 'static> GridWindow<C> {
    /// Starts a [`GridWindowBuilder`].
    #[must_use]
    pub fn builder() -> GridWindowBuilder<C> {
        GridWindowBuilder::new()
    }

    /// Shows `item_count` items.
    ///
    /// Reads the viewport, sizes the pool to cover the viewport and both
    /// buffers, publishes the content extent, and binds the first window.
    pub fn initialize(&mut self, item_count: usize) {
        let _span = tracing::debug_span!("grid_initialize", item_count).entered();
        self.recycle_all();
        self.item_count = item_count;
        self.read_viewport();

        self.pool.clear();
        let capacity = self.geometry.pool_capacity(self.viewport_size.height);
        let created = self.pool.reserve(capacity);
        if created < capacity {
            tracing::warn!(created, capacity, "cell pool could not be fully prewarmed");
        }

        self.publish_content_extent();
        self.update_window(self.scroll.offset());
    }

    /// Switches to `columns` columns.
    ///
    /// Does nothing if the grid already has that many columns.
    pub fn set_column_count(&mut self, columns: NonZeroUsize) {
        if columns.get() == self.geometry.columns() {
            return;
        }
        tracing::debug!(
            from = self.geometry.columns(),
            to = columns.get(),
            "column count changed"
        );
        self.recycle_all();
        self.viewport_size = self.viewport.size();
        self.geometry = CellGeometry::new(*self.geometry.layout(), columns, self.viewport_size.width);
        self.publish_content_extent();
        self.update_window(self.scroll.offset());
    }

    /// Replaces spacing, padding, and buffer rows.
    ///
    /// Does nothing if `layout` equals the current layout.
    pub fn set_layout(&mut self, layout: GridLayout) {
        if layout == *self.geometry.layout() {
            return;
        }
        self.recycle_all();
        self.geometry = CellGeometry::new(layout, self.column_count(), self.viewport_size.width);
        self.publish_content_extent();
        self.update_window(self.scroll.offset());
    }

    /// Re-reads the viewport after the host resized it.
    ///
    /// A width change resizes the cells and rebinds everything; a height
    /// change only moves the window.
    pub fn relayout(&mut self) {
        let size = self.viewport.size();
        if size.width != self.viewport_size.width {
            self.recycle_all();
            self.viewport_size = size;
            self.geometry = CellGeometry::new(*self.geometry.layout(), self.column_count(), size.width);
            self.publish_content_extent();
            self.update_window(self.scroll.offset());
        } else if size.height != self.viewport_size.height {
            self.viewport_size = size;
            self.update_window(self.scroll.offset());
        }
    }

    /// Runs the configure callback again for every bound cell.
    ///
    /// Indices and positions are left untouched. Cells are visited in index
    /// order.
    pub fn refresh_data(&mut self) {
        let Some(configure) = self.configure.as_mut() else {
            return;
        };
        let mut indices: SmallVec<[usize; 32]> = self.active.keys().copied().collect();
        indices.sort_unstable();
        for index in indices {
            if let Some(cell) = self.active.get_mut(&index)
                && cell.is_alive()
            {
                configure(cell, index);
            }
        }
    }

    /// Shows `item_count` items after the data set changed.
    ///
    /// If the count is unchanged and `force_recycle` is `false`, this is
    /// [`refresh_data`](Self::refresh_data). Otherwise every cell is recycled,
    /// the content extent is republished, the view optionally jumps to the top,
    /// and the window is rebound.
    pub fn refresh_with_new_count(
        &mut self,
        item_count: usize,
        force_recycle: bool,
        scroll_to_top: bool,
    ) {
        if item_count == self.item_count && !force_recycle {
            self.refresh_data();
            return;
        }
        tracing::debug!(from = self.item_count, to = item_count, force_recycle, "item count changed");
        self.item_count = item_count;
        self.recycle_all();
        self.publish_content_extent();
        if scroll_to_top {
            self.scroll_to_top();
        }
        self.update_window(self.scroll.offset());
    }

    /// Asks the scroll source to jump to the top.
    ///
    /// Cells are rebound by the scroll notification that follows.
    pub fn scroll_to_top(&mut self) {
        self.scroll.scroll_to_top();
    }

    /// Moves the window to `offset`.
    ///
    /// Hosts call this for every scroll position change.
    pub fn on_scroll_offset_changed(&mut self, offset: f64) {
        self.update_window(offset);
    }

    /// Recycles every cell and drops the pooled ones.
    pub fn teardown(&mut self) {
        self.recycle_all();
        self.pool.clear();
        self.clicks.clear_listener();
    }

    /// Replaces the configure callback.
    pub fn set_on_configure(&mut self, configure: impl FnMut(&mut C, usize) + 'static) {
        self.configure = Some(Box::new(configure));
    }

    /// Replaces the click listener.
    pub fn set_on_click(&mut self, listener: impl FnMut(usize) + 'static) {
        self.clicks.set_listener(listener);
    }

    /// Number of items.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of columns.
    #[must_use]
    pub const fn column_count(&self) -> NonZeroUsize {
        self.geometry.column_count()
    }

    /// Current cell geometry.
    #[must_use]
    pub const fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    /// Current layout parameters.
    #[must_use]
    pub const fn layout(&self) -> &GridLayout {
        self.geometry.layout()
    }

    /// Viewport size as of the last read.
    #[must_use]
    pub const fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// The window bound by the last update, or `None` before the first one
    /// and after a full recycle.
    #[must_use]
    pub const fn window(&self) -> Option<RowWindow> {
        self.window
    }

    /// Content height as last published.
    #[must_use]
    pub const fn content_extent(&self) -> f64 {
        self.content_extent
    }

    /// Number of bound cells.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// The cell bound to `index`, if any.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&C> {
        self.active.get(&index)
    }

    /// The cell bound to `index`, if any.
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut C> {
        self.active.get_mut(&index)
    }

    /// Bound cells with their indices, in no particular order.
    pub fn active_cells(&self) -> impl Iterator<Item = (usize, &C)> + '_ {
        self.active.iter().map(|(index, cell)| (*index, cell))
    }

    /// Top-left corner of the cell for `index`, or `None` past the last item.
    #[must_use]
    pub fn cell_origin(&self, index: usize) -> Option<Point> {
        (index < self.item_count).then(|| self.geometry.origin_of(index))
    }

    /// Bounds of the cell for `index` in content coordinates.
    ///
    /// The rectangle spans downward from the origin, so its `y0` is the
    /// origin's `y` minus the cell extent.
    #[must_use]
    pub fn cell_frame(&self, index: usize) -> Option<Rect> {
        let origin = self.cell_origin(index)?;
        let extent = self.geometry.cell_extent();
        Some(Rect::new(
            origin.x,
            origin.y - extent,
            origin.x + extent,
            origin.y,
        ))
    }

    /// The cell pool.
    #[must_use]
    pub fn pool(&self) -> &CellPool<C, Box<dyn FnMut() -> Option<C>>> {
        &self.pool
    }

    /// Number of free cells in the pool.
    #[must_use]
    pub fn pool_available(&self) -> usize {
        self.pool.available()
    }

    /// Lifetime counters of the pool.
    #[must_use]
    pub const fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// The relay every cell publishes its activations to.
    #[must_use]
    pub const fn click_relay(&self) -> &ClickRelay {
        &self.clicks
    }

    fn read_viewport(&mut self) {
        self.viewport_size = self.viewport.size();
        self.geometry = CellGeometry::new(
            *self.geometry.layout(),
            self.column_count(),
            self.viewport_size.width,
        );
    }

    fn publish_content_extent(&mut self) {
        let extent = self.geometry.content_extent(self.item_count);
        tracing::debug!(
            item_count = self.item_count,
            columns = self.geometry.columns(),
            rows = self.geometry.row_count(self.item_count),
            cell_extent = self.geometry.cell_extent(),
            viewport_height = self.viewport_size.height,
            extent,
            "content extent updated"
        );
        self.content_extent = extent;
        self.content.set_extent(extent);
    }

    fn update_window(&mut self, offset: f64) {
        if self.item_count == 0 {
            self.recycle_all();
            return;
        }

        let window = compute_row_window(
            &self.geometry,
            self.item_count,
            offset,
            self.viewport_size.height,
        );
        if self.window == Some(window) {
            return;
        }
        let _span =
            tracing::trace_span!("grid_window", start = window.start, end = window.end).entered();
        tracing::trace!(previous = ?self.window, offset, "row window moved");

        self.recycle_outside(window);
        self.bind_window(window);
        self.window = Some(window);
    }

    fn recycle_outside(&mut self, window: RowWindow) {
        let columns = self.geometry.columns();
        let stale: SmallVec<[usize; 16]> = self
            .active
            .keys()
            .copied()
            .filter(|index| !window.contains_row(index / columns))
            .collect();
        for index in stale {
            if let Some(mut cell) = self.active.remove(&index) {
                recycle(&mut cell);
                self.pool.put(cell);
            }
        }
    }

    fn bind_window(&mut self, window: RowWindow) {
        let columns = self.geometry.columns();
        let size = self.geometry.cell_size();
        for row in window.rows() {
            for column in 0..columns {
                let index = row * columns + column;
                if index >= self.item_count {
                    break;
                }
                if self.active.contains_key(&index) {
                    continue;
                }
                let mut cell = match self.pool.try_get() {
                    Ok(cell) => cell,
                    Err(err) => {
                        tracing::warn!(index, %err, "leaving grid slot empty");
                        continue;
                    }
                };
                cell.binding_mut().set_index(index);
                cell.place(self.geometry.cell_origin(row, column), size);
                if let Some(configure) = self.configure.as_mut() {
                    configure(&mut cell, index);
                }
                self.active.insert(index, cell);
            }
        }
    }

    fn recycle_all(&mut self) {
        for (_, mut cell) in self.active.drain() {
            recycle(&mut cell);
            self.pool.put(cell);
        }
        self.window = None;
    }
}
