// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A photo gallery screen driven by `understory_grid_window`.
//!
//! This example shows how a host wires the engine up:
//! - a screen object acting as viewport, content surface, and scroll source,
//! - a cell type carrying an image URL and a premium badge,
//! - a configure callback reading from the currently filtered item list,
//! - scrolling, a column switch, filtering, resizing, and a click.
//!
//! The gallery is described by a JSON config (see `gallery.json`).
//!
//! Run:
//! - `cargo run -p understory_grid_window_demos --example gallery`
//! - `cargo run -p understory_grid_window_demos --example gallery -- path/to/gallery.json`
//!
//! Set `RUST_LOG=understory_grid_window=trace` to watch the window move.

use std::cell::RefCell;
use std::error::Error;
use std::num::NonZeroUsize;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt};
use understory_grid_window::{
    CellBinding, ContentSurface, GridCell, GridLayout, GridWindow, ScrollSource, Viewport,
};

const DEFAULT_CONFIG: &str = include_str!("gallery.json");

#[derive(Debug, Deserialize)]
struct GalleryConfig {
    base_url: String,
    total_images: usize,
    premium_interval: usize,
    columns: usize,
    viewport: ViewportConfig,
    #[serde(default)]
    layout: GridLayout,
}

#[derive(Debug, Deserialize)]
struct ViewportConfig {
    width: f64,
    height: f64,
}

#[derive(Clone, Debug)]
struct GalleryItem {
    number: usize,
    url: String,
    premium: bool,
}

#[derive(Clone, Copy, Debug)]
enum Filter {
    All,
    Odd,
    Even,
}

impl Filter {
    fn keeps(self, item: &GalleryItem) -> bool {
        match self {
            Self::All => true,
            Self::Odd => item.number % 2 == 1,
            Self::Even => item.number % 2 == 0,
        }
    }
}

/// Images are numbered from 1; every `premium_interval`-th one is premium.
fn load_items(config: &GalleryConfig) -> Vec<GalleryItem> {
    (1..=config.total_images)
        .map(|number| GalleryItem {
            number,
            url: format!("{}{number}.jpg", config.base_url),
            premium: config.premium_interval != 0 && number % config.premium_interval == 0,
        })
        .collect()
}

#[derive(Debug)]
struct ScreenState {
    size: Size,
    offset: f64,
    extent: f64,
}

/// The scroll view hosting the grid.
#[derive(Clone, Debug)]
struct Screen(Rc<RefCell<ScreenState>>);

impl Screen {
    fn scroll(&self, grid: &mut GridWindow<GalleryCell>, offset: f64) {
        // Clamp like a scroll view would.
        let max = {
            let state = self.0.borrow();
            (state.extent - state.size.height).max(0.0)
        };
        let offset = offset.clamp(0.0, max);
        self.0.borrow_mut().offset = offset;
        grid.on_scroll_offset_changed(offset);
    }
}

impl Viewport for Screen {
    fn size(&self) -> Size {
        self.0.borrow().size
    }
}

impl ContentSurface for Screen {
    fn set_extent(&mut self, extent: f64) {
        self.0.borrow_mut().extent = extent;
    }
}

impl ScrollSource for Screen {
    fn offset(&self) -> f64 {
        self.0.borrow().offset
    }

    fn scroll_to_top(&mut self) {
        self.0.borrow_mut().offset = 0.0;
    }
}

#[derive(Debug, Default)]
struct GalleryCell {
    binding: CellBinding,
    url: Option<String>,
    premium: bool,
    frame: Rect,
    visible: bool,
}

impl GridCell for GalleryCell {
    fn binding(&self) -> &CellBinding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut CellBinding {
        &mut self.binding
    }

    fn set_active(&mut self, active: bool) {
        self.visible = active;
    }

    fn place(&mut self, origin: Point, size: Size) {
        self.frame = Rect::from_origin_size((origin.x, origin.y - size.height), size);
    }

    fn on_recycle(&mut self) {
        self.url = None;
        self.premium = false;
    }
}

fn report(label: &str, grid: &GridWindow<GalleryCell>) {
    let stats = grid.pool_stats();
    let mut bound: Vec<usize> = grid.active_cells().map(|(index, _)| index).collect();
    bound.sort_unstable();
    let range = match (bound.first(), bound.last()) {
        (Some(first), Some(last)) => format!("{first}..={last}"),
        _ => String::from("none"),
    };
    println!(
        "{label:<24} items={:<3} columns={} bound={range:<10} active={:<3} pooled={:<3} created={}",
        grid.item_count(),
        grid.column_count(),
        grid.active_len(),
        grid.pool_available(),
        stats.created,
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = fmt().with_env_filter(filter).try_init() {
        eprintln!("failed to install tracing subscriber: {err}");
    }

    let source = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => String::from(DEFAULT_CONFIG),
    };
    let config: GalleryConfig = serde_json::from_str(&source)?;
    let columns = NonZeroUsize::new(config.columns).ok_or("gallery needs at least one column")?;

    let all_items = load_items(&config);
    let shown = Rc::new(RefCell::new(all_items.clone()));
    let screen = Screen(Rc::new(RefCell::new(ScreenState {
        size: Size::new(config.viewport.width, config.viewport.height),
        offset: 0.0,
        extent: 0.0,
    })));

    let configure_items = shown.clone();
    let click_items = shown.clone();
    let mut grid = GridWindow::builder()
        .viewport(screen.clone())
        .content(screen.clone())
        .scroll_source(screen.clone())
        .layout(config.layout)
        .columns(columns)
        .factory(|| Some(GalleryCell::default()))
        .on_configure(move |cell: &mut GalleryCell, index| {
            if let Some(item) = configure_items.borrow().get(index) {
                cell.url = Some(item.url.clone());
                cell.premium = item.premium;
            }
        })
        .on_click(move |index| {
            if let Some(item) = click_items.borrow().get(index) {
                tracing::info!(index, url = %item.url, premium = item.premium, "image selected");
            }
        })
        .build()?;

    grid.initialize(shown.borrow().len());
    report("initialized", &grid);

    for step in 1..=6 {
        screen.scroll(&mut grid, f64::from(step) * 350.0);
        report(&format!("scrolled to {:.0}", screen.offset()), &grid);
    }

    // Tap the first cell on screen.
    let first_visible = grid.active_cells().map(|(index, _)| index).min();
    if let Some(cell) = first_visible.and_then(|index| grid.cell(index)) {
        tracing::info!(
            url = cell.url.as_deref().unwrap_or_default(),
            badge = cell.premium,
            frame = ?cell.frame,
            "tapping"
        );
        cell.binding().activate();
    }

    grid.set_column_count(NonZeroUsize::MIN.saturating_add(2));
    report("three columns", &grid);
    grid.set_column_count(NonZeroUsize::MIN.saturating_add(2));
    report("three columns again", &grid);

    for filter in [Filter::Odd, Filter::Even, Filter::All] {
        let filtered: Vec<GalleryItem> = all_items
            .iter()
            .filter(|item| filter.keeps(item))
            .cloned()
            .collect();
        let count = filtered.len();
        *shown.borrow_mut() = filtered;
        grid.refresh_with_new_count(count, true, true);
        report(&format!("filter {filter:?}"), &grid);
    }

    screen.0.borrow_mut().size = Size::new(config.viewport.width * 2.0, config.viewport.height);
    grid.relayout();
    report("wide viewport", &grid);

    screen.scroll(&mut grid, f64::MAX);
    report("scrolled to bottom", &grid);

    grid.teardown();
    report("torn down", &grid);
    println!("{:?}", grid.pool_stats());
    Ok(())
}
