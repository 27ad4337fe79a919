//! View construction: `render(state, catalog) -> View`.
//!
//! A [`View`] describes what the page shows without saying how. The text
//! listing in [`crate::output`] and the HTML page in [`crate::page`] are both
//! built from it.

use crate::catalog::Catalog;
use crate::filter::{self, FilterState, FilterStats};
use crate::naming::format_medium_name;
use crate::types::MediaRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// The index could not be loaded. Nothing else is shown.
    Error { message: String },
    /// The filters exclude every record.
    Empty,
    Grid { stats: FilterStats, cells: Vec<Cell> },
}

impl View {
    pub fn cells(&self) -> &[Cell] {
        match self {
            View::Grid { cells, .. } => cells,
            View::Error { .. } | View::Empty => &[],
        }
    }
}

/// An image whose bytes have not been requested.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredImage {
    pub src: String,
    pub alt: String,
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub image: DeferredImage,
    pub artist: String,
    pub medium: String,
    /// `"<year> · <filename>"`
    pub caption: String,
}

impl Cell {
    pub fn from_record(record: &MediaRecord) -> Self {
        Self {
            image: DeferredImage {
                src: record.relative_path().to_string(),
                alt: format!("{} - {}", record.artist_display(), record.medium()),
            },
            artist: record.artist_display().to_string(),
            medium: format_medium_name(record.medium()),
            caption: format!("{} \u{b7} {}", record.year(), record.filename()),
        }
    }
}

pub fn render(state: &FilterState, catalog: &Catalog) -> View {
    let filtered = filter::apply(state, catalog.records());
    if filtered.is_empty() {
        return View::Empty;
    }
    View::Grid {
        stats: filter::summarize(&filtered),
        cells: filtered.into_iter().map(Cell::from_record).collect(),
    }
}
