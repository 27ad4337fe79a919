//! # Archive Browser
//!
//! Indexes a year/artist/medium image archive and browses it with filters.
//! The filesystem is the data source: one folder per year, and every image
//! named `<year>-<artist_slug>-<sequence>-<medium>.<ext>`.
//!
//! # Architecture: Two Independent Halves
//!
//! The indexer and the browser never call each other. The JSON index file is
//! the only contract between them:
//!
//! ```text
//! 1. Scan      img/Archive/<year>/  →  archive-data.json   (filesystem → index)
//! 2. Browse    archive-data.json    →  View                (index → filtered grid)
//! ```
//!
//! The index is human-readable JSON keyed by year. It can be inspected,
//! committed, or edited by hand, and the browser needs no filesystem access
//! beyond reading it.
//!
//! Inside the browser every interaction is a full recompute:
//!
//! ```text
//! FilterEvent ─▶ dispatch(state) ─▶ render(state, catalog) ─▶ View ─▶ arm lazy loading
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Filename convention parser and display-name formatting |
//! | [`types`] | `MediaRecord` and the year-ordered `ArchiveIndex` shared by both halves |
//! | [`scan`] | Walks the year folders, collects records and issues, writes the index |
//! | [`catalog`] | Loads the index, flattens it, derives filter vocabularies |
//! | [`filter`] | Filter state, control events, wildcard-AND matching, status counts |
//! | [`render`] | Builds the `View` (error / empty / grid) for a filter state |
//! | [`lazy`] | Deferred image slots behind a `VisibilityObserver` |
//! | [`browser`] | The controller owning catalog, state, view and lazy loader |
//! | [`page`] | Self-filtering HTML page for a view using Maud |
//! | [`config`] | `archive.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI text output for scan reports and views |
//!
//! # Design Decisions
//!
//! ## Non-Fatal Scanning
//!
//! A missing year folder, a misnamed file, or a filename whose embedded year
//! disagrees with its folder never stops a scan. Each becomes a
//! [`scan::ScanIssue`], is logged, and the index is still written with every
//! configured year present. An archive maintainer gets a complete report in
//! one run instead of fixing problems one at a time.
//!
//! ## Wildcards, Not Options
//!
//! Each filter field is a [`filter::Selection`]: either the wildcard or one
//! concrete value. The wildcard is its own variant, never a reserved string,
//! so every value found in the archive stays selectable. A record is shown
//! only when every non-wildcard field matches. There is no OR across values
//! of one field.
//!
//! ## Lazy Loading as a Seam
//!
//! Images start deferred and are promoted when a [`lazy::VisibilityObserver`]
//! reports them near the viewport. The generated page uses the browser's
//! IntersectionObserver and re-applies the filters in place when a control is
//! used; the CLI and the tests plug in their own observers.

pub mod browser;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod lazy;
pub mod naming;
pub mod output;
pub mod page;
pub mod render;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
