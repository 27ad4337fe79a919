//! HTML rendering of a browser session.
//!
//! Produces one self-contained page. Every record in the catalog is emitted as
//! a grid cell carrying its year, raw medium and artist display name; cells
//! outside the current filter state start `hidden`. The embedded filter script
//! applies the same wildcard-AND rule on each control change, so the page
//! keeps filtering after it is written. Images carry `data-src` only and are
//! activated by an IntersectionObserver whose margin comes from
//! `browser.lazy_margin`.
//!
//! ## Page Structure
//!
//! ```text
//! header.site-header    title
//! nav.filters           year buttons · medium buttons · artist select
//! div.stats             "Showing N works · ..."
//! main#content          div.media-grid + div.empty-state | div.error-state
//! ```
//!
//! Wildcard controls are marked with `data-all` rather than a reserved value,
//! so any archive value can be selected. An error view renders the header and
//! the error message only.

use crate::browser::Browser;
use crate::catalog::Catalog;
use crate::config::BrowserConfig;
use crate::filter::{FilterState, FilterStats, Selection};
use crate::lazy::VisibilityObserver;
use crate::naming::format_medium_name;
use crate::render::{Cell, View};
use crate::types::MediaRecord;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

const CSS: &str = include_str!("../static/style.css");
const LAZY_JS: &str = include_str!("../static/lazy.js");
const FILTER_JS: &str = include_str!("../static/filter.js");

/// Render the browser's current view as a full HTML document.
pub fn render_page<O: VisibilityObserver>(browser: &Browser<O>, config: &BrowserConfig) -> Markup {
    let content = match (browser.view(), browser.catalog()) {
        (View::Error { message }, _) => error_state(message),
        (_, None) => error_state("Archive data is not loaded."),
        (view, Some(catalog)) => {
            let empty = matches!(view, View::Empty);
            html! {
                (filter_controls(catalog, browser.state()))
                (status_line(view))
                main #content {
                    (grid(catalog, browser.state(), config.columns))
                    div.empty-state #empty-state hidden[!empty] {
                        "No media found for selected filters"
                    }
                }
            }
        }
    };

    base_document(&config.title, config.lazy_margin, content)
}

/// Render and write the page to `out`, creating parent directories.
pub fn write_page<O: VisibilityObserver>(
    browser: &Browser<O>,
    config: &BrowserConfig,
    out: &Path,
) -> std::io::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(out, render_page(browser, config).into_string())
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, lazy_margin: u32, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body data-lazy-margin=(lazy_margin) {
                header.site-header {
                    h1 { (title) }
                }
                (content)
                script { (PreEscaped(LAZY_JS)) }
                script { (PreEscaped(FILTER_JS)) }
            }
        }
    }
}

fn error_state(message: &str) -> Markup {
    html! {
        main #content {
            div.error-state { (message) }
        }
    }
}

fn filter_controls(catalog: &Catalog, state: &FilterState) -> Markup {
    let vocab = catalog.vocabularies();
    let artists: Vec<(&str, bool)> = vocab
        .artists
        .iter()
        .map(|a| (a.as_str(), state.artist.value() == Some(a.as_str())))
        .collect();
    html! {
        nav.filters {
            div.filter-group {
                (filter_button("year-filter", "year", None, state.year == Selection::All, "All"))
                @for year in catalog.index_years() {
                    (filter_button("year-filter", "year", Some(year), state.year.value() == Some(year.as_str()), year))
                }
            }
            div.filter-group #medium-buttons {
                (filter_button("medium-filter", "medium", None, state.medium == Selection::All, "All"))
                @for medium in &vocab.media {
                    (filter_button("medium-filter", "medium", Some(medium), state.medium.value() == Some(medium.as_str()), &format_medium_name(medium)))
                }
            }
            div.filter-group {
                select #artist-select {
                    option value="" data-all selected[state.artist == Selection::All] { "All artists" }
                    @for (artist, selected) in artists {
                        option value=(artist) selected[selected] { (artist) }
                    }
                }
            }
        }
    }
}

/// A filter button; `value` is `None` for the wildcard.
fn filter_button(class: &str, field: &str, value: Option<&str>, active: bool, label: &str) -> Markup {
    let classes = if active {
        format!("{class} active")
    } else {
        class.to_string()
    };
    html! {
        button class=(classes) data-field=(field) data-value=[value] data-all[value.is_none()] {
            (label)
        }
    }
}

fn grid_stats(view: &View) -> Option<&FilterStats> {
    match view {
        View::Grid { stats, .. } => Some(stats),
        View::Error { .. } | View::Empty => None,
    }
}

fn status_line(view: &View) -> Markup {
    html! {
        div.stats #stats {
            @if let Some(stats) = grid_stats(view) {
                (stats)
            }
        }
    }
}

fn grid(catalog: &Catalog, state: &FilterState, columns: usize) -> Markup {
    let records = catalog.records();
    let any_visible = records.iter().any(|r| state.matches(r));
    html! {
        div.media-grid #media-grid style={ "--columns: " (columns) } hidden[!any_visible] {
            @for record in records {
                (media_cell(record, state.matches(record)))
            }
        }
    }
}

fn media_cell(record: &MediaRecord, visible: bool) -> Markup {
    let cell = Cell::from_record(record);
    html! {
        div.media-item
            data-year=(record.year())
            data-medium=(record.medium())
            data-artist=(record.artist_display())
            hidden[!visible]
        {
            img.lazy data-src=(cell.image.src) alt=(cell.image.alt);
            div.media-info {
                h3 { (cell.artist) }
                span.medium { (cell.medium) }
                p.meta { (cell.caption) }
            }
        }
    }
}
