//! Filter state, events, and the filtering predicate.
//!
//! Filtering is a pure function of ([`FilterState`], records). State changes
//! go through [`dispatch`], which never touches the records:
//!
//! ```text
//! event ──dispatch──▶ FilterState ──apply──▶ filtered records ──summarize──▶ FilterStats
//! ```

use crate::types::MediaRecord;
use std::collections::HashSet;
use std::fmt;

/// One filter field: the wildcard or a concrete value.
///
/// The wildcard is a variant, not a reserved string, so every value found in
/// the archive (including a medium literally named `all`) stays selectable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn only(value: impl Into<String>) -> Self {
        Selection::Only(value.into())
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    /// The concrete value, or `None` for the wildcard.
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }
}

impl From<Option<String>> for Selection {
    fn from(value: Option<String>) -> Self {
        value.map_or(Selection::All, Selection::Only)
    }
}

/// Current selection of the three filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub year: Selection,
    pub medium: Selection,
    /// Matched against the artist display name, the value the dropdown shows.
    pub artist: Selection,
}

impl FilterState {
    pub fn matches(&self, record: &MediaRecord) -> bool {
        self.year.accepts(record.year())
            && self.medium.accepts(record.medium())
            && self.artist.accepts(record.artist_display())
    }
}

/// A user interaction with one of the filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    YearClicked(Selection),
    MediumClicked(Selection),
    ArtistChanged(Selection),
    Reset,
}

/// Compute the state that follows `event`.
pub fn dispatch(state: &FilterState, event: FilterEvent) -> FilterState {
    match event {
        FilterEvent::YearClicked(year) => FilterState {
            year,
            ..state.clone()
        },
        FilterEvent::MediumClicked(medium) => FilterState {
            medium,
            ..state.clone()
        },
        FilterEvent::ArtistChanged(artist) => FilterState {
            artist,
            ..state.clone()
        },
        FilterEvent::Reset => FilterState::default(),
    }
}

/// Records matching `state`, in their original order.
pub fn apply<'a>(state: &FilterState, records: &'a [MediaRecord]) -> Vec<&'a MediaRecord> {
    records.iter().filter(|r| state.matches(r)).collect()
}

/// Summary of a filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub works: usize,
    pub years: usize,
    pub artists: usize,
    pub media: usize,
}

/// Count the filtered set and its distinct years, artists and media.
pub fn summarize(filtered: &[&MediaRecord]) -> FilterStats {
    let distinct = |field: fn(&MediaRecord) -> &str| {
        filtered.iter().map(|r| field(r)).collect::<HashSet<_>>().len()
    };
    FilterStats {
        works: filtered.len(),
        years: distinct(MediaRecord::year),
        artists: distinct(MediaRecord::artist_display),
        media: distinct(MediaRecord::medium),
    }
}

/// `n` followed by the singular or plural noun.
pub(crate) fn counted(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} \u{b7} {} \u{b7} {} \u{b7} {}",
            counted(self.works, "work", "works"),
            counted(self.years, "year", "years"),
            counted(self.artists, "artist", "artists"),
            counted(self.media, "medium", "mediums"),
        )
    }
}
